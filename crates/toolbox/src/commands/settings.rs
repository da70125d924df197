use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use toolbox_app::ProjectConfig;
use toolbox_core::User;

use super::{CommandContext, emit_json};
use crate::OutputFormat;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SettingsCommand {
    /// Print the effective configuration and the resolved user.
    Show,

    /// Write a default `.toolbox/config.toml`.
    Init {
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct SettingsView<'a> {
    path: String,
    loaded: bool,
    user: &'a User,
    config: &'a ProjectConfig,
}

pub fn run(command: SettingsCommand, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let path = ProjectConfig::config_path(&ctx.workdir);
            let loaded = path.exists();
            if ctx.format == OutputFormat::Json {
                return emit_json(
                    out,
                    &SettingsView {
                        path: path.display().to_string(),
                        loaded,
                        user: ctx.toolbox.user(),
                        config: &ctx.config,
                    },
                );
            }
            if loaded {
                writeln!(out, "# konfigurasi: {}", path.display())?;
            } else {
                writeln!(out, "# {} tidak ada; memakai nilai bawaan", path.display())?;
            }
            let user = ctx.toolbox.user();
            writeln!(out, "# pengguna: {} <{}>", user.name, user.email)?;
            writeln!(out)?;
            write!(out, "{}", ctx.config.to_toml_string()?)?;
            Ok(())
        }
        SettingsCommand::Init { force } => {
            let path = ProjectConfig::config_path(&ctx.workdir);
            if path.exists()
                && !force
                && !ctx
                    .confirm
                    .confirm(&format!("Berkas sudah ada: {}\nTimpa?", path.display()))?
            {
                writeln!(out, "dibatalkan")?;
                return Ok(());
            }
            write_default_config(&path)?;
            writeln!(out, "berkas konfigurasi dibuat: {}", path.display())?;
            writeln!(out, "Sunting berkas ini untuk mengatur kolom papan, ekspor notulensi dan profil.")?;
            Ok(())
        }
    }
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("gagal membuat direktori: {}", parent.display()))?;
    }
    let content = ProjectConfig::default().to_toml_string()?;
    fs::write(path, content).with_context(|| format!("gagal menulis berkas konfigurasi: {}", path.display()))?;
    Ok(())
}
