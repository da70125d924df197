//! Print surface that hands exported minutes to a browser.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use tempfile::Builder;
use toolbox_app::{ExportConfig, MinutesDocument, PrintSurface};
use tracing::{debug, warn};

const BROWSER_ENV: &str = "BROWSER";

#[cfg(target_os = "macos")]
const PLATFORM_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const PLATFORM_OPENER: &str = "xdg-open";

/// Writes the document to disk and launches an opener on it.
#[derive(Debug, Clone)]
pub struct BrowserSurface {
    output_dir: Option<PathBuf>,
    open_command: Option<String>,
}

impl BrowserSurface {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            open_command: config.open_command.clone(),
        }
    }

    fn write_document(&self, document: &MinutesDocument, html: &str) -> Result<WrittenDocument> {
        let stem = document.file_stem();
        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("gagal membuat direktori ekspor: {}", dir.display()))?;
            let path = dir.join(format!("{stem}.html"));
            fs::write(&path, html).with_context(|| format!("gagal menulis berkas: {}", path.display()))?;
            return Ok(WrittenDocument { path, temporary: false });
        }

        let mut file = Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(".html")
            .tempfile()
            .context("gagal membuat berkas sementara")?;
        file.write_all(html.as_bytes())
            .context("gagal menulis berkas sementara")?;
        // The browser reads the file after we return, so it must outlive this process.
        let (_, path) = file.keep().context("gagal menyimpan berkas sementara")?;
        Ok(WrittenDocument { path, temporary: true })
    }
}

impl PrintSurface for BrowserSurface {
    fn open(&mut self, document: &MinutesDocument, html: &str) -> Result<String> {
        let browser = env::var(BROWSER_ENV).ok();
        let mut parts = opener_words(self.open_command.as_deref(), browser.as_deref())?;
        let program = parts.remove(0);
        let written = self.write_document(document, html)?;
        written.open_with(&program, &parts)?;
        Ok(written.path.display().to_string())
    }
}

/// HTML file handed to the opener.
#[derive(Debug)]
struct WrittenDocument {
    path: PathBuf,
    /// Created in the temp dir rather than the configured export directory.
    temporary: bool,
}

impl WrittenDocument {
    /// Launch the opener; a temp file is removed when that fails.
    fn open_with(&self, program: &str, args: &[String]) -> Result<()> {
        let Err(err) = launch(program, args, &self.path) else {
            return Ok(());
        };
        if !self.temporary {
            return Err(err.context(format!("berkas tersimpan di {}", self.path.display())));
        }
        if let Err(remove_err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %remove_err, "failed to remove unopened export");
        }
        Err(err)
    }
}

/// Command line used to open a document: configured opener, then `$BROWSER`, then the platform default.
fn opener_words(configured: Option<&str>, browser: Option<&str>) -> Result<Vec<String>> {
    let command = configured
        .or_else(|| browser.filter(|value| !value.trim().is_empty()))
        .unwrap_or(PLATFORM_OPENER);
    let parts = shell_words::split(command).map_err(|err| anyhow!("perintah pembuka tidak dapat diurai: {err}"))?;
    if parts.is_empty() {
        bail!("perintah pembuka kosong");
    }
    Ok(parts)
}

fn launch(program: &str, args: &[String], path: &Path) -> Result<()> {
    debug!(program, path = %path.display(), "launching document opener");
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("gagal menjalankan {program}"))?;
    if !status.success() {
        bail!("{program} berhenti dengan status {status}");
    }
    Ok(())
}
