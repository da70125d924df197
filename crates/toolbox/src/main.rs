//! CLI entry point for the toolbox.

use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use time::Date;
use toolbox_app::{ProjectConfig, Seed, SystemClock, Toolbox, resolve_user};
use toolbox_core::datefmt::parse_date;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::meetings::MeetingCommand;
use commands::settings::SettingsCommand;
use commands::tasks::TaskCommand;
use commands::team::TeamCommand;
use commands::{CommandContext, StdinConfirm};

mod clipboard;
mod commands;
mod surface;
mod table;

/// Tasks, meetings and the team directory in one terminal.
#[derive(Parser, Debug)]
#[command(
    name = "toolbox",
    version,
    about = "toolbox: kanban tasks, meeting minutes and a team directory"
)]
struct Cli {
    /// Directory holding `.toolbox/config.toml` (defaults to current).
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// Output format for listings and summaries.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    cmd: Command,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Manage kanban tasks.
    #[command(subcommand)]
    Tasks(TaskCommand),

    /// Manage meetings, agendas and minutes.
    #[command(subcommand)]
    Meetings(MeetingCommand),

    /// Manage the team directory.
    #[command(subcommand)]
    Team(TeamCommand),

    /// Show summary figures.
    Dashboard {
        /// Evaluate deadlines as of this day (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        today: Option<Date>,
    },

    /// Inspect or create the project configuration.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Run commands line by line against one in-memory state.
    Session {
        /// Read commands from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let Cli { workdir, format, cmd } = Cli::parse();
    install_tracing();

    let workdir = workdir.unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::from_workdir(&workdir)?;
    let mut context = build_context(workdir, config, format);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(cmd, &mut context, &mut out)?;
    out.flush()?;
    Ok(())
}

fn build_context(workdir: PathBuf, config: ProjectConfig, format: OutputFormat) -> CommandContext {
    let user = resolve_user(config.profile.as_ref());
    let toolbox = Toolbox::new(&config, user, Seed::sample(), Rc::new(SystemClock));
    CommandContext::new(toolbox, config, workdir, format).with_confirm(Box::new(StdinConfirm))
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO is the baseline. Logs go to stderr so stdout stays parseable.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
