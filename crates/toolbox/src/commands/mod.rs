use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use serde::Serialize;
use toolbox_app::{FilterBuildError, PendingDeletion, PrintSurface, ProjectConfig, Toolbox, ToolboxError};

use crate::clipboard::{ClipboardSink, default_clipboard};
use crate::surface::BrowserSurface;
use crate::{Command, OutputFormat};

pub mod dashboard;
pub mod meetings;
pub mod session;
pub mod settings;
pub mod tasks;
pub mod team;

/// Yes/no prompt used before destructive commands.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Asks on the terminal.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        eprint!("{question} [y/N]: ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "ya"))
    }
}

/// Refuses to prompt; used where stdin carries commands.
pub struct NonInteractive;

impl Confirm for NonInteractive {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        bail!("konfirmasi interaktif tidak tersedia ({question}); gunakan --yes atau --force")
    }
}

/// State shared by every command of one invocation or session.
pub struct CommandContext {
    toolbox: Toolbox,
    config: ProjectConfig,
    workdir: PathBuf,
    format: OutputFormat,
    surface: Box<dyn PrintSurface>,
    confirm: Box<dyn Confirm>,
    clipboard: Option<Box<dyn ClipboardSink>>,
}

impl CommandContext {
    pub fn new(toolbox: Toolbox, config: ProjectConfig, workdir: PathBuf, format: OutputFormat) -> Self {
        let surface = BrowserSurface::from_config(&config.export);
        Self {
            toolbox,
            config,
            workdir,
            format,
            surface: Box::new(surface),
            confirm: Box::new(NonInteractive),
            clipboard: None,
        }
    }

    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    #[cfg(test)]
    pub fn with_surface(mut self, surface: Box<dyn PrintSurface>) -> Self {
        self.surface = surface;
        self
    }

    #[cfg(test)]
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    fn clipboard(&mut self) -> &mut dyn ClipboardSink {
        self.clipboard.get_or_insert_with(default_clipboard).as_mut()
    }

    /// Run `body` with a different output format, restoring the previous one afterwards.
    pub fn with_format<T>(&mut self, format: Option<OutputFormat>, body: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.format;
        if let Some(format) = format {
            self.format = format;
        }
        let result = body(self);
        self.format = previous;
        result
    }

    /// Run `body` with prompts disabled.
    pub fn non_interactive<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.confirm, Box::new(NonInteractive));
        let result = body(self);
        self.confirm = previous;
        result
    }
}

pub fn run(command: Command, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Tasks(command) => tasks::run(command, ctx, out),
        Command::Meetings(command) => meetings::run(command, ctx, out),
        Command::Team(command) => team::run(command, ctx, out),
        Command::Dashboard { today } => dashboard::run(today, ctx, out),
        Command::Settings(command) => settings::run(command, ctx, out),
        Command::Session { file } => session::run(file.as_deref(), ctx, out),
    }
}

pub fn emit_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn toolbox_error(err: &ToolboxError) -> anyhow::Error {
    anyhow!(err.describe_user_facing())
}

pub fn filter_error(err: &FilterBuildError) -> anyhow::Error {
    anyhow!(err.describe_user_facing())
}

pub fn not_found(kind: &str, id: impl Display) -> anyhow::Error {
    anyhow!("{kind} #{id} tidak ditemukan")
}

/// Ask (unless `yes`) and carry out a deletion requested from the service.
pub fn confirm_and_delete(
    ctx: &mut CommandContext,
    pending: Option<PendingDeletion>,
    missing: &str,
    yes: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(pending) = pending else {
        writeln!(out, "{missing} tidak ditemukan; tidak ada yang dihapus")?;
        return Ok(());
    };
    let summary = pending.to_string();
    if !yes && !ctx.confirm.confirm(&format!("Hapus {summary}?"))? {
        writeln!(out, "dibatalkan")?;
        return Ok(());
    }
    if ctx.toolbox.confirm_deletion(pending) {
        writeln!(out, "dihapus: {summary}")?;
    } else {
        writeln!(out, "{summary} sudah tidak ada")?;
    }
    Ok(())
}

/// Print the plain-text minutes and try to copy them.
pub fn deliver_fallback(ctx: &mut CommandContext, text: &str, out: &mut dyn Write) -> Result<()> {
    write!(out, "{text}")?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    match ctx.clipboard().set_text(text) {
        Ok(()) => writeln!(out, "(teks notulensi disalin ke clipboard)")?,
        Err(err) => tracing::warn!(error = %err, "could not copy minutes to clipboard"),
    }
    Ok(())
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use anyhow::{Result, bail};
    use time::macros::datetime;
    use toolbox_app::{Clock, ManualClock, MinutesDocument, PrintSurface, ProjectConfig, Seed, Toolbox};
    use toolbox_core::{MemberRole, User};

    use super::{ClipboardSink, CommandContext, Confirm};
    use crate::OutputFormat;

    /// Surface that always fails, as a blocked browser would.
    pub struct BlockedSurface;

    impl PrintSurface for BlockedSurface {
        fn open(&mut self, _document: &MinutesDocument, _html: &str) -> Result<String> {
            bail!("pop-up diblokir")
        }
    }

    /// Surface that records the documents it receives.
    #[derive(Default, Clone)]
    pub struct RecordingSurface {
        pub opened: Rc<RefCell<Vec<String>>>,
    }

    impl PrintSurface for RecordingSurface {
        fn open(&mut self, document: &MinutesDocument, _html: &str) -> Result<String> {
            let location = format!("memory://{}.html", document.file_stem());
            self.opened.borrow_mut().push(location.clone());
            Ok(location)
        }
    }

    #[derive(Default, Clone)]
    pub struct RecordingClipboard {
        pub copied: Rc<RefCell<Vec<String>>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.copied.borrow_mut().push(text.to_owned());
            Ok(())
        }
    }

    pub struct Answer(pub bool);

    impl Confirm for Answer {
        fn confirm(&mut self, _question: &str) -> Result<bool> {
            Ok(self.0)
        }
    }

    /// Context over the sample data with the clock frozen at 2024-09-01 07:00 UTC.
    pub fn context() -> CommandContext {
        context_in(std::env::temp_dir())
    }

    pub fn context_in(workdir: PathBuf) -> CommandContext {
        let config = ProjectConfig::default();
        let clock: Rc<dyn Clock> = Rc::new(ManualClock::new(datetime!(2024-09-01 07:00 UTC)));
        let user = User {
            name: "Budi Santoso".into(),
            email: "budi@example.invalid".into(),
            department: Some("Sekretariat".into()),
            role: MemberRole::Leader,
        };
        let toolbox = Toolbox::new(&config, user, Seed::sample(), clock);
        CommandContext::new(toolbox, config, workdir, OutputFormat::Table)
            .with_surface(Box::new(BlockedSurface))
            .with_clipboard(Box::new(RecordingClipboard::default()))
    }

    pub fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap_or_else(|err| panic!("output must be utf8: {err}"))
    }
}
