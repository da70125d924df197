//! Scripted mode: many commands against one in-memory state.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tracing::{debug, info};

use super::CommandContext;
use crate::{Command, OutputFormat};

const PROGRAM_NAME: &str = "toolbox";

/// One session line, parsed like a regular invocation without the binary name.
#[derive(Parser, Debug)]
#[command(name = "toolbox", no_binary_name = true)]
struct SessionLine {
    /// Output format for this line only.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SessionReport {
    executed: usize,
    failed: usize,
}

pub fn run(file: Option<&Path>, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    let report = match file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("gagal membuka berkas sesi: {}", path.display()))?;
            run_lines(BufReader::new(file), ctx, out)?
        }
        None => run_lines(io::stdin().lock(), ctx, out)?,
    };
    info!(executed = report.executed, failed = report.failed, "session finished");
    writeln!(out, "sesi selesai: {} perintah, {} gagal", report.executed, report.failed)?;
    Ok(())
}

fn run_lines(input: impl BufRead, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<SessionReport> {
    ctx.non_interactive(|ctx| {
        let mut report = SessionReport::default();
        for (index, line) in input.lines().enumerate() {
            let line = line.context("gagal membaca masukan sesi")?;
            let number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            report.executed += 1;
            if let Err(err) = run_line(trimmed, ctx, out) {
                report.failed += 1;
                debug!(line = number, error = %err, "session line failed");
                writeln!(out, "baris {number}: {err:#}")?;
            }
        }
        Ok(report)
    })
}

fn run_line(line: &str, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    let mut words = shell_words::split(line).map_err(|err| anyhow!("baris tidak dapat diurai: {err}"))?;
    if words.first().is_some_and(|word| word == PROGRAM_NAME) {
        words.remove(0);
    }
    let SessionLine { format, cmd } =
        SessionLine::try_parse_from(words).map_err(|err| anyhow!(err.to_string().trim_end().to_owned()))?;
    if matches!(cmd, Command::Session { .. }) {
        bail!("sesi bersarang tidak didukung");
    }
    ctx.with_format(format, |ctx| super::run(cmd, ctx, out))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::commands::testing::{Answer, context, output};
    use toolbox_core::{EntityId, TaskStatus};

    fn session(ctx: &mut CommandContext, script: &str) -> (SessionReport, String) {
        let mut buffer = Vec::new();
        let report = run_lines(Cursor::new(script.to_owned()), ctx, &mut buffer)
            .unwrap_or_else(|err| panic!("session failed: {err:#}"));
        (report, output(buffer))
    }

    #[test]
    fn state_carries_across_lines() {
        let mut ctx = context();
        let script = r#"
# new task, then drag it to done
tasks add --title "Susun notulen" --due 2024-09-10 --assignee "Dewi Lestari"
toolbox tasks move 6 completed
"#;
        let (report, text) = session(&mut ctx, script);
        assert_eq!(report, SessionReport { executed: 2, failed: 0 });
        assert!(text.contains("tugas dibuat: #6 Susun notulen"));
        assert!(text.contains("tugas #6 dipindah: To Do -> Selesai"));
        let task = ctx.toolbox.tasks().get(EntityId(6)).map(|task| task.status);
        assert_eq!(task, Some(TaskStatus::Completed));
    }

    #[test]
    fn failures_are_reported_and_the_session_continues() {
        let mut ctx = context();
        let script = "tasks explode\nmeetings show 42\ntasks add --title 'x' --due nanti\nteam show 1\n";
        let (report, text) = session(&mut ctx, script);
        assert_eq!(report, SessionReport { executed: 4, failed: 3 });
        assert!(text.contains("baris 1: "));
        assert!(text.contains("baris 2: rapat #42 tidak ditemukan"));
        assert!(text.contains("baris 3: "));
        assert!(text.contains("#1 Budi Santoso"));
    }

    #[test]
    fn unbalanced_quotes_fail_only_their_line() {
        let mut ctx = context();
        let (report, text) = session(&mut ctx, "tasks add --title \"tanpa penutup\ndashboard --today 2024-09-01\n");
        assert_eq!(report.failed, 1);
        assert!(text.contains("baris 1: baris tidak dapat diurai"));
        assert!(text.contains("Ringkasan per"));
    }

    #[test]
    fn deletes_need_yes_inside_sessions() {
        let mut ctx = context().with_confirm(Box::new(Answer(true)));
        let (report, text) = session(&mut ctx, "tasks delete 3\ntasks delete 4 --yes\n");
        assert_eq!(report.failed, 1);
        assert!(text.contains("gunakan --yes"));
        assert!(ctx.toolbox.tasks().contains(EntityId(3)));
        assert!(!ctx.toolbox.tasks().contains(EntityId(4)));
    }

    #[test]
    fn per_line_format_does_not_leak() {
        let mut ctx = context();
        let (_, text) = session(&mut ctx, "dashboard --format json\ndashboard\n");
        assert!(text.starts_with("{\n"));
        assert!(text.contains("Ringkasan per"));
        assert_eq!(ctx.format, OutputFormat::Table);
    }

    #[test]
    fn nested_sessions_are_rejected() {
        let mut ctx = context();
        let (report, text) = session(&mut ctx, "session\n");
        assert_eq!(report.failed, 1);
        assert!(text.contains("sesi bersarang tidak didukung"));
    }

    #[test]
    fn run_reads_script_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("demo.txt");
        std::fs::write(&path, "# kosong\n\nteam show 2\n")?;
        let mut ctx = context();
        let mut buffer = Vec::new();
        run(Some(&path), &mut ctx, &mut buffer)?;
        let text = output(buffer);
        assert!(text.starts_with("#2 Siti Aminah\n"));
        assert!(text.ends_with("sesi selesai: 1 perintah, 0 gagal\n"));
        Ok(())
    }
}
