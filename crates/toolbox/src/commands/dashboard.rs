use std::io::Write;

use anyhow::Result;
use time::Date;
use toolbox_core::datefmt::{format_date, format_long_date, format_time};

use super::{CommandContext, emit_json};
use crate::OutputFormat;

pub fn run(today: Option<Date>, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    let today = today.unwrap_or_else(|| ctx.toolbox.today());
    let summary = ctx.toolbox.dashboard(today);
    if ctx.format == OutputFormat::Json {
        return emit_json(out, &summary);
    }

    let board = ctx.toolbox.board();
    writeln!(out, "Ringkasan per {}", format_long_date(summary.today))?;
    writeln!(out)?;
    writeln!(
        out,
        "Tugas: {} (selesai {}%, terlambat {})",
        summary.total_tasks, summary.completion_percent, summary.overdue_tasks
    )?;
    for (status, count) in &summary.tasks_by_status {
        writeln!(out, "  {:<20}{count}", board.label_for(*status))?;
    }
    writeln!(
        out,
        "Anggota aktif: {} dari {}",
        summary.active_members, summary.total_members
    )?;

    writeln!(out)?;
    if summary.upcoming_meetings.is_empty() {
        writeln!(out, "Tidak ada rapat mendatang")?;
        return Ok(());
    }
    writeln!(out, "Rapat mendatang:")?;
    for meeting in &summary.upcoming_meetings {
        write!(
            out,
            "  {} {}  #{} {}",
            format_date(meeting.date),
            format_time(meeting.start_time),
            meeting.id,
            meeting.title
        )?;
        match &meeting.location {
            Some(location) => writeln!(out, " ({location})")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, output};
    use time::macros::date;

    #[test]
    fn summary_lists_counts_and_meetings() {
        let mut ctx = context();
        let mut buffer = Vec::new();
        run(None, &mut ctx, &mut buffer).unwrap_or_else(|err| panic!("dashboard failed: {err:#}"));
        let text = output(buffer);
        assert!(text.starts_with("Ringkasan per Minggu, 1 September 2024\n"));
        assert!(text.contains("Tugas: 5 (selesai 20%, terlambat 2)\n"));
        assert!(text.contains("Anggota aktif: 4 dari 5\n"));
        assert!(text.contains("  2024-09-02 13:30  #2 Koordinasi Persiapan Audit (Daring (Zoom))\n"));
        assert!(!text.contains("Rapat Panitia Gathering"));
    }

    #[test]
    fn json_summary_uses_requested_day() -> Result<()> {
        let mut ctx = context();
        ctx.format = OutputFormat::Json;
        let mut buffer = Vec::new();
        run(Some(date!(2024 - 09 - 03)), &mut ctx, &mut buffer)?;
        let value: serde_json::Value = serde_json::from_slice(&buffer)?;
        assert_eq!(value["today"], "2024-09-03");
        assert_eq!(value["upcomingMeetings"].as_array().map(Vec::len), Some(0));
        Ok(())
    }
}
