use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use serde_json::json;
use time::{Date, Time};
use toolbox_app::{
    CreateMeetingInput, ExportOutcome, FilteredView, MeetingFilterBuilder, MeetingSort, ParticipantInput,
    export_minutes,
};
use toolbox_core::datefmt::{format_date, format_long_date, format_time, parse_date, parse_time};
use toolbox_core::{AgendaDraft, AgendaStatus, EntityId, Meeting, MeetingPatch, MeetingStatus, OptionalPatch};

use super::{
    CommandContext, confirm_and_delete, deliver_fallback, emit_json, filter_error, not_found, toolbox_error,
};
use crate::OutputFormat;
use crate::table::render_table;

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// List meetings by date.
    List {
        /// Case-insensitive search over title, organizer and location.
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Earliest day (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Latest day (YYYY-MM-DD).
        #[arg(long)]
        until: Option<String>,
    },

    /// Show one meeting with its agenda and minutes.
    Show { id: EntityId },

    /// Schedule a meeting.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = parse_date)]
        date: Date,
        /// Start time (HH:MM).
        #[arg(long, value_parser = parse_time)]
        start: Time,
        /// Length in minutes.
        #[arg(long, default_value_t = 60)]
        duration: u32,
        #[arg(long)]
        location: Option<String>,
        /// Defaults to the current user.
        #[arg(long)]
        organizer: Option<String>,
        /// Agenda item title; repeat for several items.
        #[arg(short = 'a', long = "agenda")]
        agendas: Vec<String>,
        /// Participant as `Name` or `Name:Role`; repeat for several.
        #[arg(short = 'p', long = "participant")]
        participants: Vec<String>,
    },

    /// Edit meeting details. An empty location clears it.
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long, value_parser = parse_time)]
        start: Option<Time>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        status: Option<MeetingStatus>,
    },

    /// Append an agenda item.
    AgendaAdd {
        meeting: EntityId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Set the discussion status of an agenda item.
    AgendaStatus {
        meeting: EntityId,
        agenda: EntityId,
        status: AgendaStatus,
    },

    /// Move an agenda item to a 1-based position.
    AgendaMove {
        meeting: EntityId,
        agenda: EntityId,
        position: usize,
    },

    /// Remove an agenda item.
    AgendaRemove { meeting: EntityId, agenda: EntityId },

    /// Record the minutes and close the meeting.
    Minutes {
        meeting: EntityId,
        #[arg(long, required_unless_present = "file")]
        notes: Option<String>,
        /// Read the notes from a file.
        #[arg(long, conflicts_with = "notes")]
        file: Option<PathBuf>,
    },

    /// Copy carry-over agenda items into another meeting.
    CarryOver { from: EntityId, to: EntityId },

    /// Export the minutes (notulensi) as a printable document.
    Export { meeting: EntityId },

    /// Delete a meeting.
    Delete {
        id: EntityId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[allow(clippy::too_many_lines)]
pub fn run(command: MeetingCommand, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        MeetingCommand::List {
            text,
            status,
            from,
            until,
        } => {
            let filter = MeetingFilterBuilder::new()
                .with_text(text)
                .with_status(status.as_deref())
                .and_then(|builder| builder.with_date_range(from.as_deref(), until.as_deref()))
                .map_err(|err| filter_error(&err))?
                .build();
            let meetings = ctx.toolbox.meetings();
            let mut view = FilteredView::new(meetings, filter, MeetingSort::Date);
            let visible = view.visible(meetings);
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &visible);
            }
            if visible.is_empty() {
                writeln!(out, "Tidak ada rapat")?;
                return Ok(());
            }
            let rows: Vec<Vec<String>> = visible
                .iter()
                .map(|meeting| {
                    vec![
                        meeting.id.to_string(),
                        format_date(meeting.date),
                        format_time(meeting.start_time),
                        meeting.title.clone(),
                        meeting.location.clone().unwrap_or_default(),
                        meeting.status.label().to_owned(),
                        meeting.agendas.len().to_string(),
                    ]
                })
                .collect();
            render_table(out, &["ID", "Tanggal", "Mulai", "Judul", "Tempat", "Status", "Agenda"], &rows)?;
            Ok(())
        }
        MeetingCommand::Show { id } => {
            let meeting = ctx.toolbox.meetings().get(id).ok_or_else(|| not_found("rapat", id))?;
            if ctx.format == OutputFormat::Json {
                return emit_json(out, meeting);
            }
            render_meeting(out, meeting)
        }
        MeetingCommand::Add {
            title,
            date,
            start,
            duration,
            location,
            organizer,
            agendas,
            participants,
        } => {
            let agendas = agendas
                .into_iter()
                .map(|title| AgendaDraft {
                    title,
                    ..AgendaDraft::default()
                })
                .collect();
            let participants = participants.iter().map(String::as_str).map(parse_participant).collect();
            let meeting = ctx
                .toolbox
                .create_meeting(CreateMeetingInput {
                    title,
                    date,
                    start_time: start,
                    duration_minutes: duration,
                    location,
                    organizer,
                    agendas,
                    participants,
                })
                .map_err(|err| toolbox_error(&err))?;
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &meeting);
            }
            writeln!(
                out,
                "rapat dijadwalkan: #{} {} ({} {})",
                meeting.id,
                meeting.title,
                format_date(meeting.date),
                format_time(meeting.start_time)
            )?;
            Ok(())
        }
        MeetingCommand::Update {
            id,
            title,
            date,
            start,
            duration,
            location,
            status,
        } => {
            let patch = MeetingPatch {
                title,
                date,
                start_time: start,
                duration_minutes: duration,
                location: location.as_deref().map(OptionalPatch::from_text),
                status,
                participants: None,
            };
            if patch == MeetingPatch::default() {
                bail!("tidak ada perubahan yang diberikan");
            }
            if !ctx.toolbox.update_meeting(id, patch).map_err(|err| toolbox_error(&err))? {
                return Err(not_found("rapat", id));
            }
            writeln!(out, "rapat #{id} diperbarui")?;
            Ok(())
        }
        MeetingCommand::AgendaAdd {
            meeting,
            title,
            description,
        } => {
            let draft = AgendaDraft {
                title,
                description,
                status: AgendaStatus::Pending,
            };
            let agenda = ctx
                .toolbox
                .add_agenda(meeting, draft)
                .map_err(|err| toolbox_error(&err))?
                .ok_or_else(|| not_found("rapat", meeting))?;
            writeln!(out, "agenda #{agenda} ditambahkan ke rapat #{meeting}")?;
            Ok(())
        }
        MeetingCommand::AgendaStatus {
            meeting,
            agenda,
            status,
        } => {
            if !ctx.toolbox.set_agenda_status(meeting, agenda, status) {
                return Err(agenda_not_found(meeting, agenda));
            }
            writeln!(out, "agenda #{agenda} pada rapat #{meeting}: {}", status.label())?;
            Ok(())
        }
        MeetingCommand::AgendaMove {
            meeting,
            agenda,
            position,
        } => {
            if !ctx.toolbox.reorder_agenda(meeting, agenda, position) {
                return Err(agenda_not_found(meeting, agenda));
            }
            writeln!(out, "agenda #{agenda} dipindah ke urutan {position}")?;
            Ok(())
        }
        MeetingCommand::AgendaRemove { meeting, agenda } => {
            if !ctx.toolbox.remove_agenda(meeting, agenda) {
                return Err(agenda_not_found(meeting, agenda));
            }
            writeln!(out, "agenda #{agenda} dihapus dari rapat #{meeting}")?;
            Ok(())
        }
        MeetingCommand::Minutes { meeting, notes, file } => {
            let notes = match (notes, file) {
                (Some(notes), _) => notes,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("gagal membaca notulensi dari {}", path.display()))?,
                (None, None) => bail!("berikan --notes atau --file"),
            };
            if !ctx.toolbox.save_minutes(meeting, &notes).map_err(|err| toolbox_error(&err))? {
                return Err(not_found("rapat", meeting));
            }
            writeln!(out, "notulensi rapat #{meeting} disimpan; status: {}", MeetingStatus::Completed.label())?;
            Ok(())
        }
        MeetingCommand::CarryOver { from, to } => {
            if !ctx.toolbox.meetings().contains(from) {
                return Err(not_found("rapat", from));
            }
            if !ctx.toolbox.meetings().contains(to) {
                return Err(not_found("rapat", to));
            }
            let count = ctx.toolbox.carry_over(from, to);
            writeln!(out, "{count} agenda dilanjutkan dari rapat #{from} ke rapat #{to}")?;
            Ok(())
        }
        MeetingCommand::Export { meeting } => {
            let document = ctx
                .toolbox
                .minutes_document(meeting)
                .ok_or_else(|| not_found("rapat", meeting))?;
            match export_minutes(&document, ctx.surface.as_mut()) {
                ExportOutcome::Opened { location } => {
                    if ctx.format == OutputFormat::Json {
                        return emit_json(out, &json!({ "status": "opened", "location": location }));
                    }
                    writeln!(out, "notulensi dibuka: {location}")?;
                }
                ExportOutcome::Fallback { text, reason } => {
                    if ctx.format == OutputFormat::Json {
                        return emit_json(out, &json!({ "status": "fallback", "reason": reason, "text": text }));
                    }
                    writeln!(out, "dokumen tidak dapat dibuka ({reason}); menampilkan teks notulensi:")?;
                    writeln!(out)?;
                    deliver_fallback(ctx, &text, out)?;
                }
            }
            Ok(())
        }
        MeetingCommand::Delete { id, yes } => {
            let pending = ctx.toolbox.request_meeting_deletion(id);
            confirm_and_delete(ctx, pending, &format!("rapat #{id}"), yes, out)
        }
    }
}

fn agenda_not_found(meeting: EntityId, agenda: EntityId) -> anyhow::Error {
    anyhow::anyhow!("agenda #{agenda} tidak ditemukan pada rapat #{meeting}")
}

/// `Name` or `Name:Role`.
fn parse_participant(raw: &str) -> ParticipantInput {
    match raw.split_once(':') {
        Some((name, role)) => ParticipantInput {
            name: name.trim().to_owned(),
            role: Some(role.trim().to_owned()).filter(|role| !role.is_empty()),
        },
        None => ParticipantInput {
            name: raw.trim().to_owned(),
            role: None,
        },
    }
}

fn render_meeting(out: &mut dyn Write, meeting: &Meeting) -> Result<()> {
    writeln!(out, "#{} {}", meeting.id, meeting.title)?;
    writeln!(out, "Tanggal : {}", format_long_date(meeting.date))?;
    writeln!(
        out,
        "Waktu   : {} - {} ({} menit)",
        format_time(meeting.start_time),
        format_time(meeting.end_time()),
        meeting.duration_minutes
    )?;
    writeln!(out, "Tempat  : {}", meeting.location.as_deref().unwrap_or("-"))?;
    writeln!(out, "Pemimpin: {}", meeting.organizer)?;
    writeln!(out, "Status  : {}", meeting.status.label())?;

    writeln!(out)?;
    writeln!(out, "Peserta ({}):", meeting.participants.len())?;
    for participant in &meeting.participants {
        writeln!(out, "  - {} ({})", participant.name, participant.role)?;
    }

    writeln!(out)?;
    writeln!(out, "Agenda ({}):", meeting.agendas.len())?;
    for agenda in &meeting.agendas {
        writeln!(
            out,
            "  {}. {} [{}] (agenda #{})",
            agenda.order,
            agenda.title,
            agenda.status.label(),
            agenda.id
        )?;
    }

    if let Some(notes) = meeting.minutes() {
        writeln!(out)?;
        writeln!(out, "Notulensi:")?;
        for line in notes.lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}
