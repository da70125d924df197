//! Meeting minutes (notulensi) rendering and hand-off to a print surface.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use toolbox_core::datefmt::{format_long_date, format_time};
use toolbox_core::{EntityId, Meeting};
use tracing::{info, warn};

use crate::config::ExportConfig;

const STYLE: &str = "\
body{font-family:'Segoe UI',Arial,sans-serif;color:#1f2933;margin:2.5cm;line-height:1.5}\
header{text-align:center;border-bottom:2px solid #1f2933;padding-bottom:12px;margin-bottom:24px}\
header .org{font-size:13px;letter-spacing:2px;text-transform:uppercase;color:#52606d}\
header h1{font-size:22px;margin:6px 0 0}\
table.meta{border-collapse:collapse;margin-bottom:24px}\
table.meta th{text-align:left;padding:2px 16px 2px 0;font-weight:600;vertical-align:top}\
table.meta td{padding:2px 0}\
h2{font-size:16px;border-bottom:1px solid #cbd2d9;padding-bottom:4px;margin-top:28px}\
.participants{display:grid;grid-template-columns:1fr 1fr;gap:8px 24px}\
.participant .name{font-weight:600}\
.participant .role{color:#52606d;font-size:13px}\
ol.agenda li{margin-bottom:8px}\
.agenda-status{font-size:12px;color:#52606d;margin-left:8px}\
.agenda-description{margin:2px 0 0;color:#3e4c59}\
.notes{white-space:pre-wrap}\
@media print{body{margin:1.5cm}}";

/// Participant entry of the minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantLine {
    /// Display name as recorded on the meeting.
    pub name: String,
    /// Meeting role shown under the name.
    pub role: String,
}

/// Agenda entry of the minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaLine {
    /// 1-based position.
    pub number: u32,
    /// Agenda title.
    pub title: String,
    /// Printed below the title when present.
    pub description: Option<String>,
    /// Discussion status, e.g. `Belum Dibahas`.
    pub status_label: String,
}

/// Content model shared by the HTML and plain-text renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinutesDocument {
    /// Source meeting.
    pub meeting_id: EntityId,
    /// Header line above the title, from the export settings.
    pub organization: String,
    /// Meeting title.
    pub title: String,
    /// Long Indonesian date, e.g. `Kamis, 12 September 2024`.
    pub date_label: String,
    /// Start and end time, e.g. `10:00 – 11:00`.
    pub time_range: String,
    /// Omitted from the output when blank.
    pub location: Option<String>,
    /// Organizer name.
    pub organizer: String,
    /// Meeting status label.
    pub status_label: String,
    /// In the order they were recorded.
    pub participants: Vec<ParticipantLine>,
    /// Numbered from 1 in agenda order.
    pub agendas: Vec<AgendaLine>,
    /// Recorded minutes text.
    pub notes: Option<String>,
    /// Whether the HTML asks the browser to print on load.
    pub auto_print: bool,
}

impl MinutesDocument {
    /// Collect everything the minutes show, in print order.
    #[must_use]
    pub fn from_meeting(meeting: &Meeting, config: &ExportConfig) -> Self {
        let mut agendas: Vec<_> = meeting.agendas.iter().collect();
        agendas.sort_by_key(|agenda| agenda.order);

        Self {
            meeting_id: meeting.id,
            organization: config.organization.clone(),
            title: meeting.title.clone(),
            date_label: format_long_date(meeting.date),
            time_range: format!(
                "{} – {}",
                format_time(meeting.start_time),
                format_time(meeting.end_time())
            ),
            location: meeting
                .location
                .as_deref()
                .map(str::trim)
                .filter(|location| !location.is_empty())
                .map(str::to_owned),
            organizer: meeting.organizer.clone(),
            status_label: meeting.status.label().to_owned(),
            participants: meeting
                .participants
                .iter()
                .map(|participant| ParticipantLine {
                    name: participant.name.clone(),
                    role: participant.role.clone(),
                })
                .collect(),
            agendas: agendas
                .into_iter()
                .zip(1..)
                .map(|(agenda, number)| AgendaLine {
                    number,
                    title: agenda.title.clone(),
                    description: agenda.description.clone(),
                    status_label: agenda.status.label().to_owned(),
                })
                .collect(),
            notes: meeting.minutes().map(str::to_owned),
            auto_print: config.auto_print,
        }
    }

    /// File name stem for the exported document, e.g. `notulensi-3-rapat-koordinasi`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let mut slug = String::new();
        for ch in self.title.chars() {
            if ch.is_alphanumeric() {
                slug.extend(ch.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            format!("notulensi-{}", self.meeting_id)
        } else {
            format!("notulensi-{}-{slug}", self.meeting_id)
        }
    }

    /// Self-contained printable HTML page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>Notulensi - {}</title>", escape_html(&self.title));
        let _ = writeln!(html, "<style>{STYLE}</style>");
        html.push_str("</head>\n");
        if self.auto_print {
            html.push_str("<body onload=\"window.print()\">\n");
        } else {
            html.push_str("<body>\n");
        }

        let _ = writeln!(
            html,
            "<header>\n<div class=\"org\">{}</div>\n<h1>Notulensi Rapat: {}</h1>\n</header>",
            escape_html(&self.organization),
            escape_html(&self.title)
        );

        html.push_str("<table class=\"meta\">\n");
        for (label, value) in self.metadata() {
            let _ = writeln!(
                html,
                "<tr><th>{label}</th><td>{}</td></tr>",
                escape_html(value)
            );
        }
        html.push_str("</table>\n");

        html.push_str("<section>\n<h2>Peserta</h2>\n<div class=\"participants\">\n");
        for participant in &self.participants {
            let _ = writeln!(
                html,
                "<div class=\"participant\"><div class=\"name\">{}</div><div class=\"role\">{}</div></div>",
                escape_html(&participant.name),
                escape_html(&participant.role)
            );
        }
        html.push_str("</div>\n</section>\n");

        html.push_str("<section>\n<h2>Agenda</h2>\n<ol class=\"agenda\">\n");
        for agenda in &self.agendas {
            let _ = write!(
                html,
                "<li class=\"agenda-item\" value=\"{}\"><strong>{}</strong><span class=\"agenda-status\">{}</span>",
                agenda.number,
                escape_html(&agenda.title),
                escape_html(&agenda.status_label)
            );
            if let Some(description) = agenda.description.as_deref() {
                let _ = write!(
                    html,
                    "<p class=\"agenda-description\">{}</p>",
                    escape_html(description)
                );
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ol>\n</section>\n");

        if let Some(notes) = self.notes.as_deref() {
            let _ = writeln!(
                html,
                "<section>\n<h2>Catatan</h2>\n<div class=\"notes\">{}</div>\n</section>",
                escape_html(notes)
            );
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Plain-text rendering used when no print surface is available.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{}", self.organization.to_uppercase());
        let heading = format!("NOTULENSI RAPAT: {}", self.title);
        let _ = writeln!(text, "{heading}");
        let _ = writeln!(text, "{}", "=".repeat(heading.chars().count()));
        for (label, value) in self.metadata() {
            let _ = writeln!(text, "{label:<10}: {value}");
        }

        text.push_str("\nPeserta\n-------\n");
        if self.participants.is_empty() {
            text.push_str("(tidak ada)\n");
        }
        for participant in &self.participants {
            let _ = writeln!(text, "- {} ({})", participant.name, participant.role);
        }

        text.push_str("\nAgenda\n------\n");
        if self.agendas.is_empty() {
            text.push_str("(tidak ada)\n");
        }
        for agenda in &self.agendas {
            let _ = writeln!(
                text,
                "{}. {} [{}]",
                agenda.number, agenda.title, agenda.status_label
            );
            if let Some(description) = agenda.description.as_deref() {
                let _ = writeln!(text, "   {description}");
            }
        }

        if let Some(notes) = self.notes.as_deref() {
            text.push_str("\nCatatan\n-------\n");
            text.push_str(notes);
            text.push('\n');
        }
        text
    }

    fn metadata(&self) -> Vec<(&'static str, &str)> {
        let mut rows = vec![("Tanggal", self.date_label.as_str()), ("Waktu", self.time_range.as_str())];
        if let Some(location) = self.location.as_deref() {
            rows.push(("Tempat", location));
        }
        rows.push(("Pemimpin", self.organizer.as_str()));
        rows.push(("Status", self.status_label.as_str()));
        rows
    }
}

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Destination able to display a printable document.
pub trait PrintSurface {
    /// Present `html` for printing and return where it ended up.
    ///
    /// # Errors
    /// Returns an error when the surface is unavailable or refuses the document.
    fn open(&mut self, document: &MinutesDocument, html: &str) -> Result<String>;
}

/// How an export finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The print surface accepted the document.
    Opened {
        /// Path or URL of the opened document.
        location: String,
    },
    /// The surface failed; the plain-text minutes are handed back instead.
    Fallback {
        /// Plain-text rendering of the minutes.
        text: String,
        /// Why the surface failed.
        reason: String,
    },
}

/// Render `document` and hand it to `surface`, degrading to plain text on failure.
pub fn export_minutes(document: &MinutesDocument, surface: &mut dyn PrintSurface) -> ExportOutcome {
    let html = document.to_html();
    match surface.open(document, &html) {
        Ok(location) => {
            info!(meeting = %document.meeting_id, %location, "minutes exported");
            ExportOutcome::Opened { location }
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(
                meeting = %document.meeting_id,
                error = %reason,
                "print surface unavailable, falling back to text"
            );
            ExportOutcome::Fallback {
                text: document.to_plain_text(),
                reason,
            }
        }
    }
}
