//! Clipboard sinks used when an export degrades to plain text.

use std::io::{self, Write};

use anyhow::{Context, Result};
use arboard::Clipboard as ArboardClipboard;
use base64::{Engine as _, engine::general_purpose::STANDARD as Base64Standard};
use tracing::warn;

/// Destination for copied minutes.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    inner: ArboardClipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let inner = ArboardClipboard::new().context("gagal menginisialisasi clipboard")?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .context("gagal menulis ke clipboard")
    }
}

/// Terminal clipboard via the OSC 52 escape. Written to stderr so piped stdout stays clean.
struct Osc52Clipboard;

impl ClipboardSink for Osc52Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let sequence = osc52_sequence(text);
        let mut stderr = io::stderr().lock();
        stderr
            .write_all(sequence.as_bytes())
            .context("gagal mengirim sekuens OSC 52")?;
        stderr.flush().context("gagal mem-flush sekuens OSC 52")?;
        Ok(())
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = Base64Standard.encode(text);
    format!("\x1b]52;c;{encoded}\x07")
}

/// System clipboard when reachable, OSC 52 otherwise.
pub fn default_clipboard() -> Box<dyn ClipboardSink> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(err) => {
            warn!(error = %err, "system clipboard unavailable, falling back to OSC 52");
            Box::new(Osc52Clipboard)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_wraps_base64_payload() {
        assert_eq!(osc52_sequence("notulensi"), "\x1b]52;c;bm90dWxlbnNp\x07");
    }

    #[test]
    fn osc52_sequence_handles_multibyte_text() {
        let sequence = osc52_sequence("Rapat – 13:30");
        assert!(sequence.starts_with("\x1b]52;c;"));
        assert!(sequence.ends_with('\x07'));
        let payload = &sequence["\x1b]52;c;".len()..sequence.len() - 1];
        let decoded = Base64Standard
            .decode(payload)
            .unwrap_or_else(|err| panic!("payload must be base64: {err}"));
        assert_eq!(decoded, "Rapat – 13:30".as_bytes());
    }
}
