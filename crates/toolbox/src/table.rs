//! Plain-text table rendering for listings.

use std::borrow::Cow;
use std::io::{self, Write};

use unicode_segmentation::UnicodeSegmentation;

/// Widest a single cell may render before it is truncated.
pub const MAX_CELL_WIDTH: usize = 40;

const COLUMN_GAP: &str = "  ";

pub fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = grapheme_len(input);
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        return Cow::Owned(input.graphemes(true).take(max_graphemes).collect());
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = input.graphemes(true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

fn grapheme_len(input: &str) -> usize {
    input.graphemes(true).count()
}

/// Write `rows` under `headers` with aligned, truncated columns.
pub fn render_table(out: &mut dyn Write, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|header| grapheme_len(header)).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            let width = grapheme_len(cell).min(MAX_CELL_WIDTH);
            match widths.get_mut(index) {
                Some(slot) => *slot = (*slot).max(width),
                None => widths.push(width),
            }
        }
    }

    write_row(out, &widths, headers.iter().copied())?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(out, &widths, rule.iter().map(String::as_str))?;
    for row in rows {
        write_row(out, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_row<'a>(out: &mut dyn Write, widths: &[usize], cells: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let mut line = String::new();
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        let width = widths.get(index).copied().unwrap_or(MAX_CELL_WIDTH);
        let shown = truncate_with_ellipsis(cell, width);
        let padding = width.saturating_sub(grapheme_len(&shown));
        line.push_str(&shown);
        line.extend(std::iter::repeat_n(' ', padding));
    }
    writeln!(out, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_input() {
        assert_eq!(truncate_with_ellipsis("Audit", 10), "Audit");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Perbarui situs internal", 11), "Perbarui...");
    }

    #[test]
    fn truncate_counts_graphemes() {
        assert_eq!(truncate_with_ellipsis("e\u{301}e\u{301}e\u{301}", 2), "e\u{301}e\u{301}");
    }

    #[test]
    fn table_aligns_columns() {
        let mut out = Vec::new();
        let rows = vec![
            vec!["1".to_owned(), "Audit kas kecil".to_owned()],
            vec!["12".to_owned(), "Rapat".to_owned()],
        ];
        render_table(&mut out, &["ID", "Judul"], &rows).unwrap_or_else(|err| panic!("render: {err}"));
        let text = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID  Judul");
        assert_eq!(lines[1], "--  ---------------");
        assert_eq!(lines[2], "1   Audit kas kecil");
        assert_eq!(lines[3], "12  Rapat");
    }

    #[test]
    fn table_truncates_wide_cells() {
        let mut out = Vec::new();
        let rows = vec![vec!["x".repeat(MAX_CELL_WIDTH + 10)]];
        render_table(&mut out, &["Judul"], &rows).unwrap_or_else(|err| panic!("render: {err}"));
        let text = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));
        let last = text.lines().last().unwrap_or_default();
        assert_eq!(grapheme_len(last), MAX_CELL_WIDTH);
        assert!(last.ends_with("..."));
    }
}
