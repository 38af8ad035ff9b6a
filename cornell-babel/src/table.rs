//! Cornell table parsing
//!
//! Two syntaxes are accepted.
//!
//! Header-delimited:
//!
//! ```text
//! ### Cue Column | Notes Section
//! ---|---
//! **What is alpha?** | • excess return over the benchmark
//! | • continuation with an empty cue
//! a line without a pipe also continues the previous notes
//! ```
//!
//! Dash-prefixed:
//!
//! ```text
//! - Beta | • sensitivity to the market
//! | • continuation line
//! - a dash line without a pipe is a continuation too
//! ```
//!
//! Rows split on the first `|` only. The input is already shielded, so a `|` inside math never
//! splits a row. Malformed rows never fail: they are folded into the previous row's notes.

use crate::assembler::atx_heading;
use crate::ir::nodes::{CornellTable, CuePair, TableHeader, TableSyntax};

impl TableSyntax {
    /// The syntax a table starting with `line` uses, if `line` starts a table at all.
    pub fn detect(line: &str) -> Option<TableSyntax> {
        if is_table_header(line) {
            Some(TableSyntax::HeaderDelimited)
        } else if is_dash_row(line) {
            Some(TableSyntax::DashPrefixed)
        } else {
            None
        }
    }
}

/// `### cue label | notes label`
pub fn is_table_header(line: &str) -> bool {
    matches!(atx_heading(line), Some((3, text)) if text.contains('|'))
}

/// `- cue | notes`
pub fn is_dash_row(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("- ") && line.contains('|')
}

/// `---|---`, `|:---|---:|` and similar.
pub fn is_separator(line: &str) -> bool {
    let line = line.trim();
    line.contains('-')
        && line.contains('|')
        && line.chars().all(|c| matches!(c, '-' | '|' | ':' | ' '))
}

/// Parses a contiguous block of table lines.
///
/// Returns `None` when the first non-blank line does not start a table. A table whose body has no
/// rows comes back with an empty `rows` vector.
pub fn parse_table(lines: &[&str]) -> Option<CornellTable> {
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    let lines = &lines[start..];
    let syntax = TableSyntax::detect(lines[0])?;

    let table = match syntax {
        TableSyntax::HeaderDelimited => {
            let header = atx_heading(lines[0])
                .and_then(|(_, text)| text.split_once('|'))
                .map(|(cue, notes)| TableHeader {
                    cue: cue.trim().to_string(),
                    notes: notes.trim().to_string(),
                });
            let mut body = &lines[1..];
            if body.first().is_some_and(|line| is_header_underline(line)) {
                body = &body[1..];
            }
            CornellTable {
                syntax,
                header,
                rows: parse_header_rows(body),
            }
        }
        TableSyntax::DashPrefixed => CornellTable {
            syntax,
            header: None,
            rows: parse_dash_rows(lines),
        },
    };
    Some(table)
}

/// Rows of a header-delimited table (header and separator already removed).
pub fn parse_header_rows(lines: &[&str]) -> Vec<CuePair> {
    let mut pairs: Vec<CuePair> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() || is_separator(line) {
            continue;
        }
        match line.split_once('|') {
            Some((cue, notes)) => {
                let cue = cue.trim();
                let notes = strip_trailing_pipe(notes);
                if cue.is_empty() {
                    continue_notes(&mut pairs, notes);
                } else {
                    pairs.push(CuePair::new(cue, notes));
                }
            }
            None => continue_notes(&mut pairs, line),
        }
    }
    pairs
}

/// Rows of a dash-prefixed table.
pub fn parse_dash_rows(lines: &[&str]) -> Vec<CuePair> {
    let mut pairs: Vec<CuePair> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_dash_row(line) {
            let row = &line[2..];
            if let Some((cue, notes)) = row.split_once('|') {
                pairs.push(CuePair::new(cue.trim(), strip_trailing_pipe(notes)));
            }
        } else if let Some(rest) = line.strip_prefix('|') {
            continue_notes(&mut pairs, strip_trailing_pipe(rest));
        } else {
            continue_notes(&mut pairs, line);
        }
    }
    pairs
}

/// One rendered line of a notes cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLine<'a> {
    pub bullet: bool,
    pub text: &'a str,
}

/// Splits notes into display lines.
///
/// Lines break at newlines and at inline ` • ` separators. A leading `•`, `- ` or `* ` marks a
/// bullet and is removed from the text.
pub fn note_lines(notes: &str) -> Vec<NoteLine<'_>> {
    let mut lines = Vec::new();
    for line in notes.split('\n') {
        for (position, piece) in line.split(" • ").enumerate() {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let marked = piece
                .strip_prefix('•')
                .or_else(|| piece.strip_prefix("- "))
                .or_else(|| piece.strip_prefix("* "));
            lines.push(match marked {
                Some(text) => NoteLine {
                    bullet: true,
                    text: text.trim_start(),
                },
                // Everything after an inline separator was introduced by a bullet.
                None => NoteLine {
                    bullet: position > 0,
                    text: piece,
                },
            });
        }
    }
    lines
}

/// The line right after a table header may be a separator or a bare `---`.
pub(crate) fn is_header_underline(line: &str) -> bool {
    let line = line.trim();
    is_separator(line) || (line.len() >= 3 && line.chars().all(|c| c == '-'))
}

fn continue_notes(pairs: &mut Vec<CuePair>, text: &str) {
    match pairs.last_mut() {
        Some(last) => last.append_notes(text),
        None if !text.is_empty() => pairs.push(CuePair::new("", text)),
        None => {}
    }
}

fn strip_trailing_pipe(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix('|').map_or(text, str::trim_end)
}
