//! Document assembly
//!
//!     Walks the shielded markdown line by line and classifies it into blocks. The scanner is an
//!     explicit state machine:
//!
//!         ScanningTopLevel ──table trigger──▶ ParsingTable ──▶ ScanningTopLevel
//!                          ──heading───────▶ EmitHeading  ──▶ ScanningTopLevel
//!                          ──"Summary"─────▶ EmitSummary  ──▶ ScanningTopLevel
//!                          ──rule──────────▶ EmitRule     ──▶ ScanningTopLevel
//!                          ──anything else─▶ EmitParagraph ─▶ ScanningTopLevel
//!                          ──end of input──▶ Done
//!
//!     Every emit state consumes only the lines that belong to its block and hands control back
//!     at the first line that starts something else.
//!
//! Boundaries
//!
//!     - Header-delimited tables run until a blank line, a rule or a heading.
//!     - Dash-prefixed tables run while lines start with `- ` or `|`.
//!     - A summary takes the first paragraph after its heading (blank lines in between are
//!       skipped) and stops like a paragraph does.
//!     - A paragraph runs over consecutive plain lines. A line with a `|` that does not start
//!       with `- ` is plain text, not a table.
//!     - A table trigger that yields no rows falls back to a paragraph holding the trigger line.

use crate::error::FormatError;
use crate::ir::nodes::{Block, Document, TableSyntax};
use crate::math::MathShield;
use crate::table::{is_header_underline, parse_table};

/// How a single line starts a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Rule,
    Heading(usize, &'a str),
    SummaryHeading(&'a str),
    TableTrigger(TableSyntax),
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanningTopLevel,
    ParsingTable(TableSyntax),
    EmitHeading,
    EmitSummary,
    EmitRule,
    EmitParagraph,
    Done,
}

/// Shields math in `text` and assembles the resulting blocks.
pub fn parse_document(text: &str) -> Result<Document, FormatError> {
    let (math, shielded) = MathShield::shield(text)?;
    let blocks = assemble(&shielded);
    let title = blocks.iter().find_map(|block| match block {
        Block::Heading { level: 1, text } => Some(text.clone()),
        _ => None,
    });
    Ok(Document {
        title,
        blocks,
        math,
    })
}

/// Classifies shielded markdown into blocks, in source order.
pub fn assemble(shielded: &str) -> Vec<Block> {
    let mut assembler = Assembler::new(shielded);
    let mut state = State::ScanningTopLevel;

    loop {
        state = match state {
            State::ScanningTopLevel => assembler.scan(),
            State::ParsingTable(syntax) => assembler.parse_table(syntax),
            State::EmitHeading => assembler.emit_heading(),
            State::EmitSummary => assembler.emit_summary(),
            State::EmitRule => assembler.emit_rule(),
            State::EmitParagraph => assembler.emit_paragraph(),
            State::Done => break,
        };
    }

    tracing::debug!(blocks = assembler.blocks.len(), "assembled document");
    assembler.blocks
}

/// Parses an ATX heading (`#` to `######` followed by a space) into level and text.
pub(crate) fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim();
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn is_summary_title(text: &str) -> bool {
    text.trim_end_matches(':').trim().eq_ignore_ascii_case("summary")
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| compact.chars().all(|c| c == *marker))
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(syntax) = TableSyntax::detect(trimmed) {
        return LineKind::TableTrigger(syntax);
    }
    if let Some((level, text)) = atx_heading(trimmed) {
        if is_summary_title(text) {
            return LineKind::SummaryHeading(text);
        }
        return LineKind::Heading(level, text);
    }
    if is_rule(trimmed) {
        return LineKind::Rule;
    }
    LineKind::Text
}

struct Assembler<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    blocks: Vec<Block>,
}

impl<'a> Assembler<'a> {
    fn new(shielded: &'a str) -> Self {
        Self {
            lines: shielded.lines().collect(),
            cursor: 0,
            blocks: Vec::new(),
        }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.cursor).copied()
    }

    fn current_kind(&self) -> Option<LineKind<'a>> {
        self.current().map(classify)
    }

    fn skip_blank_lines(&mut self) {
        while self.current_kind() == Some(LineKind::Blank) {
            self.cursor += 1;
        }
    }

    fn scan(&mut self) -> State {
        self.skip_blank_lines();
        match self.current_kind() {
            None => State::Done,
            Some(LineKind::TableTrigger(syntax)) => State::ParsingTable(syntax),
            Some(LineKind::SummaryHeading(_)) => State::EmitSummary,
            Some(LineKind::Heading(..)) => State::EmitHeading,
            Some(LineKind::Rule) => State::EmitRule,
            Some(LineKind::Text) | Some(LineKind::Blank) => State::EmitParagraph,
        }
    }

    fn emit_heading(&mut self) -> State {
        if let Some(LineKind::Heading(level, text)) = self.current_kind() {
            self.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        }
        self.cursor += 1;
        State::ScanningTopLevel
    }

    fn emit_rule(&mut self) -> State {
        self.blocks.push(Block::Rule);
        self.cursor += 1;
        State::ScanningTopLevel
    }

    fn emit_summary(&mut self) -> State {
        let title = match self.current_kind() {
            Some(LineKind::SummaryHeading(text)) => text.to_string(),
            _ => String::new(),
        };
        self.cursor += 1;
        self.skip_blank_lines();

        let body = self.take_text_lines();
        self.blocks.push(Block::Summary {
            title,
            text: body.join(" "),
        });
        State::ScanningTopLevel
    }

    fn emit_paragraph(&mut self) -> State {
        let lines = self.take_text_lines();
        if !lines.is_empty() {
            self.blocks.push(Block::Paragraph { lines });
        }
        State::ScanningTopLevel
    }

    fn parse_table(&mut self, syntax: TableSyntax) -> State {
        let start = self.cursor;
        self.cursor += 1;

        match syntax {
            TableSyntax::HeaderDelimited => {
                if self.current().is_some_and(is_header_underline) {
                    self.cursor += 1;
                }
                while let Some(kind) = self.current_kind() {
                    match kind {
                        LineKind::Blank
                        | LineKind::Rule
                        | LineKind::Heading(..)
                        | LineKind::SummaryHeading(_)
                        | LineKind::TableTrigger(TableSyntax::HeaderDelimited) => break,
                        _ => self.cursor += 1,
                    }
                }
            }
            TableSyntax::DashPrefixed => {
                while let Some(line) = self.current() {
                    let trimmed = line.trim();
                    let continues = trimmed.starts_with("- ") || trimmed.starts_with('|');
                    if !continues || classify(line) == LineKind::Rule {
                        break;
                    }
                    self.cursor += 1;
                }
            }
        }

        let lines = &self.lines[start..self.cursor];
        match parse_table(lines) {
            Some(table) if !table.rows.is_empty() => {
                tracing::debug!(rows = table.rows.len(), ?syntax, "parsed cornell table");
                self.blocks.push(Block::CornellTable(table));
            }
            _ => {
                tracing::warn!(line = start + 1, "table has no rows; keeping it as a paragraph");
                self.blocks.push(Block::Paragraph {
                    lines: vec![lines[0].trim().to_string()],
                });
            }
        }
        State::ScanningTopLevel
    }

    /// Consumes consecutive plain-text lines.
    fn take_text_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(LineKind::Text) = self.current_kind() {
            if let Some(line) = self.current() {
                lines.push(line.trim().to_string());
            }
            self.cursor += 1;
        }
        lines
    }
}
