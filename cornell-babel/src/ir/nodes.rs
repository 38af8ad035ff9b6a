//! Core data structures for the assembled document.
//!
//! Block text is stored shielded: math spans appear as placeholder tokens owned by
//! [`Document::math`]. Renderers resolve them while building inline content.

use crate::math::{MathShield, MathSpan};
use serde::Serialize;

/// A parsed Cornell notes document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Shielded text of the first level-1 heading, if any.
    pub title: Option<String>,
    pub blocks: Vec<Block>,
    /// Math spans referenced by tokens in the block text.
    pub math: MathShield,
}

impl Document {
    /// Blocks with every math token put back, for inspection and debugging.
    pub fn restored_blocks(&self) -> Vec<Block> {
        self.blocks
            .iter()
            .map(|block| block.map_text(&|text| self.math.restore(text)))
            .collect()
    }
}

/// A classified unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Heading {
        level: usize,
        text: String,
    },
    CornellTable(CornellTable),
    /// A heading named "Summary" together with the paragraph that follows it.
    Summary {
        title: String,
        text: String,
    },
    Paragraph {
        lines: Vec<String>,
    },
    Rule,
}

impl Block {
    /// Rebuilds the block with `f` applied to every piece of text it carries.
    pub fn map_text(&self, f: &dyn Fn(&str) -> String) -> Block {
        match self {
            Block::Heading { level, text } => Block::Heading {
                level: *level,
                text: f(text),
            },
            Block::CornellTable(table) => Block::CornellTable(CornellTable {
                syntax: table.syntax,
                header: table.header.as_ref().map(|header| TableHeader {
                    cue: f(&header.cue),
                    notes: f(&header.notes),
                }),
                rows: table
                    .rows
                    .iter()
                    .map(|pair| CuePair {
                        cue: f(&pair.cue),
                        notes: f(&pair.notes),
                    })
                    .collect(),
            }),
            Block::Summary { title, text } => Block::Summary {
                title: f(title),
                text: f(text),
            },
            Block::Paragraph { lines } => Block::Paragraph {
                lines: lines.iter().map(|line| f(line)).collect(),
            },
            Block::Rule => Block::Rule,
        }
    }
}

/// Which of the two Cornell table syntaxes a table was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableSyntax {
    /// `### Cue Column | Notes Section` + `---|---` + `cue | notes` rows
    HeaderDelimited,
    /// `- cue | notes` rows with `| more notes` continuations
    DashPrefixed,
}

/// A two-column cue/notes table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CornellTable {
    pub syntax: TableSyntax,
    /// Column labels from a header-delimited table's heading line.
    pub header: Option<TableHeader>,
    pub rows: Vec<CuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableHeader {
    pub cue: String,
    pub notes: String,
}

/// One row of a Cornell table.
///
/// `notes` holds one or more lines joined with `\n`; continuation rows append to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuePair {
    pub cue: String,
    pub notes: String,
}

impl CuePair {
    pub fn new(cue: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            cue: cue.into(),
            notes: notes.into(),
        }
    }

    /// Appends a continuation line to the notes.
    pub fn append_notes(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(text);
    }
}

/// Represents inline content: text, bold, code or a restored math span.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineContent {
    Text(String),
    Bold(Vec<InlineContent>),
    Code(String),
    Math(MathSpan),
}
