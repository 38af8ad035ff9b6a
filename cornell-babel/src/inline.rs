//! Inline markdown rendering
//!
//! Only two markers are recognized: `**bold**` and `` `code` ``. Parsing runs on shielded text,
//! so math never reaches the marker scanner; each placeholder token becomes an
//! [`InlineContent::Math`] node carrying the original span. Inside a code span the math is put
//! back as literal code text.
//!
//! Escaping is left to the serializers: text nodes are escaped on output and only the
//! serializer's own elements are emitted as markup.
//!
//! Every token resolution is recorded in a [`MathLedger`], which lets a renderer check at the end
//! of a conversion that each span was substituted exactly once.

use crate::error::FormatError;
use crate::ir::nodes::InlineContent;
use crate::math::{MathShield, MathSpan, Segment};

/// Counts how often each math span of a document has been substituted.
#[derive(Debug)]
pub struct MathLedger<'a> {
    shield: &'a MathShield,
    uses: Vec<usize>,
}

impl<'a> MathLedger<'a> {
    pub fn new(shield: &'a MathShield) -> Self {
        Self {
            shield,
            uses: vec![0; shield.len()],
        }
    }

    pub fn shield(&self) -> &'a MathShield {
        self.shield
    }

    /// Looks up span `index` and records the substitution.
    pub fn resolve(&mut self, index: usize) -> Option<&'a MathSpan> {
        let span = self.shield.get(index)?;
        self.uses[index] += 1;
        Some(span)
    }

    /// Fails unless every span was substituted exactly once.
    pub fn finish(self) -> Result<(), FormatError> {
        let missing: Vec<usize> = (0..self.uses.len())
            .filter(|index| self.uses[*index] == 0)
            .collect();
        let repeated: Vec<usize> = (0..self.uses.len())
            .filter(|index| self.uses[*index] > 1)
            .collect();

        if missing.is_empty() && repeated.is_empty() {
            return Ok(());
        }
        Err(FormatError::MathLeak(format!(
            "spans never substituted: {missing:?}, substituted more than once: {repeated:?}"
        )))
    }
}

/// Parses shielded text into inline content, resolving math tokens through `ledger`.
pub fn parse_inline(shielded: &str, ledger: &mut MathLedger<'_>) -> Vec<InlineContent> {
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut rest = shielded;

    while let Some(c) = rest.chars().next() {
        if let Some((index, len)) = ledger.shield().match_token(rest) {
            if let Some(span) = ledger.resolve(index) {
                flush_text(&mut text, &mut nodes);
                nodes.push(InlineContent::Math(span.clone()));
                rest = &rest[len..];
                continue;
            }
        }

        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                let inner = &after[..end];
                if !inner.is_empty() && !inner.contains('*') {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(InlineContent::Bold(parse_inline(inner, ledger)));
                    rest = &after[end + 2..];
                    continue;
                }
            }
        }

        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                let inner = &after[..end];
                if !inner.is_empty() {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(InlineContent::Code(restore_literal(inner, ledger)));
                    rest = &after[end + 1..];
                    continue;
                }
            }
        }

        text.push(c);
        rest = &rest[c.len_utf8()..];
    }

    flush_text(&mut text, &mut nodes);
    nodes
}

/// Flattens inline content to plain text, rendering math through `math`.
pub fn plain_text(nodes: &[InlineContent], math: &dyn Fn(&MathSpan) -> String) -> String {
    let mut output = String::new();
    for node in nodes {
        match node {
            InlineContent::Text(text) | InlineContent::Code(text) => output.push_str(text),
            InlineContent::Bold(children) => output.push_str(&plain_text(children, math)),
            InlineContent::Math(span) => output.push_str(&math(span)),
        }
    }
    output
}

fn restore_literal(shielded: &str, ledger: &mut MathLedger<'_>) -> String {
    let mut output = String::new();
    for segment in ledger.shield().segments(shielded) {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Math(index) => {
                if let Some(span) = ledger.resolve(index) {
                    output.push_str(&span.raw);
                }
            }
        }
    }
    output
}

fn flush_text(text: &mut String, nodes: &mut Vec<InlineContent>) {
    if !text.is_empty() {
        nodes.push(InlineContent::Text(std::mem::take(text)));
    }
}
