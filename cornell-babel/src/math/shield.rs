//! Math shielding
//!
//!     LaTeX spans (`$$...$$` and `$...$`) are swapped for opaque placeholder tokens before any
//!     markdown or markup processing runs, so underscores, braces, asterisks and pipes inside math
//!     never reach the table parser or the inline renderer.
//!
//!     Spans are found in two passes: every block span first, then inline spans only inside the
//!     gaps left between block spans. This keeps `$$` from being split into two inline spans and
//!     guarantees that spans never overlap or nest.
//!
//!     A token looks like `<marker>M<index><marker>`, where the marker is a private-use character
//!     that does not occur anywhere in the input. Tokens therefore cannot collide with text the
//!     author wrote.
//!
//!     Unterminated delimiters are left alone and end up as literal `$` characters.

use crate::error::FormatError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::ops::Range;

/// Block math: one or more non-`$` characters between `$$` pairs (may span lines).
static BLOCK_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$[^$]+\$\$").expect("valid regex for block math"));

/// Inline math: stays on a single line.
static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^$\n]+\$").expect("valid regex for inline math"));

/// Private-use ranges searched for a marker character that the input does not contain.
const MARKER_RANGES: [(u32, u32); 2] = [(0xE000, 0xF8FF), (0xF0000, 0xFFFFD)];

/// Delimiter kind of a math span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathKind {
    /// `$...$`
    Inline,
    /// `$$...$$`
    Block,
}

/// An extracted LaTeX expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathSpan {
    /// The source text including its delimiters.
    pub raw: String,
    pub kind: MathKind,
}

impl MathSpan {
    /// The LaTeX between the delimiters.
    pub fn latex(&self) -> &str {
        let delimiter = match self.kind {
            MathKind::Inline => 1,
            MathKind::Block => 2,
        };
        &self.raw[delimiter..self.raw.len() - delimiter]
    }
}

/// A piece of shielded text: either literal text or a reference to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Math(usize),
}

/// The span table of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathShield {
    marker: char,
    spans: Vec<MathSpan>,
}

impl MathShield {
    /// Replaces every math span in `text` with a placeholder token.
    ///
    /// Returns the span table and the shielded text. Fails only if every private-use
    /// character already occurs in the input, leaving no safe marker.
    pub fn shield(text: &str) -> Result<(MathShield, String), FormatError> {
        let marker = choose_marker(text).ok_or_else(|| {
            FormatError::InvalidInput(
                "input uses every private-use character; cannot shield math".to_string(),
            )
        })?;

        let mut shield = MathShield {
            marker,
            spans: Vec::new(),
        };
        let mut shielded = String::with_capacity(text.len());
        let mut last = 0;

        for range in find_spans(text) {
            shielded.push_str(&text[last..range.start]);
            let raw = &text[range.clone()];
            let kind = if raw.starts_with("$$") {
                MathKind::Block
            } else {
                MathKind::Inline
            };
            shielded.push_str(&shield.token(shield.spans.len()));
            shield.spans.push(MathSpan {
                raw: raw.to_string(),
                kind,
            });
            last = range.end;
        }
        shielded.push_str(&text[last..]);

        let stray = shielded.matches('$').count();
        if stray > 0 {
            tracing::warn!(
                count = stray,
                "unpaired math delimiters left as literal text"
            );
        }
        tracing::debug!(spans = shield.spans.len(), "shielded math spans");

        Ok((shield, shielded))
    }

    /// The placeholder token for span `index`.
    pub fn token(&self, index: usize) -> String {
        format!("{m}M{index}{m}", m = self.marker)
    }

    pub fn spans(&self) -> &[MathSpan] {
        &self.spans
    }

    pub fn get(&self, index: usize) -> Option<&MathSpan> {
        self.spans.get(index)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Splits shielded text into literal text and span references.
    ///
    /// Anything that looks like a marker but does not name a known span stays text.
    pub fn segments<'a>(&self, shielded: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut text_start = 0;
        let mut cursor = 0;

        while let Some(offset) = shielded[cursor..].find(self.marker) {
            let open = cursor + offset;
            let body_start = open + self.marker.len_utf8();
            let Some(close_offset) = shielded[body_start..].find(self.marker) else {
                break;
            };
            let close = body_start + close_offset;

            match self.parse_token_body(&shielded[body_start..close]) {
                Some(index) => {
                    if text_start < open {
                        segments.push(Segment::Text(&shielded[text_start..open]));
                    }
                    segments.push(Segment::Math(index));
                    cursor = close + self.marker.len_utf8();
                    text_start = cursor;
                }
                None => cursor = body_start,
            }
        }

        if text_start < shielded.len() {
            segments.push(Segment::Text(&shielded[text_start..]));
        }
        segments
    }

    /// Puts the original math back, byte for byte.
    pub fn restore(&self, shielded: &str) -> String {
        self.restore_with(shielded, |span| span.raw.clone())
    }

    /// Substitutes every token through `render`.
    pub fn restore_with<F>(&self, shielded: &str, mut render: F) -> String
    where
        F: FnMut(&MathSpan) -> String,
    {
        let mut output = String::with_capacity(shielded.len());
        for segment in self.segments(shielded) {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Math(index) => output.push_str(&render(&self.spans[index])),
            }
        }
        output
    }

    /// If `text` starts with a token, returns the span index and the token's byte length.
    pub fn match_token(&self, text: &str) -> Option<(usize, usize)> {
        let body = text.strip_prefix(self.marker)?;
        let close = body.find(self.marker)?;
        let index = self.parse_token_body(&body[..close])?;
        Some((index, 2 * self.marker.len_utf8() + close))
    }

    fn parse_token_body(&self, body: &str) -> Option<usize> {
        let index: usize = body.strip_prefix('M')?.parse().ok()?;
        (index < self.spans.len()).then_some(index)
    }
}

fn choose_marker(text: &str) -> Option<char> {
    let used: HashSet<char> = text.chars().filter(|c| is_private_use(*c)).collect();
    MARKER_RANGES
        .iter()
        .flat_map(|(start, end)| *start..=*end)
        .filter_map(char::from_u32)
        .find(|candidate| !used.contains(candidate))
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    MARKER_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

/// Byte ranges of all math spans, ordered and non-overlapping.
fn find_spans(text: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;
    while let Some(found) = BLOCK_MATH.find_at(text, cursor) {
        // A blank line inside `$$...$$` means the delimiters belong to different paragraphs.
        if contains_blank_line(found.as_str()) {
            cursor = found.start() + 1;
            continue;
        }
        blocks.push(found.range());
        cursor = found.end();
    }

    let mut spans = Vec::new();
    let mut gap_start = 0;
    for block in blocks {
        collect_inline(text, gap_start..block.start, &mut spans);
        gap_start = block.end;
        spans.push(block);
    }
    collect_inline(text, gap_start..text.len(), &mut spans);
    spans
}

fn collect_inline(text: &str, gap: Range<usize>, spans: &mut Vec<Range<usize>>) {
    let offset = gap.start;
    for found in INLINE_MATH.find_iter(&text[gap]) {
        spans.push(offset + found.start()..offset + found.end());
    }
}

fn contains_blank_line(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    lines.len() > 2
        && lines[1..lines.len() - 1]
            .iter()
            .any(|line| line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield(text: &str) -> (MathShield, String) {
        MathShield::shield(text).expect("shield")
    }

    #[test]
    fn replaces_inline_math_with_token() {
        let (math, shielded) = shield(r"risk $\beta_i$ here");
        assert_eq!(math.len(), 1);
        assert_eq!(math.spans()[0].raw, r"$\beta_i$");
        assert_eq!(math.spans()[0].kind, MathKind::Inline);
        assert!(!shielded.contains('$'));
        assert!(!shielded.contains("beta"));
        assert!(shielded.starts_with("risk "));
        assert!(shielded.ends_with(" here"));
    }

    #[test]
    fn block_math_is_preferred_over_inline() {
        let (math, _) = shield("$$x^2$$");
        assert_eq!(math.len(), 1);
        assert_eq!(math.spans()[0].kind, MathKind::Block);
        assert_eq!(math.spans()[0].latex(), "x^2");
    }

    #[test]
    fn adjacent_block_and_inline_are_distinct_spans() {
        let (math, shielded) = shield("$$x^2$$$y$");
        assert_eq!(math.len(), 2);
        assert_eq!(math.spans()[0].raw, "$$x^2$$");
        assert_eq!(math.spans()[0].kind, MathKind::Block);
        assert_eq!(math.spans()[1].raw, "$y$");
        assert_eq!(math.spans()[1].kind, MathKind::Inline);
        assert_eq!(shielded, format!("{}{}", math.token(0), math.token(1)));
    }

    #[test]
    fn inline_spans_do_not_cross_block_spans() {
        let (math, shielded) = shield("$a $$b$$ c$");
        assert_eq!(math.len(), 1);
        assert_eq!(math.spans()[0].raw, "$$b$$");
        assert_eq!(shielded, format!("$a {} c$", math.token(0)));
    }

    #[test]
    fn unterminated_delimiter_stays_literal() {
        let (math, shielded) = shield("costs $5 today");
        assert!(math.is_empty());
        assert_eq!(shielded, "costs $5 today");
    }

    #[test]
    fn inline_math_does_not_span_lines() {
        let (math, shielded) = shield("price $5\nand $6 more");
        assert!(math.is_empty());
        assert_eq!(shielded, "price $5\nand $6 more");
    }

    #[test]
    fn block_math_may_span_lines_but_not_paragraphs() {
        let (math, _) = shield("$$\na + b\n$$");
        assert_eq!(math.len(), 1);

        let (math, _) = shield("$$ a\n\nb $$");
        assert!(math.is_empty());
    }

    #[test]
    fn restore_round_trips() {
        let source = "# $\\alpha$ notes\n$$\\frac{a}{b}$$ and `code` $x_{t}$ end $";
        let (math, shielded) = shield(source);
        assert_eq!(math.restore(&shielded), source);
    }

    #[test]
    fn restore_with_substitutes_each_span() {
        let (math, shielded) = shield("$a$ + $b$");
        let restored = math.restore_with(&shielded, |span| span.latex().to_uppercase());
        assert_eq!(restored, "A + B");
    }

    #[test]
    fn marker_avoids_characters_in_input() {
        let source = "\u{E000} uses the first marker $x$";
        let (math, shielded) = shield(source);
        assert!(!math.token(0).contains('\u{E000}'));
        assert_eq!(math.restore(&shielded), source);
    }

    #[test]
    fn segments_split_text_and_math() {
        let (math, shielded) = shield("a $x$ b");
        assert_eq!(
            math.segments(&shielded),
            vec![Segment::Text("a "), Segment::Math(0), Segment::Text(" b")]
        );
    }
}
