//! Inspection views
//!
//! `cornell inspect` shows how the assembler classified a notes file without rendering it.
//! Each view reads the same parsed document:
//!
//! - `outline`: one line per block, table rows indented beneath their table
//! - `json`: title, blocks and math spans as JSON, with math restored into the block text
//! - `math`: every extracted math span with its Unicode approximation

use cornell_babel::ir::nodes::{Block, Document, TableSyntax};
use cornell_babel::math::{latex_to_unicode, MathKind};
use cornell_babel::parse_document;
use serde_json::json;

/// All views accepted by [`execute_view`].
pub const AVAILABLE_VIEWS: &[&str] = &["outline", "json", "math"];

/// Parse `source` and render the named view.
pub fn execute_view(source: &str, view: &str) -> Result<String, String> {
    let doc = parse_document(source).map_err(|e| format!("Inspect failed: {e}"))?;

    match view {
        "outline" => Ok(outline(&doc)),
        "json" => {
            let value = document_to_json(&doc)?;
            serde_json::to_string_pretty(&value).map_err(|e| format!("JSON encoding failed: {e}"))
        }
        "math" => Ok(math_listing(&doc)),
        _ => Err(format!("Unknown view: {view}")),
    }
}

fn outline(doc: &Document) -> String {
    let mut output = String::new();
    if let Some(title) = &doc.title {
        output.push_str(&format!("title: {}\n", doc.math.restore(title)));
    }

    for block in doc.restored_blocks() {
        match block {
            Block::Heading { level, text } => {
                output.push_str(&format!("heading[{level}] {text}\n"));
            }
            Block::CornellTable(table) => {
                let syntax = match table.syntax {
                    TableSyntax::HeaderDelimited => "header",
                    TableSyntax::DashPrefixed => "dash",
                };
                output.push_str(&format!("table[{syntax}] {} rows\n", table.rows.len()));
                if let Some(header) = &table.header {
                    output.push_str(&format!("  columns: {} | {}\n", header.cue, header.notes));
                }
                for row in &table.rows {
                    let notes = row.notes.replace('\n', " / ");
                    output.push_str(&format!("  {} | {}\n", row.cue, notes));
                }
            }
            Block::Summary { title, text } => {
                output.push_str(&format!("summary {title}: {text}\n"));
            }
            Block::Paragraph { lines } => {
                output.push_str(&format!("paragraph {}\n", lines.join(" / ")));
            }
            Block::Rule => output.push_str("rule\n"),
        }
    }
    output
}

fn document_to_json(doc: &Document) -> Result<serde_json::Value, String> {
    let blocks = serde_json::to_value(doc.restored_blocks())
        .map_err(|e| format!("JSON encoding failed: {e}"))?;
    let math =
        serde_json::to_value(doc.math.spans()).map_err(|e| format!("JSON encoding failed: {e}"))?;

    Ok(json!({
        "title": doc.title.as_ref().map(|title| doc.math.restore(title)),
        "blocks": blocks,
        "math": math,
    }))
}

fn math_listing(doc: &Document) -> String {
    doc.math
        .spans()
        .iter()
        .enumerate()
        .map(|(index, span)| {
            let kind = match span.kind {
                MathKind::Inline => "inline",
                MathKind::Block => "block",
            };
            format!(
                "{index}\t{kind}\t{}\t{}",
                span.raw,
                latex_to_unicode(span.latex())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "# Risk $\\beta$\n\n\
        ### Cue Column | Notes Section\n\
        ---|---\n\
        Beta | • market risk\n\
        | • slope $\\beta = 1$\n\n\
        ## Summary\n\
        Beta measures exposure.\n";

    #[test]
    fn outline_lists_blocks_in_order() {
        let output = execute_view(NOTES, "outline").expect("view to run");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "title: Risk $\\beta$");
        assert_eq!(lines[1], "heading[1] Risk $\\beta$");
        assert_eq!(lines[2], "table[header] 1 rows");
        assert_eq!(lines[3], "  columns: Cue Column | Notes Section");
        assert_eq!(lines[4], "  Beta | • market risk / • slope $\\beta = 1$");
        assert_eq!(lines[5], "summary Summary: Beta measures exposure.");
    }

    #[test]
    fn json_view_restores_math() {
        let output = execute_view(NOTES, "json").expect("view to run");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(value["title"], "Risk $\\beta$");
        assert_eq!(value["blocks"][0]["type"], "heading");
        assert_eq!(value["blocks"][1]["type"], "cornell-table");
        assert_eq!(value["math"].as_array().map(|spans| spans.len()), Some(2));
        assert!(!output.contains('\u{E000}'));
    }

    #[test]
    fn math_view_lists_spans() {
        let output = execute_view("Energy $$E = mc^2$$ and $\\alpha$\n", "math").unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0\tblock\t$$E = mc^2$$"));
        assert!(lines[1].starts_with("1\tinline\t$\\alpha$\tα"));
    }

    #[test]
    fn unknown_view_is_rejected() {
        let err = execute_view(NOTES, "tokens").unwrap_err();
        assert!(err.contains("Unknown view"));
    }

    #[test]
    fn every_view_runs_on_empty_input() {
        for view in AVAILABLE_VIEWS {
            assert!(execute_view("", view).is_ok(), "view {view} failed");
        }
    }
}
