//! Print layout for PDF export
//!
//! Produces a self-contained HTML page meant only for printing: no scripts, no web fonts, and
//! math already converted to Unicode text. Page geometry comes from an `@page` rule.
//!
//! | Block         | Print element                                  |
//! |---------------|------------------------------------------------|
//! | Heading 1     | `h1.title`                                     |
//! | Heading 2     | `h2.section-header`                            |
//! | Heading 3-6   | `hN.subheading`                                |
//! | Summary       | `h2.section-header` + `p.summary`              |
//! | Cornell table | `table.cornell-grid` with `td.cue` / `td.notes` |
//! | Paragraph     | `p.body`                                       |
//! | Rule          | page break                                     |

use super::PdfOptions;
use crate::error::FormatError;
use crate::formats::common::{
    append, append_inline, create_element, create_text, html_escape, serialize_nodes,
    text_element, InlineStyle,
};
use crate::inline::{parse_inline, plain_text, MathLedger};
use crate::ir::nodes::{Block, CornellTable, Document};
use crate::math::{latex_to_unicode, MathKind, MathSpan};
use crate::table::note_lines;
use markup5ever_rcdom::Handle;

/// Named print styles.
pub const PRINT_CSS: &str = r#"body {
  font-family: Helvetica, Arial, sans-serif;
  font-size: 10pt;
  color: #000;
  margin: 0;
}
.title {
  font-size: 18pt;
  color: #00008b;
  text-align: center;
  margin: 0 0 12pt;
}
.section-header {
  font-size: 14pt;
  color: #ff0000;
  margin: 12pt 0 6pt;
}
.subheading {
  font-size: 12pt;
  margin: 10pt 0 6pt;
}
.body {
  margin: 0 0 6pt;
}
.summary {
  font-size: 10pt;
  font-style: italic;
  border-left: 3pt solid #00008b;
  padding: 4pt 8pt;
  margin: 0 0 6pt;
}
.cornell-grid {
  width: 100%;
  border-collapse: collapse;
  margin: 0 0 12pt;
}
.cornell-grid th,
.cornell-grid td {
  border: 1px solid #000;
  padding: 6pt;
  vertical-align: top;
}
.cornell-grid th {
  text-align: left;
  background: #d3d3d3;
}
.cue {
  width: 30%;
  background: #d3d3d3;
  font-weight: bold;
}
.notes {
  width: 70%;
  background: #fff;
}
.cue,
.notes {
  font-size: 10pt;
}
.math-block {
  display: block;
  text-align: center;
  margin: 6pt 0;
}
.page-break {
  break-after: page;
}
code {
  font-family: Courier, monospace;
}
tr {
  break-inside: avoid;
}
"#;

/// Builds the print page for `doc`.
pub fn layout_document(doc: &Document, options: &PdfOptions) -> Result<String, FormatError> {
    let title = match &doc.title {
        Some(title) => {
            let mut scratch = MathLedger::new(&doc.math);
            let nodes = parse_inline(title, &mut scratch);
            plain_text(&nodes, &|span| latex_to_unicode(span.latex()))
        }
        None => options.default_title.clone(),
    };

    let mut ledger = MathLedger::new(&doc.math);
    let nodes = build_body(&doc.blocks, &mut ledger);
    ledger.finish()?;
    let body_html = serialize_nodes(&nodes)?;

    let page_css = format!(
        "@page {{ size: {}; margin: 1in 0.75in; }}",
        options.page_size.css_size()
    );
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
{page_css}
{PRINT_CSS}
</style>
</head>
<body>
{body_html}
</body>
</html>
"#,
        title = html_escape(&title),
    ))
}

fn build_body(blocks: &[Block], ledger: &mut MathLedger<'_>) -> Vec<Handle> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let (tag, class) = match level {
                    1 => ("h1".to_string(), "title"),
                    2 => ("h2".to_string(), "section-header"),
                    n => (format!("h{}", (*n).min(6)), "subheading"),
                };
                let heading = create_element(&tag, vec![("class", class)]);
                inline(&heading, text, ledger);
                nodes.push(heading);
            }
            Block::Summary { title, text } => {
                let heading = create_element("h2", vec![("class", "section-header")]);
                inline(&heading, title, ledger);
                nodes.push(heading);
                if !text.is_empty() {
                    let p = create_element("p", vec![("class", "summary")]);
                    inline(&p, text, ledger);
                    nodes.push(p);
                }
            }
            Block::CornellTable(table) => nodes.push(build_table(table, ledger)),
            Block::Paragraph { lines } => {
                for line in lines {
                    let p = create_element("p", vec![("class", "body")]);
                    inline(&p, line, ledger);
                    nodes.push(p);
                }
            }
            Block::Rule => nodes.push(create_element("div", vec![("class", "page-break")])),
        }
    }
    nodes
}

fn build_table(table: &CornellTable, ledger: &mut MathLedger<'_>) -> Handle {
    let table_el = create_element("table", vec![("class", "cornell-grid")]);

    if let Some(header) = &table.header {
        let thead = append(&table_el, create_element("thead", vec![]));
        let tr = append(&thead, create_element("tr", vec![]));
        let cue = append(&tr, create_element("th", vec![]));
        inline(&cue, &header.cue, ledger);
        let notes = append(&tr, create_element("th", vec![]));
        inline(&notes, &header.notes, ledger);
    }

    let tbody = append(&table_el, create_element("tbody", vec![]));
    for pair in &table.rows {
        let tr = append(&tbody, create_element("tr", vec![]));
        let cue = append(&tr, create_element("td", vec![("class", "cue")]));
        inline(&cue, &pair.cue, ledger);

        let notes = append(&tr, create_element("td", vec![("class", "notes")]));
        for (position, line) in note_lines(&pair.notes).into_iter().enumerate() {
            if position > 0 {
                append(&notes, create_element("br", vec![]));
            }
            if line.bullet {
                append(&notes, create_text("• "));
            }
            inline(&notes, line.text, ledger);
        }
    }

    table_el
}

fn inline(parent: &Handle, shielded: &str, ledger: &mut MathLedger<'_>) {
    let style = InlineStyle {
        code_class: None,
        math: &append_math,
    };
    append_inline(parent, shielded, ledger, &style);
}

fn append_math(parent: &Handle, span: &MathSpan) {
    let text = latex_to_unicode(span.latex());
    match span.kind {
        MathKind::Inline => {
            append(parent, text_element("span", vec![("class", "math")], &text));
        }
        MathKind::Block => {
            append(parent, text_element("span", vec![("class", "math-block")], &text));
        }
    }
}
