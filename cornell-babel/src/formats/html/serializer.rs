//! HTML serialization
//!
//! Pipeline: Document blocks → RcDom body fragment → HTML string → page template.

use super::{HtmlOptions, CORNELL_CSS};
use crate::error::FormatError;
use crate::formats::common::{
    append, append_inline, create_element, create_text, html_escape, serialize_nodes,
    text_element, InlineStyle,
};
use crate::inline::{parse_inline, plain_text, MathLedger};
use crate::ir::nodes::{Block, CornellTable, Document};
use crate::math::{MathKind, MathSpan};
use crate::table::note_lines;
use markup5ever_rcdom::Handle;

const H1_CLASS: &str = "text-4xl font-bold text-slate-800 mb-2";
const H2_CLASS: &str = "text-2xl font-bold text-slate-700 mt-12 mb-6 pb-2 border-b-2 border-red-200";
const MINOR_HEADING_CLASS: &str = "text-xl font-semibold text-slate-700 mt-8 mb-4";
const PARAGRAPH_CLASS: &str = "text-slate-700 leading-relaxed mb-4";
const SUMMARY_CLASS: &str = "cornell-summary bg-gradient-to-r from-blue-50 to-indigo-50 border-l-4 border-blue-500 rounded-r-lg p-6 mb-8 shadow-sm";
const CUE_CLASS: &str =
    "cornell-cue w-1/3 px-6 py-4 font-semibold text-slate-700 text-sm leading-relaxed align-top";
const NOTES_CLASS: &str =
    "cornell-notes w-2/3 px-6 py-4 text-slate-800 text-sm leading-relaxed align-top";
const CODE_CLASS: &str = "bg-gray-100 px-1 py-0.5 rounded text-sm font-mono";

/// Must be defined before the MathJax script loads.
const HEAD_SCRIPTS: &str = r#"  <script>
    window.MathJax = {
      tex: {
        inlineMath: [['$', '$'], ['\\(', '\\)']],
        displayMath: [['$$', '$$'], ['\\[', '\\]']]
      }
    };
  </script>
  <script src="https://cdn.tailwindcss.com"></script>
  <script>
    tailwind.config = {
      theme: {
        extend: {
          fontFamily: {
            serif: ['Georgia', 'Times New Roman', 'serif'],
            sans: ['Inter', 'system-ui', '-apple-system', 'sans-serif']
          }
        }
      }
    };
  </script>
  <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap" rel="stylesheet">"#;

/// Serialize a document to a complete HTML page.
pub fn serialize_to_html(doc: &Document, options: &HtmlOptions) -> Result<String, FormatError> {
    let title = page_title(doc, options);

    let mut ledger = MathLedger::new(&doc.math);
    let nodes = build_body(&doc.blocks, &mut ledger);
    ledger.finish()?;

    let body_html = serialize_nodes(&nodes)?;
    Ok(wrap_in_document(&body_html, &title, options))
}

/// Plain-text `<title>`, with math left in its source form.
fn page_title(doc: &Document, options: &HtmlOptions) -> String {
    match &doc.title {
        Some(title) => {
            // A separate ledger: the heading itself is counted when the body is built.
            let mut scratch = MathLedger::new(&doc.math);
            let nodes = parse_inline(title, &mut scratch);
            plain_text(&nodes, &|span| span.raw.clone())
        }
        None => options.default_title.clone(),
    }
}

fn build_body(blocks: &[Block], ledger: &mut MathLedger<'_>) -> Vec<Handle> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level: 1, text } => {
                let wrapper = create_element("div", vec![("class", "text-center mb-12")]);
                let h1 = append(&wrapper, create_element("h1", vec![("class", H1_CLASS)]));
                inline(&h1, text, ledger);
                append(
                    &wrapper,
                    create_element(
                        "div",
                        vec![(
                            "class",
                            "w-24 h-1 bg-gradient-to-r from-blue-500 to-blue-600 mx-auto rounded-full",
                        )],
                    ),
                );
                nodes.push(wrapper);
            }
            Block::Heading { level, text } => {
                let (tag, class) = match level {
                    2 => ("h2".to_string(), H2_CLASS),
                    n => (format!("h{}", (*n).min(6)), MINOR_HEADING_CLASS),
                };
                let heading = create_element(&tag, vec![("class", class)]);
                inline(&heading, text, ledger);
                nodes.push(heading);
            }
            Block::Summary { title, text } => {
                let heading = create_element("h2", vec![("class", H2_CLASS)]);
                inline(&heading, title, ledger);
                nodes.push(heading);
                if !text.is_empty() {
                    let boxed = create_element("div", vec![("class", SUMMARY_CLASS)]);
                    let p = append(
                        &boxed,
                        create_element(
                            "p",
                            vec![("class", "text-slate-700 leading-relaxed text-base")],
                        ),
                    );
                    inline(&p, text, ledger);
                    nodes.push(boxed);
                }
            }
            Block::CornellTable(table) => nodes.push(build_table(table, ledger)),
            Block::Paragraph { lines } => {
                for line in lines {
                    let p = create_element("p", vec![("class", PARAGRAPH_CLASS)]);
                    inline(&p, line, ledger);
                    nodes.push(p);
                }
            }
            Block::Rule => nodes.push(create_element(
                "hr",
                vec![("class", "my-8 border-slate-200")],
            )),
        }
    }
    nodes
}

fn build_table(table: &CornellTable, ledger: &mut MathLedger<'_>) -> Handle {
    let wrapper = create_element("div", vec![("class", "mb-8")]);
    let frame = append(
        &wrapper,
        create_element(
            "div",
            vec![(
                "class",
                "cornell-table rounded-lg overflow-hidden border border-slate-300",
            )],
        ),
    );
    let table_el = append(&frame, create_element("table", vec![("class", "w-full")]));

    if let Some(header) = &table.header {
        let thead = append(&table_el, create_element("thead", vec![]));
        let tr = append(&thead, create_element("tr", vec![]));
        let cue = append(&tr, create_element("th", vec![("class", "w-1/3 px-6 py-3")]));
        inline(&cue, &header.cue, ledger);
        let notes = append(&tr, create_element("th", vec![("class", "w-2/3 px-6 py-3")]));
        inline(&notes, &header.notes, ledger);
    }

    let tbody = append(&table_el, create_element("tbody", vec![]));
    let last = table.rows.len().saturating_sub(1);
    for (index, pair) in table.rows.iter().enumerate() {
        let border = if index < last {
            "border-b border-slate-200"
        } else {
            ""
        };
        let tr = append(&tbody, create_element("tr", vec![("class", border)]));

        let cue = append(&tr, create_element("td", vec![("class", CUE_CLASS)]));
        inline(&cue, &pair.cue, ledger);

        let notes = append(&tr, create_element("td", vec![("class", NOTES_CLASS)]));
        for (position, line) in note_lines(&pair.notes).into_iter().enumerate() {
            if position > 0 {
                append(&notes, create_element("br", vec![]));
            }
            if line.bullet {
                append(
                    &notes,
                    text_element("span", vec![("class", "cornell-bullet")], "•"),
                );
            }
            inline(&notes, line.text, ledger);
        }
    }

    wrapper
}

fn inline(parent: &Handle, shielded: &str, ledger: &mut MathLedger<'_>) {
    let style = InlineStyle {
        code_class: Some(CODE_CLASS),
        math: &append_math,
    };
    append_inline(parent, shielded, ledger, &style);
}

/// MathJax picks the delimiters up from the text, so the span is emitted verbatim.
fn append_math(parent: &Handle, span: &MathSpan) {
    let class = match span.kind {
        MathKind::Inline => "cornell-math",
        MathKind::Block => "cornell-math cornell-math-block",
    };
    let element = append(parent, create_element("span", vec![("class", class)]));
    append(&element, create_text(&span.raw));
}

fn wrap_in_document(body_html: &str, title: &str, options: &HtmlOptions) -> String {
    let escaped_title = html_escape(title);
    let custom_css = options.custom_css.as_deref().unwrap_or("");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="cornell-babel">
  <title>{escaped_title}</title>
{HEAD_SCRIPTS}
  <style>
{CORNELL_CSS}
{custom_css}
  </style>
</head>
<body class="bg-gradient-to-br from-slate-50 to-blue-50 min-h-screen font-sans">
  <div class="max-w-6xl mx-auto px-4 py-8 sm:px-6 lg:px-8">
    <div class="bg-white rounded-2xl shadow-xl border border-slate-200 overflow-hidden">
      <div class="px-8 py-10 sm:px-12 sm:py-12">
{body_html}
      </div>
    </div>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::parse_document;

    fn html(source: &str) -> String {
        let doc = parse_document(source).unwrap();
        serialize_to_html(&doc, &HtmlOptions::default()).unwrap()
    }

    #[test]
    fn test_page_shell() {
        let output = html("Plain text.\n");
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("https://cdn.tailwindcss.com"));
        assert!(output.contains("mathjax@3"));
        assert!(output.contains("<title>Cornell Notes</title>"));
        assert!(output.contains(".cornell-cue"));
    }

    #[test]
    fn test_mathjax_config_precedes_script() {
        let output = html("x\n");
        let config = output.find("window.MathJax").unwrap();
        let script = output.find("MathJax-script").unwrap();
        assert!(config < script);
    }

    #[test]
    fn test_title_from_first_heading() {
        let output = html("# Finance <101>\n\n# Second\n");
        assert!(output.contains("<title>Finance &lt;101&gt;</title>"));
        assert!(output.contains("Finance &lt;101&gt;</h1>"));
    }

    #[test]
    fn test_heading_levels() {
        let output = html("## Section\n#### Detail\n");
        assert!(output.contains(&format!("<h2 class=\"{H2_CLASS}\">Section</h2>")));
        assert!(output.contains(&format!("<h4 class=\"{MINOR_HEADING_CLASS}\">Detail</h4>")));
    }

    #[test]
    fn test_cornell_table_cells() {
        let output = html(
            "### Cue Column | Notes Section\n---|---\n**What is alpha?** | • $\\alpha$ measures skill\n",
        );
        assert!(output.contains("<thead>"));
        assert!(output.contains("Cue Column</th>"));
        assert!(output.contains(&format!(
            "<td class=\"{CUE_CLASS}\"><strong>What is alpha?</strong></td>"
        )));
        assert!(output.contains(
            "<span class=\"cornell-bullet\">•</span><span class=\"cornell-math\">$\\alpha$</span> measures skill"
        ));
    }

    #[test]
    fn test_notes_lines_are_separated() {
        let output = html("- Beta | • one • two\n| three\n");
        assert!(output.contains(
            "<span class=\"cornell-bullet\">•</span>one<br><span class=\"cornell-bullet\">•</span>two<br>three"
        ));
    }

    #[test]
    fn test_math_is_verbatim_and_markup_free() {
        let output = html("Value $a_{i} * b_{j}$ and `x_1`.\n");
        assert!(output.contains("<span class=\"cornell-math\">$a_{i} * b_{j}$</span>"));
        assert!(!output.contains("<em>"));
        assert!(output.contains(&format!("<code class=\"{CODE_CLASS}\">x_1</code>")));
    }

    #[test]
    fn test_math_text_is_escaped() {
        let output = html("$a < b$\n");
        assert!(output.contains("$a &lt; b$"));
    }

    #[test]
    fn test_block_math_class() {
        let output = html("$$\\sum_i x_i$$\n");
        assert!(output.contains("cornell-math cornell-math-block"));
    }

    #[test]
    fn test_summary_box() {
        let output = html("## Summary\nKey idea here.\n");
        assert!(output.contains("cornell-summary"));
        assert!(output.contains("Key idea here."));
    }

    #[test]
    fn test_rule_and_paragraph() {
        let output = html("first\nsecond\n\n---\n");
        assert!(output.contains(&format!("<p class=\"{PARAGRAPH_CLASS}\">first</p>")));
        assert!(output.contains(&format!("<p class=\"{PARAGRAPH_CLASS}\">second</p>")));
        assert!(output.contains("<hr class=\"my-8 border-slate-200\">"));
    }

    #[test]
    fn test_custom_css_appended() {
        let doc = parse_document("Text\n").unwrap();
        let options =
            HtmlOptions::default().with_custom_css(".my-custom-class { color: red; }".to_string());
        let output = serialize_to_html(&doc, &options).unwrap();
        assert!(output.contains(".my-custom-class { color: red; }"));
        assert!(output.contains(".cornell-notes"));
    }

    #[test]
    fn test_default_title_override() {
        let doc = parse_document("Text\n").unwrap();
        let options = HtmlOptions::default().with_default_title("Lecture 4");
        let output = serialize_to_html(&doc, &options).unwrap();
        assert!(output.contains("<title>Lecture 4</title>"));
    }

    #[test]
    fn test_title_keeps_math_source() {
        let output = html("# Notes on $\\beta$\n");
        assert!(output.contains("<title>Notes on $\\beta$</title>"));
    }
}
