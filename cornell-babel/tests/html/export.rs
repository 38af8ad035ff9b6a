//! Export tests for the HTML format
//!
//! These tests run whole notes files through the public API and check the resulting page.

use cornell_babel::format::Format;
use cornell_babel::formats::html::{HtmlFormat, HtmlOptions};
use cornell_babel::parse_document;
use once_cell::sync::Lazy;
use regex::Regex;

fn notes_to_html(source: &str, options: HtmlOptions) -> String {
    let doc = parse_document(source).unwrap();
    let format = HtmlFormat::new(options);
    format
        .serialize(&doc)
        .unwrap()
        .as_text()
        .expect("html is text")
        .to_string()
}

fn html(source: &str) -> String {
    notes_to_html(source, HtmlOptions::default())
}

/// The markup between `<body ...>` and `</body>`.
fn body(page: &str) -> &str {
    static BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<body[^>]*>(.*)</body>").unwrap());
    BODY.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .expect("page has a body")
}

// ============================================================================
// PAGE SHELL
// ============================================================================

#[test]
fn test_page_loads_tailwind_and_mathjax() {
    let page = html("Some notes.\n");

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<meta charset=\"UTF-8\">"));
    assert!(page.contains("https://cdn.tailwindcss.com"));
    assert!(page.contains("tex-mml-chtml.js"));
    assert!(page.contains("family=Inter"));
}

#[test]
fn test_mathjax_configured_before_loading() {
    let page = html("Some notes.\n");

    let config = page.find("window.MathJax").unwrap();
    let script = page.find("MathJax-script").unwrap();
    assert!(config < script);
    assert!(page.contains(r"inlineMath: [['$', '$'], ['\\(', '\\)']]"));
    assert!(page.contains(r"displayMath: [['$$', '$$'], ['\\[', '\\]']]"));
}

#[test]
fn test_title_from_first_heading() {
    let page = html("Intro text.\n\n# Corporate Finance\n\n# Second\n");
    assert!(page.contains("<title>Corporate Finance</title>"));
}

#[test]
fn test_title_falls_back_to_option() {
    let page = notes_to_html(
        "## Only a section\n",
        HtmlOptions::default().with_default_title("Week 4"),
    );
    assert!(page.contains("<title>Week 4</title>"));

    let page = html("plain\n");
    assert!(page.contains("<title>Cornell Notes</title>"));
}

#[test]
fn test_title_keeps_math_source() {
    let page = html("# Returns $r_t$ & risk\n");
    assert!(page.contains("<title>Returns $r_t$ &amp; risk</title>"));
}

#[test]
fn test_custom_css_is_appended() {
    let page = notes_to_html(
        "text\n",
        HtmlOptions::default().with_custom_css(".cornell-cue { color: teal; }"),
    );

    let builtin = page.find(".cornell-cue").unwrap();
    let custom = page.find(".cornell-cue { color: teal; }").unwrap();
    assert!(builtin < custom);
}

// ============================================================================
// BLOCKS
// ============================================================================

#[test]
fn test_heading_levels() {
    let page = html("# Title\n\n## Section\n\n### Detail\n\n#### Deeper\n");
    let body = body(&page);

    assert!(body.contains("<h1 class=\"text-4xl font-bold text-slate-800 mb-2\">Title</h1>"));
    assert!(body.contains("<h2 class=\"text-2xl"));
    assert!(body.contains(">Section</h2>"));
    assert!(body.contains("<h3 class=\"text-xl font-semibold text-slate-700 mt-8 mb-4\">Detail</h3>"));
    assert!(body.contains("<h4 class=\"text-xl font-semibold text-slate-700 mt-8 mb-4\">Deeper</h4>"));
}

#[test]
fn test_summary_box() {
    let page = html("## Summary\n\nCapital budgeting ranks projects\nby NPV.\n");
    let body = body(&page);

    assert!(body.contains(">Summary</h2>"));
    assert!(body.contains("cornell-summary"));
    assert!(body.contains("Capital budgeting ranks projects by NPV."));
}

#[test]
fn test_paragraph_lines_and_rule() {
    let page = html("First line.\nSecond line.\n\n---\n\nAfter rule.\n");
    let body = body(&page);

    assert_eq!(body.matches("<p class=\"text-slate-700 leading-relaxed mb-4\">").count(), 3);
    assert!(body.contains("<hr class=\"my-8 border-slate-200\">"));

    let rule = body.find("<hr").unwrap();
    assert!(body.find("Second line.").unwrap() < rule);
    assert!(rule < body.find("After rule.").unwrap());
}

#[test]
fn test_inline_bold_and_code() {
    let page = html("Use **NPV** with `rate = 0.05`.\n");
    let body = body(&page);

    assert!(body.contains("<strong>NPV</strong>"));
    assert!(body.contains("<code class=\"bg-gray-100 px-1 py-0.5 rounded text-sm font-mono\">rate = 0.05</code>"));
}

#[test]
fn test_markup_in_text_is_escaped() {
    let page = html("a <script>alert(1)</script> & b\n");
    let body = body(&page);

    assert!(!body.contains("<script>alert"));
    assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; b"));
}

// ============================================================================
// MATH
// ============================================================================

#[test]
fn test_inline_math_is_preserved() {
    let page = html("The slope $\\beta_{i}$ of **asset** returns.\n");
    let body = body(&page);

    assert!(body.contains("<span class=\"cornell-math\">$\\beta_{i}$</span>"));
    assert!(body.contains("<strong>asset</strong>"));
}

#[test]
fn test_block_math_is_preserved() {
    let page = html("$$\nNPV = \\sum_{t=0}^{n} \\frac{C_t}{(1+r)^t}\n$$\n");
    let body = body(&page);

    assert!(body.contains("cornell-math cornell-math-block"));
    assert!(body.contains("\\sum_{t=0}^{n} \\frac{C_t}{(1+r)^t}"));
}

#[test]
fn test_math_markers_are_not_markdown() {
    let page = html("Product $a * b * c$ and $x_1 | y_1$.\n");
    let body = body(&page);

    assert!(!body.contains("<strong>"));
    assert!(body.contains("$a * b * c$"));
    assert!(body.contains("$x_1 | y_1$"));
}

#[test]
fn test_math_inside_code_stays_literal() {
    let page = html("Write `$x^2$` to get $x^2$.\n");
    let body = body(&page);

    assert!(body.contains(">$x^2$</code>"));
    assert_eq!(body.matches("cornell-math").count(), 1);
}

#[test]
fn test_unpaired_dollar_is_text() {
    let page = html("It costs $5 today.\n");
    let body = body(&page);

    assert!(body.contains("It costs $5 today."));
    assert!(!body.contains("cornell-math"));
}

#[test]
fn test_no_placeholder_reaches_output() {
    let page = html("# $\\alpha$\n\n- Cue $x$ | notes $y$\n\n## Summary\n$z$\n");
    assert!(!page.chars().any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c)));
}
