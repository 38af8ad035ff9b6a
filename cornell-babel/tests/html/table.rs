//! Cornell table rendering in HTML

use cornell_babel::{render, HtmlOptions, OutputTarget};

fn html(source: &str) -> String {
    render(source, &OutputTarget::Html(HtmlOptions::default()))
        .unwrap()
        .as_text()
        .unwrap()
        .to_string()
}

#[test]
fn test_header_delimited_table() {
    let page = html(
        "### Cue Column | Notes Section\n\
         ---|---\n\
         **What is NPV?** | • Present value of cash flows\n\
         | • minus the initial outlay\n\
         IRR | Rate where NPV is zero\n",
    );

    assert!(page.contains("<thead>"));
    assert!(page.contains(">Cue Column</th>"));
    assert!(page.contains(">Notes Section</th>"));
    assert_eq!(page.matches("<td class=\"cornell-cue").count(), 2);
    assert_eq!(page.matches("<td class=\"cornell-notes").count(), 2);
    assert!(page.contains("<strong>What is NPV?</strong>"));
    assert!(page.contains(
        "<span class=\"cornell-bullet\">•</span>Present value of cash flows<br><span class=\"cornell-bullet\">•</span>minus the initial outlay"
    ));
}

#[test]
fn test_dash_prefixed_table_has_no_header() {
    let page = html(
        "- Beta | • Sensitivity to the market\n\
         | • Slope of the regression line\n\
         - Alpha | Excess return\n",
    );

    assert!(!page.contains("<thead>"));
    assert!(page.contains(">Beta</td>"));
    assert!(page.contains(">Alpha</td>"));
    assert!(page.contains("Slope of the regression line"));
}

#[test]
fn test_row_borders_skip_last_row() {
    let page = html("- One | first\n- Two | second\n- Three | third\n");

    assert_eq!(page.matches("<tr class=\"border-b border-slate-200\">").count(), 2);
}

#[test]
fn test_inline_bullet_separators_split_lines() {
    let page = html("- Risk | • systematic • unsystematic\n");

    assert_eq!(page.matches("cornell-bullet\">•</span>").count(), 2);
    assert!(page.contains("systematic<br>"));
}

#[test]
fn test_pipe_inside_math_does_not_split_row() {
    let page = html("- Conditional | $P(A | B)$ given B\n");

    assert!(page.contains(">Conditional</td>"));
    assert!(page.contains("<span class=\"cornell-math\">$P(A | B)$</span> given B"));
}

#[test]
fn test_table_followed_by_paragraph() {
    let page = html("- Cue | notes\n\nA closing remark.\n");

    let table_end = page.find("</table>").unwrap();
    let remark = page.find("A closing remark.").unwrap();
    assert!(table_end < remark);
}
