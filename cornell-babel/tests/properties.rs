//! Property tests for math shielding.
//!
//! Arbitrary notes built from a small vocabulary of math, markup and table fragments must always
//! restore to their source, and every rendered page must carry each math span exactly once.

use cornell_babel::math::MathShield;
use cornell_babel::{parse_document, render, HtmlOptions, OutputTarget};
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("$x$"),
        Just("$\\alpha_{i} * \\beta$"),
        Just("$$\\sum_{t=0}^{n} C_t$$"),
        Just("$$a | b$$"),
        Just("$5"),
        Just("**bold**"),
        Just("`code`"),
        Just(" | "),
        Just("- "),
        Just("# "),
        Just("## Summary"),
        Just("### Cue | Notes"),
        Just("---"),
        Just("•"),
        Just("text"),
        Just(" "),
        Just("\n"),
        Just("\n\n"),
    ]
}

fn notes() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn shield_restores_source(source in notes()) {
        let (shield, shielded) = MathShield::shield(&source).unwrap();
        prop_assert_eq!(shield.restore(&shielded), source);
    }

    #[test]
    fn shielded_text_has_no_complete_math(source in notes()) {
        let (shield, shielded) = MathShield::shield(&source).unwrap();
        for span in shield.spans() {
            prop_assert!(!shielded.contains(&span.raw));
        }
    }

    #[test]
    fn html_carries_every_span(source in notes()) {
        let doc = parse_document(&source).unwrap();
        let page = render(&source, &OutputTarget::Html(HtmlOptions::default())).unwrap();
        let page = page.as_text().unwrap();

        let body = &page[page.find("<body").unwrap()..];
        for span in doc.math.spans() {
            let escaped = span.raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
            prop_assert!(body.contains(&escaped), "missing {}", span.raw);
        }
    }
}
