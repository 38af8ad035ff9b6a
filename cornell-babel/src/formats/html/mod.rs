//! HTML format implementation
//!
//! Renders a Cornell notes document as a single HTML5 page.
//!
//! # Library Choice
//!
//! The body is built as an `html5ever` + `markup5ever_rcdom` DOM and serialized by html5ever, so
//! all author text is escaped by the serializer. The page shell around it is a static template.
//!
//! # Element Mapping Table
//!
//! | Block            | HTML                                                                  |
//! |------------------|-----------------------------------------------------------------------|
//! | Heading 1        | centered `<h1>` with an accent bar                                    |
//! | Heading 2        | `<h2>` section header                                                 |
//! | Heading 3-6      | `<h3>`..`<h6>`                                                        |
//! | Summary          | section header + `<div class="cornell-summary">` box                  |
//! | Cornell table    | `<table>` with `td.cornell-cue` (1/3) and `td.cornell-notes` (2/3)   |
//! | Paragraph        | one `<p>` per source line                                             |
//! | Rule             | `<hr>`                                                                |
//! | Inline bold/code | `<strong>` / `<code>`                                                 |
//! | Math             | `<span class="cornell-math">` holding the LaTeX with its delimiters   |
//!
//! # External resources
//!
//! The page references the Tailwind CSS CDN, the MathJax 3 CDN (configured for `$...$` and
//! `$$...$$`) and the Inter web font. The Cornell cell styling is embedded from
//! `css/cornell.css`; custom CSS from [`HtmlOptions`] is appended after it.

mod serializer;

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::ir::nodes::Document;

pub use serializer::serialize_to_html;

/// The stylesheet embedded in every HTML page.
pub const CORNELL_CSS: &str = include_str!("../../../css/cornell.css");

/// Title used when the document has no level-1 heading.
pub const DEFAULT_TITLE: &str = "Cornell Notes";

/// Options for HTML serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// `<title>` for documents without a level-1 heading
    pub default_title: String,
    /// Optional custom CSS appended after the embedded stylesheet
    pub custom_css: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            custom_css: None,
        }
    }
}

impl HtmlOptions {
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn with_custom_css(mut self, css: impl Into<String>) -> Self {
        self.custom_css = Some(css.into());
        self
    }
}

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 page with Tailwind styling and MathJax"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn serialize(&self, doc: &Document) -> Result<SerializedDocument, FormatError> {
        serialize_to_html(doc, &self.options).map(SerializedDocument::Text)
    }
}
