//! PDF export built on a print layout + headless Chrome.
//!
//! The document is laid out as a print-oriented HTML page (fixed page size, named styles,
//! math converted to Unicode text), then a Chrome/Chromium binary running in headless mode prints
//! it to PDF. No MathJax runs here: the print layout carries plain text only.

#[cfg(feature = "native-export")]
mod chrome;
mod layout;

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::ir::nodes::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "native-export")]
pub use chrome::CHROME_ENV;
pub use layout::{layout_document, PRINT_CSS};

/// Page size of the generated PDF
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5in × 11in
    #[default]
    Letter,
    /// ISO A4, 210mm × 297mm
    A4,
}

impl PageSize {
    /// The CSS `@page size` keyword.
    pub fn css_size(&self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::A4 => "A4",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Letter => f.write_str("letter"),
            PageSize::A4 => f.write_str("a4"),
        }
    }
}

impl FromStr for PageSize {
    type Err = FormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(FormatError::InvalidInput(format!(
                "Unknown page size '{other}' (expected 'letter' or 'a4')"
            ))),
        }
    }
}

/// Options for PDF export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    pub page_size: PageSize,
    /// Title used when the document has no level-1 heading
    pub default_title: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            default_title: crate::formats::html::DEFAULT_TITLE.to_string(),
        }
    }
}

impl PdfOptions {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// Format implementation that shells out to Chrome/Chromium to generate PDFs.
#[derive(Debug, Clone, Default)]
pub struct PdfFormat {
    options: PdfOptions,
}

impl PdfFormat {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }

    pub fn with_page_size(page_size: PageSize) -> Self {
        Self::new(PdfOptions::new(page_size))
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }
}

impl Format for PdfFormat {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Paginated print layout rendered via headless Chrome"
    }

    fn file_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn serialize(&self, doc: &Document) -> Result<SerializedDocument, FormatError> {
        let html = layout_document(doc, &self.options)?;
        let bytes = render_html_to_pdf(&html)?;
        Ok(SerializedDocument::Binary(bytes))
    }
}

#[cfg(feature = "native-export")]
fn render_html_to_pdf(html: &str) -> Result<Vec<u8>, FormatError> {
    chrome::render_html_to_pdf(html)
}

#[cfg(not(feature = "native-export"))]
fn render_html_to_pdf(_html: &str) -> Result<Vec<u8>, FormatError> {
    Err(FormatError::NotSupported(
        "PDF export requires the native-export feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_parses_case_insensitively() {
        assert_eq!("letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!(" a4 ".parse::<PageSize>().unwrap(), PageSize::A4);
        assert!(matches!(
            "legal".parse::<PageSize>(),
            Err(FormatError::InvalidInput(_))
        ));
    }

    #[test]
    fn page_size_display_round_trips() {
        for size in [PageSize::Letter, PageSize::A4] {
            assert_eq!(size.to_string().parse::<PageSize>().unwrap(), size);
        }
    }

    #[test]
    fn default_page_size_is_letter() {
        assert_eq!(PdfOptions::default().page_size, PageSize::Letter);
        assert_eq!(PdfFormat::default().options().page_size, PageSize::Letter);
    }

    #[test]
    fn format_metadata() {
        let format = PdfFormat::with_page_size(PageSize::A4);
        assert_eq!(format.name(), "pdf");
        assert_eq!(format.file_extensions(), &["pdf"]);
        assert_eq!(format.options().page_size, PageSize::A4);
    }
}
