//! Format implementations
//!
//! Each output format renders the assembled document; `common` holds the DOM helpers they share.

pub(crate) mod common;
pub mod html;
pub mod pdf;

pub use html::{HtmlFormat, HtmlOptions, CORNELL_CSS};
pub use pdf::{PageSize, PdfFormat, PdfOptions};
