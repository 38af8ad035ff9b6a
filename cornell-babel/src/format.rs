//! Format trait definition
//!
//! Every output format turns an assembled [`Document`] into bytes. Parsing is not part of the
//! trait: all formats share the single markdown front end in [`crate::assembler`].

use crate::error::FormatError;
use crate::ir::nodes::Document;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug)]
pub enum SerializedDocument {
    /// UTF-8 text output (HTML)
    Text(String),
    /// Binary output (PDF)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SerializedDocument::Text(text) => Some(text),
            SerializedDocument::Binary(_) => None,
        }
    }
}

/// An output format
///
/// # Examples
///
/// ```ignore
/// struct Plain;
///
/// impl Format for Plain {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<SerializedDocument, FormatError> {
///         let text = doc.math.restore(&format!("{:?}", doc.blocks));
///         Ok(SerializedDocument::Text(text))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "html", "pdf")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// The first entry is used when deriving an output path.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Render a document. Implementations must resolve every math span exactly once.
    fn serialize(&self, doc: &Document) -> Result<SerializedDocument, FormatError>;
}
