//! Conversion pipeline.
//!
//! Ties the stages together: read the markdown, shield math, assemble blocks, render the target
//! format, and write exactly one output file.
//!
//! The output is written to a temporary file in the destination directory and then persisted
//! over the target path, so a failed conversion never leaves a partial file behind.
//!
//! ```ignore
//! let written = Converter::html("notes.html").convert_file("notes.md")?;
//! let pdf = Converter::pdf("notes.pdf", PageSize::A4).convert_text("# Notes\n")?;
//! ```
//!
//! For in-memory rendering without any file I/O, use [`render`].

use crate::assembler::parse_document;
use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::formats::html::{HtmlFormat, HtmlOptions};
use crate::formats::pdf::{PageSize, PdfFormat, PdfOptions};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The output format of a conversion together with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Html(HtmlOptions),
    Pdf(PdfOptions),
}

impl OutputTarget {
    /// Format name as known to the [`crate::FormatRegistry`].
    pub fn name(&self) -> &'static str {
        match self {
            OutputTarget::Html(_) => "html",
            OutputTarget::Pdf(_) => "pdf",
        }
    }

    /// Default file extension for this target.
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    fn serialize(&self, doc: &crate::ir::nodes::Document) -> Result<SerializedDocument, FormatError> {
        match self {
            OutputTarget::Html(options) => HtmlFormat::new(options.clone()).serialize(doc),
            OutputTarget::Pdf(options) => PdfFormat::new(options.clone()).serialize(doc),
        }
    }
}

/// Where and how one conversion writes its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub output: PathBuf,
    pub target: OutputTarget,
}

/// Converts Cornell markdown to a single HTML or PDF file.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// HTML output with default options.
    pub fn html(output: impl Into<PathBuf>) -> Self {
        Self::new(ConverterConfig {
            output: output.into(),
            target: OutputTarget::Html(HtmlOptions::default()),
        })
    }

    /// PDF output with the given page size.
    pub fn pdf(output: impl Into<PathBuf>, page_size: PageSize) -> Self {
        Self::new(ConverterConfig {
            output: output.into(),
            target: OutputTarget::Pdf(PdfOptions::new(page_size)),
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Reads `input` and converts it. Returns the path that was written.
    pub fn convert_file(&self, input: impl AsRef<Path>) -> Result<PathBuf, FormatError> {
        let input = input.as_ref();
        if same_file(input, &self.config.output) {
            return Err(FormatError::InvalidInput(format!(
                "Output '{}' would overwrite the input file",
                self.config.output.display()
            )));
        }

        let bytes = fs::read(input).map_err(|e| FormatError::io(input, e))?;
        let text = String::from_utf8(bytes).map_err(|_| {
            FormatError::InvalidInput(format!("'{}' is not valid UTF-8", input.display()))
        })?;
        tracing::debug!(input = %input.display(), bytes = text.len(), "read notes");

        self.convert_text(&text)
    }

    /// Converts markdown held in memory. Returns the path that was written.
    pub fn convert_text(&self, text: &str) -> Result<PathBuf, FormatError> {
        let rendered = render(text, &self.config.target)?;
        write_atomically(&self.config.output, &rendered.into_bytes())?;

        tracing::info!(
            output = %self.config.output.display(),
            format = self.config.target.name(),
            "wrote output"
        );
        Ok(self.config.output.clone())
    }
}

/// Parses `text` and renders it for `target`, entirely in memory.
pub fn render(text: &str, target: &OutputTarget) -> Result<SerializedDocument, FormatError> {
    let doc = parse_document(text)?;
    target.serialize(&doc)
}

/// `input` with its extension replaced by `extension`, in the same directory.
pub fn default_output_path(input: impl AsRef<Path>, extension: &str) -> PathBuf {
    input.as_ref().with_extension(extension)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FormatError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = new_output_file(dir, path)?;
    file.write_all(bytes).map_err(|e| FormatError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| FormatError::io(path, e.error))?;
    Ok(())
}

/// Temp file for `target` with the mode a plain write would give it: the mode of the file being
/// replaced, else `0o666` minus the umask.
fn new_output_file(dir: &Path, target: &Path) -> Result<NamedTempFile, FormatError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".cornell");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // The mode is passed to open(2), so the umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let file = builder
        .tempfile_in(dir)
        .map_err(|e| FormatError::io(dir, e))?;

    if let Ok(existing) = fs::metadata(target) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| FormatError::io(file.path(), e))?;
    }
    Ok(file)
}
