//! Cornell notes conversion
//!
//!     This crate turns markdown notes written in the Cornell layout (a cue column next to a notes
//!     column, followed by a summary) into a styled HTML page or a paginated PDF, preserving any
//!     LaTeX math.
//!
//!     This is a pure lib: it powers the cornell CLI but is shell agnostic, so nothing here prints
//!     to stdout or reads CLI arguments. Diagnostics go through `tracing`.
//!
//! Pipeline
//!
//!     text ──▶ math shield ──▶ assembler ──▶ blocks ──▶ format ──▶ bytes ──▶ file
//!
//!     1. The math shield (./math/shield.rs) replaces every `$...$` and `$$...$$` span with an
//!        opaque token, so no later stage can mangle LaTeX.
//!     2. The assembler (./assembler.rs) is a line-oriented state machine that classifies the
//!        shielded text into headings, Cornell tables (./table.rs), summaries, paragraphs and
//!        rules.
//!     3. A format (./formats) renders the blocks. Inline markup is parsed on demand
//!        (./inline.rs) and every math token is resolved exactly once through a ledger; a
//!        conversion whose ledger does not balance fails instead of emitting broken output.
//!     4. The converter (./convert.rs) writes the result atomically.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── convert.rs              # Converter: file in, file out
//!     ├── assembler.rs            # Block classification state machine
//!     ├── table.rs                # Cornell table syntaxes
//!     ├── inline.rs               # Bold / code / math inline content
//!     ├── math
//!     │   ├── shield.rs           # Math placeholder tokens
//!     │   └── unicode.rs          # LaTeX → Unicode approximation
//!     ├── ir                      # Block and inline node types
//!     └── formats
//!         ├── common              # Shared DOM helpers
//!         ├── html
//!         └── pdf
//!
//! Testing
//!
//!     Unit tests live next to each module. Integration tests are under tests/, one file per
//!     concern, with the PDF tests driving a stub Chrome script.

pub mod assembler;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod inline;
pub mod ir;
pub mod math;
pub mod registry;
pub mod table;

pub use assembler::{assemble, parse_document};
pub use convert::{default_output_path, render, Converter, ConverterConfig, OutputTarget};
pub use error::FormatError;
pub use format::{Format, SerializedDocument};
pub use formats::{HtmlFormat, HtmlOptions, PageSize, PdfFormat, PdfOptions};
pub use ir::nodes::{Block, CornellTable, CuePair, Document};
pub use registry::FormatRegistry;
