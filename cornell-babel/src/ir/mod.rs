//! Intermediate Representation (IR) for Cornell notes.
//!
//! The assembler produces these nodes from shielded markdown; the HTML and PDF formats
//! consume them. Nothing here knows about either output format.

pub mod nodes;
