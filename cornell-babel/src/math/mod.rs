//! LaTeX math handling
//!
//! [`shield`] protects math spans from every text transformation; [`unicode`] approximates
//! them for output formats that have no math renderer of their own.

pub mod shield;
pub mod unicode;

pub use shield::{MathKind, MathShield, MathSpan, Segment};
pub use unicode::latex_to_unicode;
