//! Adaptive Reader — narrative text rendered to fit how a reader reads.
//!
//! Splits paragraphs into sentences, tags each by narrative function,
//! derives condensed and summary renderings, and picks which one to serve
//! from per-user reading patterns learned by exponential smoothing.

pub mod core;
pub mod schema;
