pub mod content;
pub mod document;
pub mod pattern;
