pub mod analyzer;
pub mod classifier;
pub mod condenser;
pub mod config;
pub mod documents;
pub mod identity;
pub mod keywords;
pub mod reader;
pub mod segmenter;
pub mod selector;
pub mod simulation;
pub mod tracker;
