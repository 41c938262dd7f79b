//! Core building blocks: text extraction, complexity, and file loading

pub mod complexity;
pub mod loader;
pub mod parser;
