//! CLI library components for the prontuário extractor.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
