use std::path::PathBuf;

use prontuario_model::{FilteredEntities, RecognizedEntity, TableKind};

#[derive(Debug)]
pub struct ExtractResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub recognizer: String,
    pub processed: usize,
    pub tables: Vec<TableSummary>,
    pub skipped: Vec<SkippedSummary>,
}

impl ExtractResult {
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[derive(Debug)]
pub struct TableSummary {
    pub kind: TableKind,
    pub file_name: String,
    pub rows: usize,
    /// Written file; `None` on a dry run.
    pub output: Option<PathBuf>,
    pub columns: Vec<String>,
    pub preview: Vec<Vec<String>>,
}

#[derive(Debug)]
pub struct SkippedSummary {
    pub file: String,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Debug)]
pub struct RecognizeResult {
    pub pdf: PathBuf,
    pub recognizer: String,
    pub raw: Vec<RecognizedEntity>,
    pub filtered: FilteredEntities,
}
