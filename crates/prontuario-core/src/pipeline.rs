//! Per-document processing and batch aggregation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use prontuario_extract::{
    EntityFilter, EntityRecognizer, FieldParser, FieldSettings, FilterSettings, validate_spans,
};
use prontuario_ingest::{DocumentReader, list_pdf_files};
use prontuario_model::{DocumentExtraction, PatientTables};

use crate::config::PipelineConfig;
use crate::error::{BatchError, DocumentError};
use crate::redact::redact_value;

/// A document that produced no rows, with the reason.
#[derive(Debug)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub error: DocumentError,
}

/// Result of a completed batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub tables: PatientTables,
    /// Documents that contributed rows, in processing order.
    pub processed: Vec<PathBuf>,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchOutcome {
    pub fn document_count(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }

    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// The extraction pipeline: reader, field rules, recognizer and filter.
pub struct Pipeline<R, E> {
    reader: R,
    recognizer: E,
    parser: FieldParser,
    filter: EntityFilter,
}

impl<R, E> Pipeline<R, E>
where
    R: DocumentReader,
    E: EntityRecognizer,
{
    /// Create a pipeline with default field rules and stoplists.
    pub fn new(reader: R, recognizer: E) -> Self {
        Self {
            reader,
            recognizer,
            parser: FieldParser::default(),
            filter: EntityFilter::default(),
        }
    }

    /// Create a pipeline using the field and filter sections of `config`.
    pub fn from_config(reader: R, recognizer: E, config: &PipelineConfig) -> Self {
        Self::new(reader, recognizer)
            .with_field_settings(config.fields.clone())
            .with_filter_settings(&config.filter)
    }

    pub fn with_field_settings(mut self, settings: FieldSettings) -> Self {
        self.parser = FieldParser::new(settings);
        self
    }

    pub fn with_filter_settings(mut self, settings: &FilterSettings) -> Self {
        self.filter = EntityFilter::new(settings);
        self
    }

    pub fn recognizer(&self) -> &E {
        &self.recognizer
    }

    /// Extract one document's data from its full text.
    ///
    /// Required fields are checked before the recognizer runs, so a document
    /// with a missing label never reaches the model.
    pub fn process_text(&self, text: &str) -> Result<DocumentExtraction, DocumentError> {
        let fields = self.parser.parse(text)?;
        let entities = self.recognizer.recognize(text)?;
        validate_spans(self.recognizer.name(), &entities)?;
        let filtered = self.filter.apply(&entities);
        debug!(
            entities = entities.len(),
            diseases = filtered.diseases.len(),
            medications = filtered.medications.len(),
            procedures = fields.procedures.len(),
            vaccines = fields.vaccines.len(),
            "document extracted"
        );
        Ok(DocumentExtraction {
            demographics: fields.demographics,
            entities: filtered,
            procedures: fields.procedures,
            vaccines: fields.vaccines,
        })
    }

    pub fn process_document(&self, path: &Path) -> Result<DocumentExtraction, DocumentError> {
        let text = self.reader.read_text(path)?;
        self.process_text(&text)
    }

    /// Process documents in the given order and aggregate their rows.
    ///
    /// Extraction and field failures skip the document; a recognizer failure
    /// aborts the whole batch.
    pub fn run_batch(&self, paths: &[PathBuf]) -> Result<BatchOutcome, BatchError> {
        let batch_span = info_span!(
            "batch",
            documents = paths.len(),
            recognizer = self.recognizer.name()
        );
        let _batch_guard = batch_span.enter();
        let start = Instant::now();
        let mut outcome = BatchOutcome::default();

        for path in paths {
            let file = file_label(path);
            let document_span = info_span!("document", file = %file);
            let _document_guard = document_span.enter();
            info!("processing document");
            let doc_start = Instant::now();

            match self.process_document(path) {
                Ok(extraction) => {
                    info!(
                        patient = redact_value(extraction.patient_name()),
                        conditions = extraction.entities.diseases.len(),
                        treatments = extraction.entities.medications.len(),
                        procedures_vaccines = extraction.procedures.len() + extraction.vaccines.len(),
                        duration_ms = doc_start.elapsed().as_millis(),
                        "document processed"
                    );
                    outcome.tables.append(&extraction);
                    outcome.processed.push(path.clone());
                }
                Err(DocumentError::Recognizer(source)) => {
                    warn!(error = %source, "recognizer failed; aborting batch");
                    return Err(BatchError::Recognizer {
                        path: path.clone(),
                        source,
                    });
                }
                Err(error) => {
                    log_skipped(&error);
                    outcome.skipped.push(SkippedDocument {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            processed = outcome.processed.len(),
            skipped = outcome.skipped.len(),
            duration_ms = start.elapsed().as_millis(),
            "batch complete"
        );
        Ok(outcome)
    }

    /// Discover the PDFs in `dir` and run them as one batch.
    pub fn run_directory(&self, dir: &Path) -> Result<BatchOutcome, BatchError> {
        let paths = list_pdf_files(dir)?;
        if paths.is_empty() {
            warn!(dir = %dir.display(), "no PDF documents found");
        }
        self.run_batch(&paths)
    }
}

/// Field errors carry the offending value, which may be the patient's name.
fn log_skipped(error: &DocumentError) {
    match error.field() {
        Some(field) => {
            let reason = error.to_string();
            warn!(
                kind = error.kind(),
                field = field.label(),
                reason = redact_value(&reason),
                "document skipped"
            );
        }
        None => warn!(kind = error.kind(), error = %error, "document skipped"),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_label_uses_file_name() {
        assert_eq!(
            file_label(Path::new("/data/pdf_output/prontuario_Ana.pdf")),
            "prontuario_Ana.pdf"
        );
        assert_eq!(file_label(Path::new("/")), "/");
    }
}
