//! Prontuário ingestion.
//!
//! This crate discovers prontuário PDFs in an input folder and recovers
//! their plain text.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use prontuario_ingest::{DocumentReader, PdfReader, list_pdf_files};
//!
//! let reader = PdfReader::new();
//! for path in list_pdf_files(Path::new("pdf_output"))? {
//!     let text = reader.read_text(&path)?;
//! }
//! ```

mod discovery;
mod error;
mod text;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{is_pdf_path, list_pdf_files};

// === Text Extraction ===
pub use text::{DocumentReader, PdfReader, concat_pages};
