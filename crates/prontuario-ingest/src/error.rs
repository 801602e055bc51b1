//! Error types for prontuário ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering documents or recovering their text.
///
/// Every variant except the directory ones is a per-document extraction
/// failure: the document is skipped and the batch continues.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Text Extraction Errors ===
    /// The file could not be opened or parsed as a PDF.
    #[error("failed to load PDF {path}: {message}")]
    PdfLoad { path: PathBuf, message: String },

    /// The document parsed but contains no pages.
    #[error("PDF has no pages: {path}")]
    NoPages { path: PathBuf },

    /// Text could not be decoded from a page.
    #[error("failed to extract text from page {page} of {path}: {message}")]
    PageText {
        path: PathBuf,
        page: u32,
        message: String,
    },

    /// A page decoded to no text at all.
    #[error("page {page} of {path} has no extractable text")]
    EmptyPage { path: PathBuf, page: u32 },
}

impl IngestError {
    /// True for failures that only concern a single document.
    pub fn is_document_error(&self) -> bool {
        !matches!(
            self,
            Self::DirectoryNotFound { .. } | Self::DirectoryRead { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::EmptyPage {
            path: PathBuf::from("/data/prontuario_Ana.pdf"),
            page: 2,
        };
        assert_eq!(
            err.to_string(),
            "page 2 of /data/prontuario_Ana.pdf has no extractable text"
        );
    }

    #[test]
    fn test_document_error_classification() {
        let dir = IngestError::DirectoryNotFound {
            path: PathBuf::from("/missing"),
        };
        let page = IngestError::NoPages {
            path: PathBuf::from("/x.pdf"),
        };
        assert!(!dir.is_document_error());
        assert!(page.is_document_error());
    }
}
