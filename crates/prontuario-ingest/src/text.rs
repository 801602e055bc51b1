//! Document text recovery.
//!
//! A document's raw text is the concatenation, in page order, of each page's
//! extracted text. A page that yields no text fails the whole document: the
//! field parser relies on every labeled section being somewhere in the
//! concatenation, so a silently dropped page would corrupt the output.

use std::path::Path;
use std::time::Instant;

use lopdf::Document;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Source of a document's full text.
///
/// The pipeline only depends on this seam; [`PdfReader`] is the production
/// implementation.
pub trait DocumentReader {
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Reads PDF text with `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for PdfReader {
    fn read_text(&self, path: &Path) -> Result<String> {
        let start = Instant::now();
        let document = Document::load(path).map_err(|e| IngestError::PdfLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let page_numbers: Vec<u32> = document.get_pages().into_keys().collect();
        let page_count = page_numbers.len();

        let pages = page_numbers.into_iter().map(|page| {
            document
                .extract_text(&[page])
                .map(|text| (page, text))
                .map_err(|e| IngestError::PageText {
                    path: path.to_path_buf(),
                    page,
                    message: e.to_string(),
                })
        });
        let text = concat_pages(path, pages)?;

        debug!(
            page_count,
            char_count = text.chars().count(),
            duration_ms = start.elapsed().as_millis(),
            "extracted document text"
        );
        Ok(text)
    }
}

/// Concatenate page texts in the order given.
///
/// Fails on the first page whose text is empty or whitespace-only, and when
/// there are no pages at all.
pub fn concat_pages<I>(path: &Path, pages: I) -> Result<String>
where
    I: IntoIterator<Item = Result<(u32, String)>>,
{
    let mut text = String::new();
    let mut seen_page = false;
    for page in pages {
        let (number, page_text) = page?;
        if page_text.trim().is_empty() {
            return Err(IngestError::EmptyPage {
                path: path.to_path_buf(),
                page: number,
            });
        }
        text.push_str(&page_text);
        seen_page = true;
    }
    if !seen_page {
        return Err(IngestError::NoPages {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<Result<(u32, String)>> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| Ok((idx as u32 + 1, text.to_string())))
            .collect()
    }

    #[test]
    fn concatenates_in_page_order() {
        let text = concat_pages(
            Path::new("a.pdf"),
            pages(&["Nome: Ana\n", "Sexo: F\n", "Vacinas: Gripe"]),
        )
        .unwrap();
        assert_eq!(text, "Nome: Ana\nSexo: F\nVacinas: Gripe");
    }

    #[test]
    fn blank_page_is_an_error() {
        let err = concat_pages(Path::new("a.pdf"), pages(&["Nome: Ana\n", " \n"])).unwrap_err();
        assert!(matches!(err, IngestError::EmptyPage { page: 2, .. }));
    }

    #[test]
    fn no_pages_is_an_error() {
        let err = concat_pages(Path::new("a.pdf"), pages(&[])).unwrap_err();
        assert!(matches!(err, IngestError::NoPages { .. }));
    }

    #[test]
    fn page_failure_propagates() {
        let input = vec![
            Ok((1, "Nome: Ana\n".to_string())),
            Err(IngestError::PageText {
                path: "a.pdf".into(),
                page: 2,
                message: "bad stream".to_string(),
            }),
        ];
        let err = concat_pages(Path::new("a.pdf"), input).unwrap_err();
        assert!(matches!(err, IngestError::PageText { page: 2, .. }));
    }

    #[test]
    fn unreadable_file_is_a_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "not a pdf").unwrap();

        let err = PdfReader::new().read_text(&path).unwrap_err();
        assert!(matches!(err, IngestError::PdfLoad { .. }));
    }
}
