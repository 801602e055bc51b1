//! Prontuário discovery in an input folder.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Whether `path` names a prontuário PDF (case-insensitive `.pdf` extension).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// PDF documents directly inside `dir`, in processing order.
///
/// Only regular files are returned; sub-folders are not descended into even
/// when their name ends in `.pdf`. Order is by file name so that repeated
/// runs over the same folder produce the same tables.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut documents = std::fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(read_error))
        .filter(|path| match path {
            Ok(path) => path.is_file() && is_pdf_path(path),
            Err(_) => true,
        })
        .collect::<Result<Vec<_>>>()?;

    documents.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &[
            "prontuario_Maria_Silva.pdf",
            "prontuario_Ana_Souza.PDF",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "data").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        dir
    }

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf_path(Path::new("prontuario_Ana.pdf")));
        assert!(is_pdf_path(Path::new("scans/PRONTUARIO.PDF")));
        assert!(!is_pdf_path(Path::new("prontuario.pdf.txt")));
        assert!(!is_pdf_path(Path::new("pdf")));
    }

    #[test]
    fn test_list_pdf_files() {
        let dir = create_test_dir();
        let files = list_pdf_files(dir.path()).unwrap();

        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["prontuario_Ana_Souza.PDF", "prontuario_Maria_Silva.pdf"]
        );
    }

    #[test]
    fn test_list_pdf_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = list_pdf_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_pdf_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("single.pdf");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_pdf_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
