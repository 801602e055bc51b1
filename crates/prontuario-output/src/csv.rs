//! CSV output.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tempfile::NamedTempFile;
use tracing::info;

use prontuario_core::OutputSettings;

use crate::frame::TableFrame;

/// Write one DataFrame as CSV with a header row.
pub fn write_table_csv<W: Write>(writer: &mut W, data: &mut DataFrame) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .finish(data)
        .context("serialize CSV")?;
    Ok(())
}

/// Write table frames into `output_dir`, creating it if needed.
///
/// Every table is first written to a temporary file in `output_dir`; the
/// existing files are only replaced once all tables were written, so a
/// failed run leaves the previous outputs untouched. Returns the written
/// paths in frame order.
pub fn write_csv_outputs(
    output_dir: &Path,
    frames: &mut [TableFrame],
    settings: &OutputSettings,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let destinations: Vec<PathBuf> = frames
        .iter()
        .map(|frame| output_dir.join(settings.file_name(frame.kind)))
        .collect();
    for path in &destinations {
        if path.exists() && !path.is_file() {
            bail!("output path {} exists and is not a file", path.display());
        }
    }

    let mut staged = Vec::with_capacity(frames.len());
    for (frame, path) in frames.iter_mut().zip(&destinations) {
        let mut file = NamedTempFile::new_in(output_dir)
            .with_context(|| format!("create temporary file in {}", output_dir.display()))?;
        write_table_csv(&mut file, &mut frame.data)
            .with_context(|| format!("write {}", path.display()))?;
        file.flush()
            .with_context(|| format!("flush {}", path.display()))?;
        staged.push(file);
    }

    for ((file, path), frame) in staged.into_iter().zip(&destinations).zip(frames.iter()) {
        file.persist(path)
            .with_context(|| format!("replace {}", path.display()))?;
        info!(
            table = frame.kind.label(),
            rows = frame.row_count(),
            path = %path.display(),
            "table written"
        );
    }
    Ok(destinations)
}
