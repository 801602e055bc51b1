//! Patient tables as polars DataFrames.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};

use prontuario_model::{PatientTables, TableKind};

/// One output table with its data.
#[derive(Debug, Clone)]
pub struct TableFrame {
    pub kind: TableKind,
    pub data: DataFrame,
}

impl TableFrame {
    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// The first `limit` rows as display strings.
    pub fn preview_rows(&self, limit: usize) -> Result<Vec<Vec<String>>> {
        let head = self.data.head(Some(limit));
        let columns = head
            .get_columns()
            .iter()
            .map(|column| {
                column
                    .str()
                    .with_context(|| format!("{} is not a string column", column.name()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((0..head.height())
            .map(|idx| {
                columns
                    .iter()
                    .map(|values| values.get(idx).unwrap_or_default().to_string())
                    .collect()
            })
            .collect())
    }
}

/// Build the DataFrame for one table. Every column is a string column, and
/// an empty table still carries its headers.
pub fn table_frame(tables: &PatientTables, kind: TableKind) -> Result<DataFrame> {
    let records = tables.records(kind);
    let columns: Vec<Column> = kind
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let values: Vec<&str> = records.iter().map(|row| row[idx]).collect();
            Column::new((*header).into(), values)
        })
        .collect();
    DataFrame::new(columns).with_context(|| format!("build {} frame", kind.label()))
}

/// Build all four tables in output order.
pub fn table_frames(tables: &PatientTables) -> Result<Vec<TableFrame>> {
    TableKind::ALL
        .iter()
        .map(|&kind| {
            Ok(TableFrame {
                kind,
                data: table_frame(tables, kind)?,
            })
        })
        .collect()
}
