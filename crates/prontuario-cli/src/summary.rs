use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{ExtractResult, RecognizeResult, TableSummary};

pub fn print_summary(result: &ExtractResult) {
    println!("Input: {}", result.input_dir.display());
    if result.dry_run {
        println!("Output: {} (dry run, nothing written)", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("Recognizer: {}", result.recognizer);
    println!(
        "Documents: {} processed, {} skipped",
        result.processed,
        result.skipped.len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Written"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for summary in &result.tables {
        table.add_row(vec![
            Cell::new(summary.kind.label())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.file_name),
            count_cell(summary.rows),
            written_cell(summary),
        ]);
    }
    println!("{table}");

    for summary in &result.tables {
        print_preview(summary);
    }
    print_skipped(result);
}

fn print_preview(summary: &TableSummary) {
    if summary.preview.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(summary.columns.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table);
    for row in &summary.preview {
        table.add_row(row);
    }
    println!();
    println!(
        "{} (first {} of {} rows):",
        summary.file_name,
        summary.preview.len(),
        summary.rows
    );
    println!("{table}");
}

fn print_skipped(result: &ExtractResult) {
    if !result.has_skipped() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Document"),
        header_cell("Stage"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    for skipped in &result.skipped {
        table.add_row(vec![
            Cell::new(&skipped.file),
            Cell::new(skipped.kind).fg(Color::Yellow),
            Cell::new(&skipped.reason),
        ]);
    }
    println!();
    println!("Skipped:");
    println!("{table}");
}

pub fn print_entities(result: &RecognizeResult) {
    println!("Document: {}", result.pdf.display());
    println!("Recognizer: {}", result.recognizer);

    let mut raw = Table::new();
    raw.set_header(vec![header_cell("#"), header_cell("Category"), header_cell("Text")]);
    apply_table_style(&mut raw);
    align_column(&mut raw, 0, CellAlignment::Right);
    for (idx, entity) in result.raw.iter().enumerate() {
        raw.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(entity.category.label()),
            Cell::new(&entity.text),
        ]);
    }
    println!("Recognized ({}):", result.raw.len());
    println!("{raw}");

    let mut filtered = Table::new();
    filtered.set_header(vec![header_cell("Conditions"), header_cell("Medications")]);
    apply_table_style(&mut filtered);
    let rows = result
        .filtered
        .diseases
        .len()
        .max(result.filtered.medications.len());
    for idx in 0..rows {
        filtered.add_row(vec![
            list_cell(result.filtered.diseases.get(idx)),
            list_cell(result.filtered.medications.get(idx)),
        ]);
    }
    println!();
    println!("After filtering:");
    println!("{filtered}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn written_cell(summary: &TableSummary) -> Cell {
    match &summary.output {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn list_cell(value: Option<&String>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => Cell::new(""),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
