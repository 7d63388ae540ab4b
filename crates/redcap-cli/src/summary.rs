use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use redcap_model::ExportFieldName;

use crate::types::{ColumnSummary, FormatSummary};

pub fn print_format_summary(summary: &FormatSummary) {
    println!("Records: {}", summary.records.display());
    if let Some(path) = &summary.output {
        println!("Output: {}", path.display());
    }
    println!("Rows: {}", summary.rows);
    if let Some(provenance) = &summary.provenance {
        match serde_json::to_string(provenance) {
            Ok(json) => println!("Provenance: {json}"),
            Err(error) => eprintln!("warning: could not serialize provenance: {error}"),
        }
    }
    println!("{}", column_table(&summary.columns));
    let failures = summary.total_cast_failures();
    let unknown = summary.total_unknown_levels();
    if failures > 0 || unknown > 0 {
        eprintln!(
            "{failures} cell(s) could not be parsed and {unknown} value(s) had no matching level; \
             they were set to missing"
        );
    }
}

pub fn column_table(columns: &[ColumnSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Levels"),
        header_cell("Missing"),
        header_cell("Failed"),
        header_cell("Unknown"),
        header_cell("Label"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in columns {
        table.add_row(vec![
            Cell::new(&column.column).add_attribute(Attribute::Bold),
            Cell::new(column.kind),
            if column.levels > 0 {
                Cell::new(column.levels)
            } else {
                dim_cell("-")
            },
            dim_cell(column.missing),
            count_cell(column.cast_failures, Color::Red),
            count_cell(column.unknown_levels, Color::Yellow),
            match &column.label {
                Some(label) => Cell::new(label),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn print_fields(exports: &[ExportFieldName]) {
    println!("{}", fields_table(exports));
}

pub fn fields_table(exports: &[ExportFieldName]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Export name"),
        header_cell("Field"),
        header_cell("Choice"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for export in exports {
        table.add_row(vec![
            Cell::new(&export.export_field_name),
            Cell::new(&export.original_field_name),
            match &export.choice_value {
                Some(code) => Cell::new(code),
                None => dim_cell("-"),
            },
            Cell::new(&export.label),
        ]);
    }
    table
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
