use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use recode_model::RecodingMap;
use recode_transform::UnexpectedValues;

use crate::types::{ApplyResult, CheckResult};

const MAX_EXAMPLES: usize = 5;

/// Printed to stderr; stdout may be carrying the recoded CSV.
pub fn print_apply_summary(result: &ApplyResult) {
    eprintln!("Codebook: {}", result.codebook.display());
    eprintln!("Dataset: {} ({} rows)", result.data.display(), result.rows);
    match (&result.output, result.withheld) {
        (_, true) => eprintln!("Output: withheld"),
        (Some(path), false) => eprintln!("Output: {}", path.display()),
        (None, false) => eprintln!("Output: stdout"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Rows"),
        header_cell("Replaced"),
        header_cell("Nulls"),
        header_cell("Unchanged"),
        header_cell("Unmatched values"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let report = &result.outcome.report;
    for stats in &report.columns {
        table.add_row(vec![
            Cell::new(&stats.column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(stats.rows),
            count_cell(stats.replaced, Color::Green),
            count_cell(stats.nulls, Color::DarkGrey),
            count_cell(stats.passed_through(), Color::Yellow),
            example_cell(&stats.unmatched),
        ]);
    }
    eprintln!("{table}");

    if !report.skipped.is_empty() {
        eprintln!("Not in dataset: {}", report.skipped.join(", "));
    }
    if !result.outcome.unexpected.is_empty() {
        eprintln!();
        eprintln!("Unlabelled values:");
        eprintln!("{}", unexpected_table(&result.outcome.unexpected));
    }
}

pub fn print_check_summary(result: &CheckResult) {
    println!("Codebook: {}", result.codebook.display());
    println!("Rows: {}  Variables: {}", result.rows, result.variables);
    if let Some(path) = &result.data {
        println!("Dataset: {}", path.display());
    }
    let outcome = &result.outcome;

    if outcome.collisions.is_empty() {
        println!("No conflicting duplicates.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Variable"),
            header_cell("Old value"),
            header_cell("First label"),
            header_cell("Row"),
            header_cell("Second label"),
            header_cell("Row"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 3, CellAlignment::Right);
        align_column(&mut table, 5, CellAlignment::Right);
        for collision in &outcome.collisions {
            table.add_row(vec![
                Cell::new(&collision.variable),
                Cell::new(&collision.old_value),
                Cell::new(&collision.first_label),
                dim_cell(collision.first_row),
                Cell::new(&collision.second_label).fg(Color::Red),
                dim_cell(collision.second_row),
            ]);
        }
        println!();
        println!("Conflicting duplicates (later row wins):");
        println!("{table}");
    }

    if !outcome.chained.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Variable"),
            header_cell("Label"),
            header_cell("Second pass"),
        ]);
        apply_table_style(&mut table);
        for chained in &outcome.chained {
            table.add_row(vec![
                Cell::new(&chained.variable),
                Cell::new(&chained.label),
                Cell::new(&chained.remapped_to).fg(Color::Yellow),
            ]);
        }
        println!();
        println!("Labels that are also old values (recoding twice changes them):");
        println!("{table}");
    }

    if !outcome.missing_columns.is_empty() {
        println!();
        println!("Not in dataset: {}", outcome.missing_columns.join(", "));
    }
    if !outcome.uncovered.is_empty() {
        println!();
        println!("Values without a codebook entry:");
        println!("{}", unexpected_table(&outcome.uncovered));
    }
}

pub fn print_map_table(map: &RecodingMap) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Old value"),
        header_cell("New label"),
    ]);
    apply_table_style(&mut table);
    for (variable, recode) in map.iter() {
        for (index, (old, label)) in recode.iter().enumerate() {
            let variable_cell = if index == 0 {
                Cell::new(variable)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("")
            };
            table.add_row(vec![variable_cell, Cell::new(old), Cell::new(label)]);
        }
    }
    println!("{table}");
}

fn unexpected_table(findings: &[UnexpectedValues]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Cells"),
        header_cell("Values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for finding in findings {
        table.add_row(vec![
            Cell::new(&finding.column),
            Cell::new(finding.cells).fg(Color::Red),
            example_cell(&finding.values),
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn example_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        return dim_cell("-");
    }
    let mut shown = values
        .iter()
        .take(MAX_EXAMPLES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if values.len() > MAX_EXAMPLES {
        shown.push_str(&format!(" (+{} more)", values.len() - MAX_EXAMPLES));
    }
    Cell::new(shown)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
