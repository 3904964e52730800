//! Terminal rendering of run outcomes.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use roster_model::RunOutcome;

/// A failed run as reported by `scan`.
#[derive(Debug, Clone)]
pub struct FailedRun {
    pub file: String,
    pub error: String,
}

/// Build the outcome table: one row per file, plus a total row when there
/// is more than one.
pub fn outcome_table(outcomes: &[RunOutcome], failures: &[FailedRun]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Accepted"),
        header_cell("Invalid"),
        header_cell("Duplicates"),
        header_cell("Seconds"),
        header_cell("Fingerprint"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_accepted = 0usize;
    let mut total_invalid = 0usize;
    for outcome in outcomes {
        let fingerprint = short_fingerprint(outcome.fingerprint().as_str());
        match outcome {
            RunOutcome::Processed(summary) => {
                total_rows += summary.total_rows;
                total_accepted += summary.accepted_rows;
                total_invalid += summary.invalid_rows;
                table.add_row(vec![
                    Cell::new(&summary.file),
                    Cell::new("processed")
                        .fg(Color::Green)
                        .add_attribute(Attribute::Bold),
                    Cell::new(summary.total_rows),
                    count_cell(summary.accepted_rows, Color::Green),
                    count_cell(summary.invalid_rows, Color::Yellow),
                    count_cell(summary.duplicates_removed, Color::Yellow),
                    Cell::new(format!("{:.2}", summary.processing_time_seconds)),
                    dim_cell(fingerprint),
                ]);
            }
            RunOutcome::Skipped { file, .. } => {
                table.add_row(vec![
                    Cell::new(file),
                    dim_cell("skipped"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell(fingerprint),
                ]);
            }
            RunOutcome::Aborted {
                file, total_rows: rows, ..
            } => {
                total_rows += rows;
                table.add_row(vec![
                    Cell::new(file),
                    Cell::new("aborted")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                    Cell::new(rows),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell(fingerprint),
                ]);
            }
        }
    }
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.file),
            Cell::new("failed")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    if outcomes.len() + failures.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(total_rows).add_attribute(Attribute::Bold),
            count_cell(total_accepted, Color::Green).add_attribute(Attribute::Bold),
            count_cell(total_invalid, Color::Yellow).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table
}

/// Print the outcome table, then schema diagnostics and failures.
pub fn print_outcomes(outcomes: &[RunOutcome], failures: &[FailedRun]) {
    println!("{}", outcome_table(outcomes, failures));
    for outcome in outcomes {
        match outcome {
            RunOutcome::Aborted {
                file,
                missing_columns,
                error_key,
                ..
            } => {
                let missing: Vec<&str> = missing_columns.iter().map(String::as_str).collect();
                eprintln!(
                    "{file}: missing required columns: {} (table written to {error_key})",
                    missing.join(", ")
                );
            }
            RunOutcome::Processed(summary) if !summary.rejections.is_empty() => {
                let rules: Vec<String> = summary
                    .rejections
                    .iter()
                    .map(|(rule, count)| format!("{rule}={count}"))
                    .collect();
                println!("{}: rejected by rule: {}", summary.file, rules.join(", "));
            }
            _ => {}
        }
    }
    if !failures.is_empty() {
        eprintln!("Errors:");
        for failure in failures {
            eprintln!("- {}: {}", failure.file, failure.error);
        }
    }
}

/// JSON document for `--json` output.
pub fn outcomes_json(outcomes: &[RunOutcome], failures: &[FailedRun]) -> serde_json::Value {
    let failed: Vec<serde_json::Value> = failures
        .iter()
        .map(|failure| {
            serde_json::json!({
                "status": "failed",
                "file": failure.file,
                "error": failure.error,
            })
        })
        .collect();
    serde_json::json!({
        "outcomes": outcomes,
        "failures": failed,
    })
}

fn short_fingerprint(fingerprint: &str) -> String {
    fingerprint.chars().take(12).collect()
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
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
