use crate::error::Result;
use crate::types::PREVIEW_ROWS;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::ops::Range;

const COLUMN_WIDTH: usize = 16;

/// Print a preview of a table: header, first and last rows, row count
pub fn display_table(title: &str, table: &RecordBatch) -> Result<()> {
    if table.num_rows() == 0 {
        println!("No data to display");
        return Ok(());
    }

    let width = (table.num_columns() * (COLUMN_WIDTH + 1)).max(60);
    println!("\n{}", "=".repeat(width));
    println!("{:^width$}", title, width = width);
    println!("{}", "=".repeat(width));

    let header: Vec<String> = table
        .schema()
        .fields()
        .iter()
        .map(|f| format!("{:>w$}", truncate(f.name()), w = COLUMN_WIDTH))
        .collect();
    println!("{}", header.join(" "));
    println!("{}", "-".repeat(width));

    let options = FormatOptions::default().with_null("NaN");
    let formatters = table
        .columns()
        .iter()
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let print_row = |row: usize| {
        let cells: Vec<String> = formatters
            .iter()
            .map(|f| format!("{:>w$}", truncate(&f.value(row).to_string()), w = COLUMN_WIDTH))
            .collect();
        println!("{}", cells.join(" "));
    };

    println!("=== FIRST {} ROWS ===", PREVIEW_ROWS);
    for row in 0..table.num_rows().min(PREVIEW_ROWS) {
        print_row(row);
    }

    if table.num_rows() > PREVIEW_ROWS {
        println!("\n=== LAST {} ROWS ===", PREVIEW_ROWS);
        for row in tail_rows(table.num_rows()) {
            print_row(row);
        }
    }

    println!("{}", "=".repeat(width));
    println!("Total rows: {}", table.num_rows());
    Ok(())
}

/// Rows of the tail block; overlaps the head block for short tables
fn tail_rows(num_rows: usize) -> Range<usize> {
    num_rows.saturating_sub(PREVIEW_ROWS)..num_rows
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() > COLUMN_WIDTH {
        let mut short: String = cell.chars().take(COLUMN_WIDTH - 1).collect();
        short.push('~');
        short
    } else {
        cell.to_string()
    }
}
