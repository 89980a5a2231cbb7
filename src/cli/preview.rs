use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::aggregator::aggregate;
use crate::decode::decode_file;
use crate::error::Result;
use crate::fmt::{date_range_label, Formatter, UsFormatter};
use crate::layout::{transaction_table, AMOUNT_COLUMN, TRANSACTION_COLUMNS};
use crate::models::AggregatedReport;
use crate::settings::shellexpand_path;
use crate::style::Highlight;

pub fn run(file: &str) -> Result<()> {
    let rows = decode_file(&PathBuf::from(shellexpand_path(file)))?;
    let report = aggregate(&rows);
    println!("{}", format_preview(&report, &UsFormatter));
    Ok(())
}

fn amount_cell(text: &str, highlight: Highlight) -> Cell {
    let styled = match highlight {
        Highlight::Normal => text.normal(),
        Highlight::Refund => text.red().bold(),
        Highlight::ZeroAmount => text.dimmed().italic(),
    };
    Cell::new(styled).set_alignment(CellAlignment::Right)
}

pub fn format_preview(report: &AggregatedReport, fmt: &dyn Formatter) -> String {
    if report.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{}", "Report Preview".bold()));
    if let Some(label) = date_range_label(&report.date_range, fmt) {
        out.push_str(&format!("  {label}"));
    }
    out.push('\n');

    for group in &report.groups {
        out.push('\n');
        out.push_str(&format!("{}\n", group.category.cyan().bold()));

        let block = transaction_table(group, fmt);
        let mut table = Table::new();
        table.set_header(TRANSACTION_COLUMNS.iter().map(|c| c.title).collect::<Vec<_>>());
        for row in &block.rows {
            let cells: Vec<Cell> = row
                .cells
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    if i == AMOUNT_COLUMN {
                        amount_cell(text, row.highlight)
                    } else {
                        Cell::new(text)
                    }
                })
                .collect();
            table.add_row(cells);
        }
        out.push_str(&format!("{table}\n"));
        out.push_str(&format!(
            "{} {}\n",
            format!("{} Total:", group.category).bold(),
            fmt.currency(group.total)
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "{} {}",
        "Grand Total:".bold(),
        fmt.currency(report.grand_total)
    ));
    out
}
