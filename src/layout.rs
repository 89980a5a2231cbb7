//! Backend-independent page layout for a sales report.
//!
//! [`plan`] walks an [`AggregatedReport`] and emits the instructions a drawing
//! backend replays in order. The only thing the planner cannot know on its own
//! is how tall a rendered table is, so the backend supplies a [`Measure`].

use serde::{Deserialize, Serialize};

use crate::fmt::{date_range_label, Formatter};
use crate::models::{AggregatedReport, CategoryGroup};
use crate::style::Highlight;

/// Page dimensions and the fixed vertical advances, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// A new section starts on a fresh page once the cursor passes
    /// `page_height - page_break_margin`.
    pub page_break_margin: f32,
    /// Stricter threshold for the grand total block.
    pub summary_margin: f32,
    pub top_margin: f32,
    /// Where content starts on page one, below the title block.
    pub first_page_top: f32,
    pub side_margin: f32,
    /// Lowest point a table row may reach before the table continues on the
    /// next page.
    pub table_bottom_margin: f32,
    pub header_height: f32,
    pub table_gap: f32,
    pub subtotal_height: f32,
    pub subtotal_gap: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 210.0,
            page_height: 297.0,
            page_break_margin: 47.0,
            summary_margin: 27.0,
            top_margin: 20.0,
            first_page_top: 40.0,
            side_margin: 14.0,
            table_bottom_margin: 14.0,
            header_height: 10.0,
            table_gap: 5.0,
            subtotal_height: 7.0,
            subtotal_gap: 5.0,
        }
    }
}

impl PageGeometry {
    pub fn section_threshold(&self) -> f32 {
        self.page_height - self.page_break_margin
    }

    pub fn summary_threshold(&self) -> f32 {
        self.page_height - self.summary_margin
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.side_margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub title: &'static str,
    /// Share of the content width.
    pub weight: f32,
    pub align: Align,
}

pub const TRANSACTION_COLUMNS: &[Column] = &[
    column("Transaction ID", 0.18, Align::Left),
    column("Date", 0.20, Align::Left),
    column("Payment Details", 0.28, Align::Left),
    column("Card Type", 0.16, Align::Left),
    column("Amount", 0.18, Align::Right),
];

const fn column(title: &'static str, weight: f32, align: Align) -> Column {
    Column {
        title,
        weight,
        align,
    }
}

/// Index of the amount column within [`TRANSACTION_COLUMNS`].
pub const AMOUNT_COLUMN: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Style override for the amount cell.
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub columns: &'static [Column],
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutInstruction {
    ReportHeader {
        title: String,
        subtitle: String,
        date_label: Option<String>,
    },
    SectionHeader(String),
    TableBlock(TableBlock),
    SubtotalLine {
        category: String,
        amount: f64,
        label: String,
    },
    PageBreak,
    GrandTotalBlock {
        amount: f64,
        label: String,
    },
}

/// Height measurement supplied by the rendering backend.
pub trait Measure {
    /// Total height of the table, head row included, if drawn unbroken.
    fn table_height(&self, table: &TableBlock, geometry: &PageGeometry) -> f32;

    /// Cursor position after drawing `table` from `start`. Backends that
    /// continue long tables on a new page override this.
    fn table_end(&self, table: &TableBlock, start: f32, geometry: &PageGeometry) -> f32 {
        start + self.table_height(table, geometry)
    }

    /// Head row plus first body row. A section header is only placed where
    /// this much still fits below it on the same page.
    fn lead_height(&self, _table: &TableBlock, _geometry: &PageGeometry) -> f32 {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTitle {
    pub title: String,
    pub subtitle: String,
}

impl Default for ReportTitle {
    fn default() -> Self {
        Self {
            title: "Rossmoor Walnut Creek Recreation Department".to_string(),
            subtitle: "Daily Sales Report".to_string(),
        }
    }
}

pub fn transaction_table(group: &CategoryGroup, fmt: &dyn Formatter) -> TableBlock {
    let rows = group
        .transactions
        .iter()
        .map(|t| TableRow {
            cells: vec![
                t.id.clone(),
                fmt.transaction_date(&t.date),
                t.payment_details.clone(),
                t.card_type.clone(),
                fmt.currency(t.amount),
            ],
            highlight: Highlight::for_amount(t.amount),
        })
        .collect();
    TableBlock {
        columns: TRANSACTION_COLUMNS,
        rows,
    }
}

/// Lay out the whole report. Pure: the same inputs always give the same
/// instruction sequence.
pub fn plan(
    report: &AggregatedReport,
    title: &ReportTitle,
    geometry: &PageGeometry,
    measure: &dyn Measure,
    fmt: &dyn Formatter,
) -> Vec<LayoutInstruction> {
    let mut out = vec![LayoutInstruction::ReportHeader {
        title: title.title.clone(),
        subtitle: title.subtitle.clone(),
        date_label: date_range_label(&report.date_range, fmt),
    }];
    let mut y = geometry.first_page_top;
    // No section placed on the current page yet.
    let mut page_fresh = true;
    let table_bottom = geometry.page_height - geometry.table_bottom_margin;

    for group in &report.groups {
        let table = transaction_table(group, fmt);

        // Break before the header so it never sits alone at the page bottom,
        // nor above a table whose first row would land on the next page.
        let lead_end = y + geometry.header_height + measure.lead_height(&table, geometry);
        if y > geometry.section_threshold() || (!page_fresh && lead_end > table_bottom) {
            out.push(LayoutInstruction::PageBreak);
            y = geometry.top_margin;
        }
        page_fresh = false;

        out.push(LayoutInstruction::SectionHeader(group.category.clone()));
        y += geometry.header_height;

        y = measure.table_end(&table, y, geometry) + geometry.table_gap;
        out.push(LayoutInstruction::TableBlock(table));

        out.push(LayoutInstruction::SubtotalLine {
            category: group.category.clone(),
            amount: group.total,
            label: format!("{} Total: {}", group.category, fmt.currency(group.total)),
        });
        y += geometry.subtotal_height + geometry.subtotal_gap;
    }

    if y > geometry.summary_threshold() {
        out.push(LayoutInstruction::PageBreak);
    }
    out.push(LayoutInstruction::GrandTotalBlock {
        amount: report.grand_total,
        label: format!("Grand Total: {}", fmt.currency(report.grand_total)),
    });
    out
}
