use tracing::debug;

use crate::aggregator::aggregate;
use crate::fmt::{Formatter, UsFormatter};
use crate::layout::{plan, LayoutInstruction, Measure, PageGeometry, ReportTitle};
use crate::models::{AggregatedReport, DateRange, RawRow};

pub const DEFAULT_FILENAME_PREFIX: &str = "RWC-Sales-Report";

pub struct BuiltReport {
    pub report: AggregatedReport,
    pub instructions: Vec<LayoutInstruction>,
}

/// Single entry point from decoded rows to a laid-out report.
pub struct ReportBuilder {
    title: ReportTitle,
    geometry: PageGeometry,
    measure: Box<dyn Measure>,
    formatter: Box<dyn Formatter>,
}

impl ReportBuilder {
    pub fn new(measure: Box<dyn Measure>) -> Self {
        Self {
            title: ReportTitle::default(),
            geometry: PageGeometry::default(),
            measure,
            formatter: Box::new(UsFormatter),
        }
    }

    pub fn with_title(mut self, title: ReportTitle) -> Self {
        self.title = title;
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    #[cfg(test)]
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn build(&self, rows: &[RawRow]) -> BuiltReport {
        let report = aggregate(rows);
        let instructions = plan(
            &report,
            &self.title,
            &self.geometry,
            self.measure.as_ref(),
            self.formatter.as_ref(),
        );
        debug!(instructions = instructions.len(), "planned report layout");
        BuiltReport {
            report,
            instructions,
        }
    }
}

/// `<prefix>-YYYY-MM-DD.pdf` from the first date in the export, or
/// `<prefix>-report.pdf` when there is none.
pub fn report_file_name(range: &DateRange, prefix: &str) -> String {
    match range.start {
        Some(start) => format!("{prefix}-{}.pdf", start.format("%Y-%m-%d")),
        None => format!("{prefix}-report.pdf"),
    }
}
