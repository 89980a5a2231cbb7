use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::models::{AggregateStats, AggregatedReport, CategoryGroup, DateRange, RawRow};
use crate::normalizer::{normalize, Entry};

/// Running state of the fold over rows.
#[derive(Debug, Default)]
struct Accumulator {
    groups: Vec<CategoryGroup>,
    index: HashMap<String, usize>,
    date_range: DateRange,
    stats: AggregateStats,
}

impl Accumulator {
    fn group_mut(&mut self, category: &str) -> &mut CategoryGroup {
        let idx = match self.index.get(category) {
            Some(&idx) => idx,
            None => {
                self.groups.push(CategoryGroup::new(category));
                let idx = self.groups.len() - 1;
                self.index.insert(category.to_string(), idx);
                idx
            }
        };
        &mut self.groups[idx]
    }

    fn fold(mut self, row: &RawRow) -> Self {
        self.stats.rows_read += 1;
        let normalized = normalize(row);
        if let Some(seen) = normalized.parsed_date {
            self.date_range = self.date_range.extend(seen);
        }
        match normalized.entry {
            Entry::Skip => {
                self.stats.rows_skipped += 1;
            }
            Entry::Category(category) => {
                self.stats.rows_without_date += 1;
                self.group_mut(&category);
            }
            Entry::Transaction(category, txn) => {
                self.group_mut(&category).push(txn);
            }
        }
        self
    }

    fn finish(self) -> AggregatedReport {
        let grand_total = self.groups.iter().map(|g| g.total).sum();
        AggregatedReport {
            groups: self.groups,
            grand_total,
            date_range: self.date_range,
            stats: self.stats,
        }
    }
}

/// Group rows by category in first-seen order, totalling each group.
pub fn aggregate<'a, I>(rows: I) -> AggregatedReport
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let report = rows
        .into_iter()
        .fold(Accumulator::default(), Accumulator::fold)
        .finish();

    debug!(
        rows = report.stats.rows_read,
        skipped = report.stats.rows_skipped,
        undated = report.stats.rows_without_date,
        "aggregated rows"
    );
    info!(
        categories = report.groups.len(),
        transactions = report.transaction_count(),
        grand_total = report.grand_total,
        "aggregation complete"
    );
    if report.date_range.is_empty() && report.transaction_count() > 0 {
        warn!("no parseable dates in export; report will have no date label");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(fields: &[(&str, &str)]) -> RawRow {
        fields.iter().copied().collect()
    }

    fn sale(category: &str, date: &str, amount: &str) -> RawRow {
        row(&[("Genres", category), ("Date", date), ("Payment Type", amount)])
    }

    #[test]
    fn test_groups_and_totals() {
        let rows = vec![
            sale("Music", "2024-01-01", "25"),
            sale("Music", "2024-01-02", "-5"),
            sale("", "2024-01-01", "10"),
        ];
        let report = aggregate(&rows);
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.group("Music").unwrap().total, 20.0);
        assert_eq!(report.group("Uncategorized").unwrap().total, 10.0);
        assert_eq!(report.grand_total, 30.0);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let rows = vec![
            sale("Theater", "2024-01-01", "1"),
            sale("Music", "2024-01-01", "2"),
            sale("Theater", "2024-01-02", "3"),
            sale("Art", "2024-01-03", "4"),
        ];
        let report = aggregate(&rows);
        let names: Vec<&str> = report.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Theater", "Music", "Art"]);
        let amounts: Vec<f64> = report.groups[0].transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1.0, 3.0]);
    }

    #[test]
    fn test_grand_total_row_excluded_but_extends_range() {
        let rows = vec![
            sale("Music", "2024-01-05", "25"),
            sale("Grand Total Row", "2023-12-31", "999"),
        ];
        let report = aggregate(&rows);
        assert!(report.group("Grand Total Row").is_none());
        assert_eq!(report.grand_total, 25.0);
        assert_eq!(
            report.date_range.start.unwrap().date().to_string(),
            "2023-12-31"
        );
        assert_eq!(report.stats.rows_skipped, 1);
    }

    #[test]
    fn test_undated_rows_register_category_without_amount() {
        let rows = vec![sale("Music", "", "25"), sale("Music", "  ", "30")];
        let report = aggregate(&rows);
        let music = report.group("Music").unwrap();
        assert!(music.transactions.is_empty());
        assert_eq!(music.total, 0.0);
        assert_eq!(report.grand_total, 0.0);
        assert_eq!(report.stats.rows_without_date, 2);
    }

    #[test]
    fn test_bad_amount_counts_as_zero() {
        let rows = vec![sale("Music", "2024-01-01", "free")];
        let report = aggregate(&rows);
        let music = report.group("Music").unwrap();
        assert_eq!(music.transactions.len(), 1);
        assert_eq!(music.total, 0.0);
    }

    #[test]
    fn test_bad_date_excluded_from_range_only() {
        let rows = vec![sale("Music", "someday", "12")];
        let report = aggregate(&rows);
        assert!(report.date_range.is_empty());
        assert_eq!(report.group("Music").unwrap().total, 12.0);
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&Vec::<RawRow>::new());
        assert!(report.is_empty());
        assert_eq!(report.grand_total, 0.0);
        assert!(report.date_range.is_empty());
    }

    #[test]
    fn test_all_rows_skipped() {
        let rows = vec![sale("Total", "", "5"), sale("Music Total", "", "5")];
        let report = aggregate(&rows);
        assert!(report.is_empty());
        assert_eq!(report.grand_total, 0.0);
        assert!(report.date_range.is_empty());
    }

    fn arb_row() -> impl Strategy<Value = RawRow> {
        let category = prop_oneof![
            Just(""),
            Just("Music"),
            Just("Dance"),
            Just("Music Total"),
            Just("Grand Total"),
        ];
        let date = prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            Just("garbage".to_string()),
            (1u32..=12, 1u32..=28).prop_map(|(m, d)| format!("2024-{m:02}-{d:02}")),
        ];
        let amount = prop_oneof![
            Just("x".to_string()),
            (-10_000i64..10_000).prop_map(|c| format!("{:.2}", c as f64 / 100.0)),
        ];
        (category, date, amount).prop_map(|(c, d, a)| sale(c, &d, &a))
    }

    proptest! {
        #[test]
        fn prop_grand_total_is_sum_of_groups(rows in proptest::collection::vec(arb_row(), 0..40)) {
            let report = aggregate(&rows);
            let sum: f64 = report.groups.iter().map(|g| g.total).sum();
            prop_assert_eq!(report.grand_total, sum);
        }

        #[test]
        fn prop_summary_rows_never_grouped(rows in proptest::collection::vec(arb_row(), 0..40)) {
            let report = aggregate(&rows);
            for g in &report.groups {
                prop_assert!(!g.category.contains("Total"));
            }
        }

        #[test]
        fn prop_blank_dates_never_contribute(rows in proptest::collection::vec(arb_row(), 0..40)) {
            let report = aggregate(&rows);
            for g in &report.groups {
                for t in &g.transactions {
                    prop_assert!(!t.date.trim().is_empty());
                }
            }
        }

        #[test]
        fn prop_date_range_ordered(rows in proptest::collection::vec(arb_row(), 0..40)) {
            let report = aggregate(&rows);
            let any_parsed = rows
                .iter()
                .any(|r| r.get("Date").and_then(crate::decode::parse_date).is_some());
            match (report.date_range.start, report.date_range.end) {
                (Some(s), Some(e)) => prop_assert!(s <= e && any_parsed),
                (None, None) => prop_assert!(!any_parsed),
                _ => prop_assert!(false, "half-open date range"),
            }
        }

        #[test]
        fn prop_aggregation_is_idempotent(rows in proptest::collection::vec(arb_row(), 0..40)) {
            prop_assert_eq!(aggregate(&rows), aggregate(&rows));
        }
    }
}
