use std::collections::HashMap;

use chrono::NaiveDateTime;

/// One decoded CSV record, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Raw date text as it appeared in the export.
    pub date: String,
    pub payment_details: String,
    pub card_type: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub transactions: Vec<Transaction>,
    pub total: f64,
}

impl CategoryGroup {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            transactions: Vec::new(),
            total: 0.0,
        }
    }

    pub fn push(&mut self, txn: Transaction) {
        self.total += txn.amount;
        self.transactions.push(txn);
    }
}

/// Earliest and latest parseable date seen anywhere in the export.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn extend(self, seen: NaiveDateTime) -> Self {
        Self {
            start: Some(self.start.map_or(seen, |s| s.min(seen))),
            end: Some(self.end.map_or(seen, |e| e.max(seen))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub rows_without_date: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReport {
    /// Groups in first-seen order.
    pub groups: Vec<CategoryGroup>,
    pub grand_total: f64,
    pub date_range: DateRange,
    pub stats: AggregateStats,
}

impl AggregatedReport {
    #[cfg(test)]
    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn transaction_count(&self) -> usize {
        self.groups.iter().map(|g| g.transactions.len()).sum()
    }
}
