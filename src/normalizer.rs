use chrono::NaiveDateTime;

use crate::decode::{parse_amount, parse_date};
use crate::models::{RawRow, Transaction};

// Column aliases, most specific first. Thundertix pivot exports shift the
// category into the "Sum of Total Paid/Refunded" column and the amount into
// "Payment Type"; plainer exports use "Genres" and "card".
pub const CATEGORY_COLUMNS: &[&str] = &["Sum of Total Paid/Refunded", "Genres"];
pub const DATE_COLUMNS: &[&str] = &["Date"];
pub const ID_COLUMNS: &[&str] = &["Classes"];
pub const PAYMENT_DETAILS_COLUMNS: &[&str] = &["Payment Details"];
pub const CARD_TYPE_COLUMNS: &[&str] = &["Card Type"];
pub const AMOUNT_COLUMNS: &[&str] = &["Payment Type", "card"];

pub const UNCATEGORIZED: &str = "Uncategorized";

/// First candidate column that is present and not blank.
pub fn resolve_field<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| row.get(c))
        .find(|v| !v.trim().is_empty())
}

/// First category candidate with any text at all. Unlike the other fields,
/// a whitespace-only category is kept and forms its own group.
pub fn resolve_category(row: &RawRow) -> &str {
    CATEGORY_COLUMNS
        .iter()
        .filter_map(|c| row.get(c))
        .find(|v| !v.is_empty())
        .unwrap_or(UNCATEGORIZED)
}

/// Summary rows embedded in the export carry "Total" in the category column.
pub fn is_summary_category(category: &str) -> bool {
    category.is_empty() || category.contains("Total") || category.contains("Grand Total")
}

/// First amount candidate that parses as a number, else 0.
pub fn resolve_amount(row: &RawRow) -> f64 {
    AMOUNT_COLUMNS
        .iter()
        .filter_map(|c| row.get(c))
        .find_map(parse_amount)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Summary or empty category; never grouped.
    Skip,
    /// Valid category but no usable date, so nothing to total.
    Category(String),
    Transaction(String, Transaction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Parsed date, reported even for skipped rows so the date range covers
    /// the whole export.
    pub parsed_date: Option<NaiveDateTime>,
    pub entry: Entry,
}

pub fn normalize(row: &RawRow) -> Normalized {
    let date = resolve_field(row, DATE_COLUMNS);
    let parsed_date = date.and_then(parse_date);

    let category = resolve_category(row);
    if is_summary_category(category) {
        return Normalized {
            parsed_date,
            entry: Entry::Skip,
        };
    }

    let entry = match date {
        Some(date) => {
            let text = |cols: &[&str]| resolve_field(row, cols).unwrap_or("").to_string();
            Entry::Transaction(
                category.to_string(),
                Transaction {
                    id: text(ID_COLUMNS),
                    date: date.to_string(),
                    payment_details: text(PAYMENT_DETAILS_COLUMNS),
                    card_type: text(CARD_TYPE_COLUMNS),
                    amount: resolve_amount(row),
                },
            )
        }
        None => Entry::Category(category.to_string()),
    };
    Normalized { parsed_date, entry }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, &str)]) -> RawRow {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_resolve_field_prefers_first_non_blank() {
        let r = row(&[("Sum of Total Paid/Refunded", "  "), ("Genres", "Music")]);
        assert_eq!(resolve_field(&r, CATEGORY_COLUMNS), Some("Music"));
        let r = row(&[("Sum of Total Paid/Refunded", "Dance"), ("Genres", "Music")]);
        assert_eq!(resolve_field(&r, CATEGORY_COLUMNS), Some("Dance"));
        assert_eq!(resolve_field(&row(&[]), CATEGORY_COLUMNS), None);
    }

    #[test]
    fn test_category_falls_back_to_uncategorized() {
        assert_eq!(resolve_category(&row(&[("Genres", "")])), UNCATEGORIZED);
        assert_eq!(resolve_category(&row(&[])), UNCATEGORIZED);
    }

    #[test]
    fn test_whitespace_category_is_its_own_group() {
        let r = row(&[("Sum of Total Paid/Refunded", " "), ("Genres", "Music")]);
        assert_eq!(resolve_category(&r), " ");
        let n = normalize(&row(&[("Genres", " "), ("Date", "2024-01-01"), ("Payment Type", "5")]));
        assert!(matches!(n.entry, Entry::Transaction(ref c, _) if c == " "));
    }

    #[test]
    fn test_summary_categories() {
        assert!(is_summary_category(""));
        assert!(is_summary_category("Music Total"));
        assert!(is_summary_category("Grand Total"));
        assert!(is_summary_category("Grand Total Row"));
        assert!(!is_summary_category("total refunds"));
        assert!(!is_summary_category("Music"));
    }

    #[test]
    fn test_amount_fallback_order() {
        assert_eq!(resolve_amount(&row(&[("Payment Type", "25"), ("card", "9")])), 25.0);
        assert_eq!(resolve_amount(&row(&[("Payment Type", "Visa"), ("card", "9")])), 9.0);
        assert_eq!(resolve_amount(&row(&[("card", "-5")])), -5.0);
        assert_eq!(resolve_amount(&row(&[("Payment Type", "n/a")])), 0.0);
        assert_eq!(resolve_amount(&row(&[])), 0.0);
    }

    #[test]
    fn test_normalize_transaction() {
        let n = normalize(&row(&[
            ("Genres", "Music"),
            ("Date", "2024-01-01"),
            ("Classes", "T-100"),
            ("Payment Details", "Box office"),
            ("Card Type", "Visa"),
            ("Payment Type", "25"),
        ]));
        assert!(n.parsed_date.is_some());
        let Entry::Transaction(category, txn) = n.entry else {
            panic!("expected a transaction");
        };
        assert_eq!(category, "Music");
        assert_eq!(txn.id, "T-100");
        assert_eq!(txn.date, "2024-01-01");
        assert_eq!(txn.payment_details, "Box office");
        assert_eq!(txn.card_type, "Visa");
        assert_eq!(txn.amount, 25.0);
    }

    #[test]
    fn test_normalize_blank_date_keeps_category_only() {
        let n = normalize(&row(&[("Genres", "Music"), ("Date", "   "), ("Payment Type", "25")]));
        assert_eq!(n.parsed_date, None);
        assert_eq!(n.entry, Entry::Category("Music".into()));
    }

    #[test]
    fn test_normalize_summary_row_still_reports_date() {
        let n = normalize(&row(&[("Genres", "Grand Total Row"), ("Date", "2023-12-31")]));
        assert_eq!(n.entry, Entry::Skip);
        assert!(n.parsed_date.is_some());
    }

    #[test]
    fn test_normalize_unparseable_date_still_emits_transaction() {
        let n = normalize(&row(&[("Genres", "Music"), ("Date", "TBD"), ("Payment Type", "x")]));
        assert_eq!(n.parsed_date, None);
        let Entry::Transaction(_, txn) = n.entry else {
            panic!("expected a transaction");
        };
        assert_eq!(txn.date, "TBD");
        assert_eq!(txn.amount, 0.0);
    }
}
