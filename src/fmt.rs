use chrono::NaiveDateTime;

use crate::decode::parse_date;
use crate::models::DateRange;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Display strings for everything locale-dependent in a report.
pub trait Formatter {
    fn currency(&self, amount: f64) -> String;
    /// Date cell for a transaction row. Unparseable input is shown as-is.
    fn transaction_date(&self, raw: &str) -> String;
    fn report_date(&self, date: NaiveDateTime) -> String;
}

/// en-US formatting: `$1,234.56`, `01/05/24, 02:30 PM`, `1/5/2024`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsFormatter;

impl Formatter for UsFormatter {
    fn currency(&self, amount: f64) -> String {
        money(amount)
    }

    fn transaction_date(&self, raw: &str) -> String {
        match parse_date(raw) {
            Some(dt) => dt.format("%m/%d/%y, %I:%M %p").to_string(),
            None => raw.to_string(),
        }
    }

    fn report_date(&self, date: NaiveDateTime) -> String {
        date.format("%-m/%-d/%Y").to_string()
    }
}

/// `1/5/2024` for a single day, `1/5/2024 - 1/9/2024` for a span.
pub fn date_range_label(range: &DateRange, fmt: &dyn Formatter) -> Option<String> {
    let (start, end) = (range.start?, range.end?);
    let start = fmt.report_date(start);
    let end = fmt.report_date(end);
    if start == end {
        Some(start)
    } else {
        Some(format!("{start} - {end}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
        assert_eq!(money(-5.0), "-$5.00");
    }

    #[test]
    fn test_transaction_date_formatting() {
        let f = UsFormatter;
        assert_eq!(f.transaction_date("2024-01-05 14:30"), "01/05/24, 02:30 PM");
        assert_eq!(f.transaction_date("2024-01-05"), "01/05/24, 12:00 AM");
        assert_eq!(f.transaction_date("not a date"), "not a date");
    }

    #[test]
    fn test_date_range_label_single_day() {
        let range = DateRange::default()
            .extend(day(2024, 1, 5, 9))
            .extend(day(2024, 1, 5, 17));
        assert_eq!(date_range_label(&range, &UsFormatter).as_deref(), Some("1/5/2024"));
    }

    #[test]
    fn test_date_range_label_span() {
        let range = DateRange::default()
            .extend(day(2024, 1, 5, 9))
            .extend(day(2024, 2, 11, 0));
        assert_eq!(
            date_range_label(&range, &UsFormatter).as_deref(),
            Some("1/5/2024 - 2/11/2024")
        );
    }

    #[test]
    fn test_date_range_label_absent() {
        assert_eq!(date_range_label(&DateRange::default(), &UsFormatter), None);
    }
}
