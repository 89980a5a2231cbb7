use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::Result;
use crate::models::RawRow;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lenient amount parsing: `$1,234.50`, `(12.00)`, `-5`. `None` if not a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        -inner.trim().parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

/// Parse the date forms POS exports use: ISO dates and datetimes, and US
/// `M/D/YYYY` (or `M/D/YY`) with an optional 12- or 24-hour time.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    let split_at = raw
        .find(|c: char| c == 'T' || c == ' ' || c == ',')
        .unwrap_or(raw.len());
    let (date_part, rest) = raw.split_at(split_at);
    let date = parse_day(date_part)?;

    let time_part = rest
        .trim_start_matches(|c: char| c == 'T' || c == ',' || c.is_whitespace())
        .trim_end_matches('Z')
        .trim();
    if time_part.is_empty() {
        return date.and_hms_opt(0, 0, 0);
    }
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(time_part, f).ok())
        .map(|t| date.and_time(t))
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let mut y: i32 = parts[2].parse().ok()?;
    if parts[2].len() <= 2 {
        y += if y < 50 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a headered CSV stream into rows keyed by header name.
///
/// Blank records are dropped. Short records simply lack the trailing columns.
pub fn decode_reader<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }
    debug!(columns = headers.len(), rows = rows.len(), "decoded CSV");
    Ok(rows)
}

pub fn decode_file(file_path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(file_path)?;
    decode_reader(std::io::BufReader::new(file))
}
