// Utility helpers for parsing and cleaning.
//
// This module centralizes all the "dirty" spreadsheet-value handling so
// the rest of the code can assume clean, typed values. Nothing here ever
// fails on malformed input; bad values collapse to `None` and the caller
// decides the default.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Arabic month names in calendar order, as they appear in the permit
/// month labels and in the monthly-comparison output.
pub const MONTH_NAMES: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

static MONTH_BY_NAME: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i as u32 + 1))
        .collect()
});

/// Arabic name for a month number, or the number itself for anything
/// outside 1..=12.
pub fn month_name(month: u32) -> String {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1].to_string(),
        other => other.to_string(),
    }
}

/// Month number for an Arabic month name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_BY_NAME.get(name.trim()).copied()
}

/// Trim an optional string and drop it entirely when empty.
pub fn non_empty(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse a date string against the formats seen across the source
/// exports. Returns `None` for anything unparsable.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // `%Y-%m-%d` is the spreadsheet default; the CSV exports also carry
    // `Jul 7, 2025`-style and slashed dates.
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%b %d, %Y", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Clean a work-hours cell into a non-negative number.
///
/// Spreadsheet exports wrap these values in accounting noise:
/// `"_(* 8:30 AM_)_"` should come out as `8.30`. The steps:
/// - strip the `_(* ` / `_)_` wrappers and any remaining underscores,
/// - normalize `:`, the Arabic decimal `٫`, and `,` to `.`,
/// - drop `AM`/`PM` markers,
/// - keep only the first whitespace-separated token,
/// - clamp negative results to zero.
///
/// Returns `None` when no parseable number remains so the caller can
/// count the defaults it applies.
pub fn clean_hours(s: Option<&str>) -> Option<f64> {
    let mut v = s?.trim().to_string();
    v = v.replace("_(* ", "").replace("_)_", "").replace('_', "");
    v = v.replace(':', ".").replace('٫', ".").replace(',', ".");
    v = v.replace("AM", "").replace("PM", "");
    let v = v.trim();
    let token = v.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        return None;
    }
    token.parse::<f64>().ok().map(|n| n.max(0.0))
}

/// Strip the year suffix from a permit month label: `يوليو-2025` and
/// `يوليو - 2025` both become `يوليو`.
pub fn clean_month_label(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let label = match s.split_once('-') {
        Some((head, _)) => head.trim(),
        None => s,
    };
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus locale-aware thousands separators
    // (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_hours_strips_accounting_noise() {
        assert_eq!(clean_hours(Some("_(* 8:30 AM_)_")), Some(8.30));
    }

    #[test]
    fn clean_hours_normalizes_separators() {
        assert_eq!(clean_hours(Some("7:45")), Some(7.45));
        assert_eq!(clean_hours(Some("7٫5")), Some(7.5));
        assert_eq!(clean_hours(Some("7,25")), Some(7.25));
    }

    #[test]
    fn clean_hours_keeps_first_token_only() {
        assert_eq!(clean_hours(Some("8.5 extra junk")), Some(8.5));
    }

    #[test]
    fn clean_hours_clamps_negatives_to_zero() {
        assert_eq!(clean_hours(Some("-3.5")), Some(0.0));
    }

    #[test]
    fn clean_hours_rejects_garbage() {
        assert_eq!(clean_hours(Some("N/A")), None);
        assert_eq!(clean_hours(Some("")), None);
        assert_eq!(clean_hours(None), None);
    }

    #[test]
    fn parse_date_safe_accepts_known_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 7);
        assert_eq!(parse_date_safe(Some("2025-07-07")), expected);
        assert_eq!(parse_date_safe(Some("Jul 7, 2025")), expected);
        assert_eq!(parse_date_safe(Some("07/07/2025")), expected);
    }

    #[test]
    fn parse_date_safe_rejects_garbage() {
        assert_eq!(parse_date_safe(Some("not a date")), None);
        assert_eq!(parse_date_safe(Some("")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn clean_month_label_strips_year_suffix() {
        assert_eq!(
            clean_month_label(Some("يوليو-2025")),
            Some("يوليو".to_string())
        );
        assert_eq!(
            clean_month_label(Some("أغسطس - 2025")),
            Some("أغسطس".to_string())
        );
        assert_eq!(clean_month_label(Some("سبتمبر")), Some("سبتمبر".to_string()));
        assert_eq!(clean_month_label(Some("  ")), None);
    }

    #[test]
    fn month_names_round_trip() {
        for m in 1..=12 {
            assert_eq!(month_number(&month_name(m)), Some(m));
        }
        assert_eq!(month_number("January"), None);
        assert_eq!(month_name(13), "13");
    }

    #[test]
    fn average_of_empty_slice_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1234.5, 1), "-1,234.5");
        assert_eq!(format_number(0.0, 0), "0");
    }
}
