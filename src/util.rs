// Parsing and formatting helpers.
//
// All of the "dirty" text handling lives here so the cleaner and the
// aggregators can work with typed values only.
use chrono::NaiveDate;
use clap::ValueEnum;
use num_format::{Locale, ToFormattedString};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Which component comes first in an ambiguous numeric date like `3/4/2023`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

// Accepted when the value is not an all-numeric date.
const TEXT_DATE_FORMATS: [&str; 9] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%A, %B %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%Y %B %d",
];

/// Parse a currency-formatted amount such as ` $1,234.50 `.
///
/// - Trims whitespace and removes every `$` and `,`.
/// - A leading `-` or accounting parentheses `($5.00)` make it negative.
/// - Returns `None` for anything that is not a plain decimal afterwards
///   (letters, empty text, stray symbols).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (negate, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let cleaned: String = body.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }
    let value = Decimal::from_str(cleaned).ok()?;
    if negate {
        if value.is_sign_negative() {
            return None;
        }
        return Some(-value);
    }
    Some(value)
}

/// Parse a thousands-separated unit count such as ` 2,000 `.
pub fn parse_units(s: &str) -> Option<i64> {
    let cleaned = s.trim().replace(',', "");
    let digits = cleaned.strip_prefix('-').unwrap_or(&cleaned);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// Parse free-form invoice date text into a calendar date.
///
/// Rule, applied the same way to every row:
/// 1. any trailing time of day is dropped;
/// 2. numeric dates whose first part has four digits are year-month-day;
/// 3. other numeric dates are read in `order` first, and in the opposite
///    order only when `order` gives no valid calendar date;
/// 4. two-digit years pivot at 70 (`23` is 2023, `85` is 1985);
/// 5. otherwise a fixed list of month-name formats is tried.
pub fn parse_date(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = strip_time(s.trim());
    if s.is_empty() {
        return None;
    }
    if let Some(date) = parse_numeric_date(s, order) {
        return Some(date);
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn strip_time(s: &str) -> &str {
    if let Some((date, time)) = s.split_once('T') {
        if !date.is_empty()
            && date.bytes().all(|b| b.is_ascii_digit() || b == b'-')
            && time.contains(':')
        {
            return date;
        }
    }
    match s.find(':') {
        Some(colon) => match s[..colon].rfind(char::is_whitespace) {
            Some(ws) => s[..ws].trim_end(),
            None => s,
        },
        None => s,
    }
}

fn parse_numeric_date(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(['-', '/', '.']).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    if parts[0].len() == 4 {
        let year = parts[0].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, parts[1].parse().ok()?, parts[2].parse().ok()?);
    }
    let year = match parts[2].len() {
        4 => parts[2].parse::<i32>().ok()?,
        2 => pivot_year(parts[2].parse().ok()?),
        _ => return None,
    };
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    // (month, day) candidates, preferred first.
    let (preferred, fallback) = match order {
        DateOrder::MonthFirst => ((a, b), (b, a)),
        DateOrder::DayFirst => ((b, a), (a, b)),
    };
    NaiveDate::from_ymd_opt(year, preferred.0, preferred.1)
        .or_else(|| NaiveDate::from_ymd_opt(year, fallback.0, fallback.1))
}

fn pivot_year(yy: i32) -> i32 {
    if yy < 70 {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// "FullMonthName-FourDigitYear", e.g. `March-2023`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B-%Y").to_string()
}

/// Render an amount with two decimals and thousands separators
/// (e.g. `-1,234,567.89`) for console messages.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2).abs();
    let s = format!("{:.2}", rounded);
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let grouped = match int_part.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    let sign = if value.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `9,855 rows loaded`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amount_strips_dollar_commas_and_whitespace() {
        assert_eq!(parse_amount(" $1,234.50 "), Some(Decimal::new(123450, 2)));
        assert_eq!(parse_amount("$100.00"), Some(Decimal::new(10000, 2)));
        assert_eq!(parse_amount("7"), Some(Decimal::from(7)));
    }

    #[test]
    fn amount_keeps_negative_values() {
        assert_eq!(parse_amount("-$5.25"), Some(Decimal::new(-525, 2)));
        assert_eq!(parse_amount("($5.25)"), Some(Decimal::new(-525, 2)));
    }

    #[test]
    fn amount_rejects_text() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("  $ "), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn units_parse_thousands() {
        assert_eq!(parse_units(" 2,000 "), Some(2000));
        assert_eq!(parse_units("10"), Some(10));
        assert_eq!(parse_units("-3"), Some(-3));
        assert_eq!(parse_units("1.5"), None);
        assert_eq!(parse_units("ten"), None);
        assert_eq!(parse_units(""), None);
    }

    #[test]
    fn iso_dates_ignore_order() {
        assert_eq!(parse_date("2023-03-05", DateOrder::DayFirst), Some(ymd(2023, 3, 5)));
        assert_eq!(parse_date("2023/03/05", DateOrder::MonthFirst), Some(ymd(2023, 3, 5)));
        assert_eq!(parse_date("2023-03-05T14:30:00", DateOrder::MonthFirst), Some(ymd(2023, 3, 5)));
    }

    #[test]
    fn ambiguous_dates_follow_configured_order() {
        assert_eq!(parse_date("1/5/2023", DateOrder::MonthFirst), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("1/5/2023", DateOrder::DayFirst), Some(ymd(2023, 5, 1)));
    }

    #[test]
    fn impossible_preferred_order_falls_back() {
        assert_eq!(parse_date("13/05/2023", DateOrder::MonthFirst), Some(ymd(2023, 5, 13)));
        assert_eq!(parse_date("05/13/2023", DateOrder::DayFirst), Some(ymd(2023, 5, 13)));
    }

    #[test]
    fn time_of_day_and_short_years() {
        assert_eq!(parse_date("1/5/2023 0:00", DateOrder::MonthFirst), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("1/5/23", DateOrder::MonthFirst), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("1/5/85", DateOrder::MonthFirst), Some(ymd(1985, 1, 5)));
    }

    #[test]
    fn month_name_dates() {
        assert_eq!(parse_date("March 5, 2023", DateOrder::MonthFirst), Some(ymd(2023, 3, 5)));
        assert_eq!(parse_date("5 Mar 2023", DateOrder::MonthFirst), Some(ymd(2023, 3, 5)));
        assert_eq!(parse_date("05-Mar-2023", DateOrder::MonthFirst), Some(ymd(2023, 3, 5)));
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert_eq!(parse_date("", DateOrder::MonthFirst), None);
        assert_eq!(parse_date("yesterday", DateOrder::MonthFirst), None);
        assert_eq!(parse_date("31/31/2023", DateOrder::MonthFirst), None);
        assert_eq!(parse_date("2023-02-30", DateOrder::MonthFirst), None);
    }

    #[test]
    fn same_month_same_label() {
        assert_eq!(month_label(ymd(2023, 3, 5)), "March-2023");
        assert_eq!(month_label(ymd(2023, 3, 28)), "March-2023");
        assert_ne!(month_label(ymd(2023, 3, 5)), month_label(ymd(2024, 3, 5)));
    }

    #[test]
    fn amounts_are_grouped_for_display() {
        assert_eq!(format_amount(Decimal::new(123456789, 2)), "1,234,567.89");
        assert_eq!(format_amount(Decimal::new(-5, 0)), "-5.00");
        assert_eq!(format_int(9855), "9,855");
    }
}
