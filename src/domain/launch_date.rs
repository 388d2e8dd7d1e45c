//! Launch date normalization.
//!
//! The source dataset stores launch dates as free text in a handful of shapes.
//! Two-digit years are read as 20YY and any year past [`CENTURY_CUTOFF_YEAR`]
//! is moved back exactly one century, once.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Latest year a launch in the dataset can carry.
pub const CENTURY_CUTOFF_YEAR: i32 = 2023;

const MIN_FULL_YEAR: i32 = 1000;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

static SLASH_SHORT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2})$").unwrap());

static NAMED_MONTH_SHORT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-\s]([A-Za-z]{3,9})\.?[-\s](\d{2})$").unwrap());

static MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]{3,9})\.?\s+(\d{4})$").unwrap());

static YEAR_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());

/// Parse and century-correct a launch date. `None` means the value is missing.
pub fn normalize_launch_date(raw: &str) -> Option<NaiveDate> {
    parse_launch_date(raw).and_then(apply_century_correction)
}

/// Move a date past the cutoff back by 100 years.
///
/// Returns `None` when the shifted day does not exist (Feb 29 landing on a
/// non-leap year).
pub fn apply_century_correction(date: NaiveDate) -> Option<NaiveDate> {
    if date.year() > CENTURY_CUTOFF_YEAR {
        date.with_year(date.year() - 100)
    } else {
        Some(date)
    }
}

/// Parse a free-text date without any century correction.
pub fn parse_launch_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    // Short and partial shapes go first: chrono's `%Y` also accepts "69".
    if let Some(date) = parse_short_year(value).or_else(|| parse_partial(value)) {
        return Some(date);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
        // Zoned timestamps keep their local calendar date.
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .filter(|date| date.year() >= MIN_FULL_YEAR)
}

fn parse_short_year(value: &str) -> Option<NaiveDate> {
    if let Some(caps) = SLASH_SHORT_YEAR.captures(value) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(2000 + year, month, day);
    }

    if let Some(caps) = NAMED_MONTH_SHORT_YEAR.captures(value) {
        let year: i32 = caps[3].parse().ok()?;
        let rebuilt = format!("{} {} {}", &caps[1], &caps[2], 2000 + year);
        return NaiveDate::parse_from_str(&rebuilt, "%d %B %Y")
            .or_else(|_| NaiveDate::parse_from_str(&rebuilt, "%d %b %Y"))
            .ok();
    }

    None
}

// "July 1969" and "1969" resolve to the first day of the period.
fn parse_partial(value: &str) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_YEAR.captures(value) {
        let rebuilt = format!("1 {} {}", &caps[1], &caps[2]);
        return NaiveDate::parse_from_str(&rebuilt, "%d %B %Y")
            .or_else(|_| NaiveDate::parse_from_str(&rebuilt, "%d %b %Y"))
            .ok();
    }

    if let Some(caps) = YEAR_ONLY.captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parses_common_shapes() {
        assert_eq!(normalize_launch_date("1969-07-16"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("July 16, 1969"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("16 July 1969"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("Jul 16, 1969"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("7/16/1969"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("16.07.1969"), Some(ymd(1969, 7, 16)));
        assert_eq!(
            normalize_launch_date("1969-07-16 13:32:00"),
            Some(ymd(1969, 7, 16))
        );
    }

    #[test]
    fn test_parses_zoned_and_fractional_timestamps() {
        assert_eq!(
            normalize_launch_date("1969-07-16T13:32:00Z"),
            Some(ymd(1969, 7, 16))
        );
        assert_eq!(
            normalize_launch_date("1969-07-16T13:32:00.250+03:00"),
            Some(ymd(1969, 7, 16))
        );
        assert_eq!(
            normalize_launch_date("1969-07-16 13:32:00.5"),
            Some(ymd(1969, 7, 16))
        );
        assert_eq!(
            normalize_launch_date("2069-07-16T13:32:00Z"),
            Some(ymd(1969, 7, 16))
        );
    }

    #[test]
    fn test_partial_dates_use_first_day() {
        assert_eq!(normalize_launch_date("July 1969"), Some(ymd(1969, 7, 1)));
        assert_eq!(normalize_launch_date("1959"), Some(ymd(1959, 1, 1)));
    }

    #[test]
    fn test_two_digit_years_are_pulled_back_a_century() {
        assert_eq!(normalize_launch_date("7/16/69"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("16-Jul-69"), Some(ymd(1969, 7, 16)));
        assert_eq!(normalize_launch_date("2 Jan 59"), Some(ymd(1959, 1, 2)));
    }

    #[test]
    fn test_short_years_up_to_cutoff_stay_in_this_century() {
        assert_eq!(normalize_launch_date("10/4/23"), Some(ymd(2023, 10, 4)));
        assert_eq!(normalize_launch_date("1/1/24"), Some(ymd(1924, 1, 1)));
    }

    #[test]
    fn test_correction_only_changes_the_year() {
        for raw in ["2069-07-16", "2058-12-31", "2096-02-29", "2024-01-01"] {
            let parsed = parse_launch_date(raw).unwrap();
            let normalized = normalize_launch_date(raw).unwrap();
            assert_eq!(normalized.year(), parsed.year() - 100);
            assert_eq!(normalized.month(), parsed.month());
            assert_eq!(normalized.day(), parsed.day());
        }
    }

    #[test]
    fn test_correction_is_applied_once() {
        // 2124 - 100 is still past the cutoff and is kept as-is.
        assert_eq!(normalize_launch_date("2124-03-01"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_dates_up_to_cutoff_are_untouched() {
        assert_eq!(normalize_launch_date("2023-12-31"), Some(ymd(2023, 12, 31)));
        assert_eq!(normalize_launch_date("1958-08-17"), Some(ymd(1958, 8, 17)));
    }

    #[test]
    fn test_shift_onto_missing_leap_day_is_missing() {
        assert_eq!(normalize_launch_date("2400-02-29"), None);
    }

    #[test]
    fn test_unparsable_values_are_missing() {
        assert_eq!(normalize_launch_date(""), None);
        assert_eq!(normalize_launch_date("   "), None);
        assert_eq!(normalize_launch_date("not recorded"), None);
        assert_eq!(normalize_launch_date("13/45/1969"), None);
    }
}
