use chrono::{Datelike, Duration, NaiveDate};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Accepted explicit date formats, tried in order.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// A single day or an inclusive range of days.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateFilter {
    Single(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl DateFilter {
    pub fn days(self) -> Vec<NaiveDate> {
        match self {
            DateFilter::Single(d) => vec![d],
            DateFilter::Range(start, end) => get_dates_in_range(start, end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DateKeyword {
    Today,
    Yesterday,
    /// The last seven days, today included.
    Week,
    /// From the first of the current month to today.
    Month,
}

impl DateKeyword {
    pub fn resolve(self, today: NaiveDate) -> DateFilter {
        match self {
            DateKeyword::Today => DateFilter::Single(today),
            DateKeyword::Yesterday => DateFilter::Single(today - Duration::days(1)),
            DateKeyword::Week => DateFilter::Range(today - Duration::days(6), today),
            DateKeyword::Month => DateFilter::Range(today.with_day(1).unwrap_or(today), today),
        }
    }
}

/// Parses `today`, `yesterday`, `week`, `month` or an explicit date.
pub fn parse_date_token(token: &str, today: NaiveDate) -> Option<DateFilter> {
    let token = token.trim();
    if let Ok(keyword) = DateKeyword::from_str(token) {
        return Some(keyword.resolve(today));
    }
    parse_single_date(token).map(DateFilter::Single)
}

fn parse_single_date(token: &str) -> Option<NaiveDate> {
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

/// Resolves `from`..`to` into a range; each side may be a keyword, whose
/// range start (for `from`) or end (for `to`) is used.
pub fn parse_date_range(from: &str, to: &str, today: NaiveDate) -> Option<DateFilter> {
    let start = match parse_date_token(from, today)? {
        DateFilter::Single(d) | DateFilter::Range(d, _) => d,
    };
    let end = match parse_date_token(to, today)? {
        DateFilter::Single(d) | DateFilter::Range(_, d) => d,
    };
    Some(DateFilter::Range(start, end))
}

/// Generates a vector of `NaiveDate`s, inclusive of the start and end dates.
/// If `start` is after `end`, the resulting vector will be empty.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use worklog_core::dates::get_dates_in_range;
/// let start_date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
/// let end_date = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
///
/// let dates = get_dates_in_range(start_date, end_date);
///
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[2], NaiveDate::from_ymd_opt(2025, 8, 17).unwrap());
/// ```
pub fn get_dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}
