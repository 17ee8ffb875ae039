//! Expansion of the task-file template.
//!
//! Supported tokens:
//! - `{{title}}`           the task name
//! - `{{date}}`            today, in the daily-note date format
//! - `{{date+3d}}`         today plus N days (`w` weeks, `m` months, `y` years)

use chrono::{Days, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString};

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{date(?:\+(\d+)([dwmy]))?\}\}").expect("valid date token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum DateUnit {
    #[strum(serialize = "d")]
    Day,
    #[strum(serialize = "w")]
    Week,
    #[strum(serialize = "m")]
    Month,
    #[strum(serialize = "y")]
    Year,
}

impl DateUnit {
    /// `None` when the result leaves chrono's calendar range.
    pub fn add_to(self, date: NaiveDate, amount: u32) -> Option<NaiveDate> {
        match self {
            DateUnit::Day => date.checked_add_days(Days::new(u64::from(amount))),
            DateUnit::Week => date.checked_add_days(Days::new(u64::from(amount) * 7)),
            DateUnit::Month => date.checked_add_months(Months::new(amount)),
            DateUnit::Year => date.checked_add_months(Months::new(amount.checked_mul(12)?)),
        }
    }
}

/// Expands template tokens. Tokens that cannot be resolved are left verbatim.
pub fn expand_template(template: &str, title: &str, today: NaiveDate, date_format: &str) -> String {
    let with_dates = DATE_TOKEN.replace_all(template, |caps: &Captures| {
        resolve_date(caps, today)
            .map(|d| d.format(date_format).to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });
    with_dates.replace("{{title}}", title)
}

fn resolve_date(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    match (caps.get(1), caps.get(2)) {
        (Some(amount), Some(unit)) => {
            let amount: u32 = amount.as_str().parse().ok()?;
            DateUnit::from_str(unit.as_str()).ok()?.add_to(today, amount)
        }
        _ => Some(today),
    }
}
