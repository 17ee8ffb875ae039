//! Single-line grammars for the log and plan sections.
//!
//! Log line:  `- 09:00-10:30 [[Task]] / optional note`
//! Plan line: `- [[Task]] / optional sub-task 1.5h` (or `30min`)
//!
//! A line missing a required token yields `None`; nothing here ever fails.

use crate::entry::{PlanEntry, WorkLogEntry};
use crate::time_utils::{minutes_to_time_str, parse_time_to_minutes};
use once_cell::sync::Lazy;
use regex::{Match, Regex};

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})").expect("valid time range regex")
});

static WIKILINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid wikilink regex"));

static HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(\d+(?:\.\d+)?)h(?:\s|$)").expect("valid hours regex")
});

static MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d+)min(?:\s|$)").expect("valid minutes regex"));

static TRAILING_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(?:\d+(?:\.\d+)?h|\d+min)\s*$").expect("valid trailing duration regex")
});

/// Parses a log line. `date` is the key of the note the line belongs to.
pub fn parse_log_line(line: &str, date: &str) -> Option<WorkLogEntry> {
    let range = TIME_RANGE.captures(line)?;
    let link = WIKILINK.captures(line)?;

    let start = parse_time_to_minutes(&range[1]).ok()?;
    let end = parse_time_to_minutes(&range[2]).ok()?;
    let link_match = link.get(0)?;

    Some(WorkLogEntry {
        date: date.to_string(),
        start_time: minutes_to_time_str(start),
        end_time: minutes_to_time_str(end),
        task_name: task_name(&link[1]),
        note: trailing_segment(&line[link_match.end()..]).to_string(),
        duration_minutes: end.saturating_sub(start),
    })
}

/// Parses a plan line. Struck-through lines (`- ~~[[Task]]~~`) are cancelled.
pub fn parse_plan_line(line: &str) -> Option<PlanEntry> {
    let body = strip_list_marker(line);
    if body.starts_with("~~") {
        return None;
    }

    let link = WIKILINK.captures(body)?;
    let link_match = link.get(0)?;
    let outside_link = without_match(body, &link_match);

    let sub_task = TRAILING_DURATION
        .replace(trailing_segment(&body[link_match.end()..]), "")
        .trim()
        .to_string();

    Some(PlanEntry {
        task_name: task_name(&link[1]),
        sub_task,
        planned_minutes: planned_minutes(&outside_link),
    })
}

/// Extracts a duration from `<number>h` (fractional hours, rounded to the
/// minute) or `<integer>min`. Hours win when both appear.
pub fn planned_minutes(text: &str) -> u32 {
    if let Some(caps) = HOURS.captures(text) {
        if let Ok(hours) = caps[1].parse::<f64>() {
            return (hours * 60.0).round() as u32;
        }
    }
    MINUTES
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Extracts the `HH:MM-HH:MM` range from arbitrary text as minutes.
pub fn parse_time_range(text: &str) -> Option<(u32, u32)> {
    let range = TIME_RANGE.captures(text)?;
    let start = parse_time_to_minutes(&range[1]).ok()?;
    let end = parse_time_to_minutes(&range[2]).ok()?;
    Some((start, end))
}

/// Returns `text` with its first time range removed, trimmed.
pub fn strip_time_range(text: &str) -> String {
    TIME_RANGE.replace(text, "").trim().to_string()
}

/// `Name|alias` names the task `Name`.
fn task_name(link_inner: &str) -> String {
    link_inner
        .split('|')
        .next()
        .unwrap_or(link_inner)
        .trim()
        .to_string()
}

/// The free text after the first `/`, trimmed; empty when there is none.
fn trailing_segment(text: &str) -> &str {
    text.split_once('/').map(|(_, rest)| rest.trim()).unwrap_or("")
}

/// Drops the leading `-` and an optional `[ ]`/`[x]` checkbox.
fn strip_list_marker(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim_start();
    for checkbox in ["[ ]", "[x]", "[X]"] {
        if let Some(after) = rest.strip_prefix(checkbox) {
            return after.trim_start();
        }
    }
    rest
}

fn without_match(text: &str, m: &Match) -> String {
    format!("{} {}", &text[..m.start()], &text[m.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_line_with_note() {
        let e = parse_log_line("- 09:00-10:30 [[Write report]] / first draft", "2025-08-15")
            .expect("entry");
        assert_eq!(e.date, "2025-08-15");
        assert_eq!(e.start_time, "09:00");
        assert_eq!(e.end_time, "10:30");
        assert_eq!(e.task_name, "Write report");
        assert_eq!(e.note, "first draft");
        assert_eq!(e.duration_minutes, 90);
    }

    #[test]
    fn log_line_without_note() {
        let e = parse_log_line("- 9:05 - 9:35 [[Inbox]]", "d").expect("entry");
        assert_eq!(e.start_time, "09:05");
        assert_eq!(e.note, "");
        assert_eq!(e.duration_minutes, 30);
    }

    #[test]
    fn log_line_reversed_range_is_zero() {
        let e = parse_log_line("- 15:00-14:00 [[Task]]", "d").expect("entry");
        assert_eq!(e.duration_minutes, 0);
    }

    #[test]
    fn log_line_missing_tokens_is_skipped() {
        assert!(parse_log_line("- 09:00-10:00 no link here", "d").is_none());
        assert!(parse_log_line("- [[Task]] without a range", "d").is_none());
        assert!(parse_log_line("- 25:00-26:00 [[Task]]", "d").is_none());
        assert!(parse_log_line("", "d").is_none());
    }

    #[test]
    fn log_line_alias_and_slash_inside_link() {
        let e = parse_log_line("- 10:00-11:00 [[projects/Site|site]] / deploy", "d")
            .expect("entry");
        assert_eq!(e.task_name, "projects/Site");
        assert_eq!(e.note, "deploy");
    }

    #[test]
    fn plan_line_with_hours() {
        let p = parse_plan_line("- [[Write report]] / outline 1.5h").expect("entry");
        assert_eq!(p.task_name, "Write report");
        assert_eq!(p.sub_task, "outline");
        assert_eq!(p.planned_minutes, 90);
    }

    #[test]
    fn plan_line_with_minutes_before_subtask() {
        let p = parse_plan_line("- [[Mail]] 30min / triage").expect("entry");
        assert_eq!(p.planned_minutes, 30);
        assert_eq!(p.sub_task, "triage");
    }

    #[test]
    fn plan_line_fractional_hours_round_to_minute() {
        let p = parse_plan_line("- [[Task]] 0.33h").expect("entry");
        assert_eq!(p.planned_minutes, 20);
    }

    #[test]
    fn plan_line_without_duration_plans_zero() {
        let p = parse_plan_line("- [[Task]] / think about it").expect("entry");
        assert_eq!(p.planned_minutes, 0);
        assert_eq!(p.sub_task, "think about it");
    }

    #[test]
    fn plan_line_duration_inside_link_is_ignored() {
        let p = parse_plan_line("- [[Fix 2h bug]]").expect("entry");
        assert_eq!(p.task_name, "Fix 2h bug");
        assert_eq!(p.planned_minutes, 0);
    }

    #[test]
    fn plan_line_struck_through_is_cancelled() {
        assert!(parse_plan_line("- ~~[[Task]] 1h~~").is_none());
        assert!(parse_plan_line("- [ ] ~~[[Task]] 1h~~").is_none());
    }

    #[test]
    fn plan_line_with_checkbox() {
        let p = parse_plan_line("- [x] [[Task]] 45min").expect("entry");
        assert_eq!(p.task_name, "Task");
        assert_eq!(p.planned_minutes, 45);
        assert_eq!(p.sub_task, "");
    }

    #[test]
    fn plan_line_without_link_is_skipped() {
        assert!(parse_plan_line("- just a note 1h").is_none());
    }

    #[test]
    fn time_range_helpers() {
        assert_eq!(parse_time_range("### 09:00-12:00 Morning"), Some((540, 720)));
        assert_eq!(strip_time_range("09:00-12:00 Morning"), "Morning");
        assert_eq!(parse_time_range("Morning"), None);
    }
}
