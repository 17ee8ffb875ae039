//! Isolates a `## Name` section of a daily note and streams its list lines
//! through the line grammars.

use crate::config::Config;
use crate::entry::{PlanEntry, TimeSlot, WorkLogEntry};
use crate::parse_line::{parse_log_line, parse_plan_line, parse_time_range, strip_time_range};
use crate::time_utils::minutes_to_time_str;
use tracing::debug;

/// Where a section stops.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// At the next line starting with `##`, deeper headers included.
    Strict,
    /// At the next `## ` header; `### ` sub-headers stay inside the section.
    Nested,
}

impl Boundary {
    fn ends_at(self, trimmed: &str) -> bool {
        match self {
            Boundary::Strict => trimmed.starts_with("##"),
            Boundary::Nested => trimmed.starts_with("## ") && !trimmed.starts_with("### "),
        }
    }
}

/// Returns the body lines of the first `## {section}` header, in order.
/// A missing header yields an empty vector.
pub fn section_lines<'a>(text: &'a str, section: &str, boundary: Boundary) -> Vec<&'a str> {
    let header = format!("## {section}");
    let mut lines = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if in_section {
            if boundary.ends_at(trimmed) {
                break;
            }
            lines.push(line);
        } else if trimmed == header {
            in_section = true;
        }
    }

    if !in_section {
        debug!(section, "section header not found");
    }
    lines
}

fn list_lines<'a>(lines: &[&'a str]) -> impl Iterator<Item = &'a str> {
    lines
        .iter()
        .copied()
        .filter(|line| line.trim_start().starts_with('-'))
}

/// Parses every log line of the configured log section.
pub fn parse_log_entries(text: &str, date: &str, config: &Config) -> Vec<WorkLogEntry> {
    let lines = section_lines(text, &config.log_section, Boundary::Strict);
    list_lines(&lines)
        .filter_map(|line| {
            let entry = parse_log_line(line, date);
            if entry.is_none() {
                debug!(line, "skipping log line");
            }
            entry
        })
        .collect()
}

/// Parses every plan line of the configured plan section, slot headers ignored.
pub fn parse_plan_entries(text: &str, config: &Config) -> Vec<PlanEntry> {
    let lines = section_lines(text, &config.plan_section, Boundary::Nested);
    list_lines(&lines).filter_map(parse_plan_line).collect()
}

/// Groups the plan section into time slots. A `### ` header carrying an
/// `HH:MM-HH:MM` range opens a slot; plan lines before the first slot
/// header belong to none and are dropped here.
pub fn parse_time_slots(text: &str, config: &Config) -> Vec<TimeSlot> {
    let lines = section_lines(text, &config.plan_section, Boundary::Nested);
    let mut slots: Vec<TimeSlot> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if let Some(heading) = trimmed.strip_prefix("### ") {
            match parse_time_range(heading) {
                Some((start, end)) => slots.push(TimeSlot {
                    name: strip_time_range(heading),
                    start_time: minutes_to_time_str(start),
                    end_time: minutes_to_time_str(end),
                    entries: Vec::new(),
                }),
                None => debug!(heading, "sub-header without a time range"),
            }
            continue;
        }
        if !trimmed.starts_with('-') {
            continue;
        }
        if let (Some(slot), Some(entry)) = (slots.last_mut(), parse_plan_line(trimmed)) {
            slot.entries.push(entry);
        }
    }
    slots
}
