//! Work-history table shown under a task file.

use crate::entry::WorkLogEntry;
use crate::summary::build_task_summary_map;
use crate::time_utils::format_duration;
use std::collections::BTreeSet;

/// Renders the sessions of one task as a Markdown table, oldest first,
/// followed by a totals row. Returns `None` when there are no sessions.
pub fn render_history_table(entries: &[WorkLogEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut sorted: Vec<&WorkLogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });

    let mut table = String::from("| 日付 | 時間 | 作業時間 | メモ |\n|---|---|---|---|\n");
    for e in &sorted {
        table.push_str(&format!(
            "| {} | {}-{} | {} | {} |\n",
            e.date,
            e.start_time,
            e.end_time,
            format_duration(i64::from(e.duration_minutes)),
            escape_cell(&e.note)
        ));
    }

    let summary = build_task_summary_map(entries);
    let days: BTreeSet<&str> = entries.iter().map(|e| e.date.as_str()).collect();
    table.push_str(&format!(
        "| **合計** | {}回 / {}日 | {} | |\n",
        summary.session_count(),
        days.len(),
        format_duration(i64::from(summary.total_minutes()))
    ));
    Some(table)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, start: &str, end: &str, minutes: u32, note: &str) -> WorkLogEntry {
        WorkLogEntry {
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            task_name: "Task".to_string(),
            note: note.to_string(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn renders_rows_in_date_order_with_totals() {
        let table = render_history_table(&[
            entry("2025-08-15", "13:00", "14:00", 60, ""),
            entry("2025-08-14", "09:00", "09:45", 45, "a|b"),
            entry("2025-08-15", "09:00", "09:30", 30, "review"),
        ])
        .unwrap();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], "| 2025-08-14 | 09:00-09:45 | 45分 | a\\|b |");
        assert_eq!(lines[3], "| 2025-08-15 | 09:00-09:30 | 30分 | review |");
        assert_eq!(lines[4], "| 2025-08-15 | 13:00-14:00 | 1時間 |  |");
        assert_eq!(lines[5], "| **合計** | 3回 / 2日 | 2時間15分 | |");
    }

    #[test]
    fn no_sessions_no_table() {
        assert!(render_history_table(&[]).is_none());
    }
}
