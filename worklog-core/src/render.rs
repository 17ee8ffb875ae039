//! Pure Markdown writing helpers for daily notes.
//!
//! Daily note skeleton:
//!   # 2025-08-15
//!
//!   ## PLAN
//!
//!   ## LOG
//!
//! Log line:
//!   - 09:00-10:30 [[Task]] / memo

use crate::config::Config;
use chrono::{NaiveDate, NaiveTime};

/// `- 09:00-10:30 [[Task]]`, with ` / memo` when a memo is given.
pub fn format_log_line(start: NaiveTime, end: NaiveTime, task_name: &str, memo: &str) -> String {
    let start = start.format("%H:%M");
    let end = end.format("%H:%M");
    let memo = memo.trim();
    if memo.is_empty() {
        format!("- {start}-{end} [[{task_name}]]")
    } else {
        format!("- {start}-{end} [[{task_name}]] / {memo}")
    }
}

/// A fresh daily note with empty plan and log sections.
pub fn format_daily_note(date: NaiveDate, config: &Config) -> String {
    format!(
        "# {}\n\n{}\n\n{}\n",
        config.date_key(date),
        config.plan_header(),
        config.log_header()
    )
}

/// Inserts `new_line` at the end of the section headed by `header_line`.
///
/// The section ends at the first following line that starts with `##` or
/// `---`, whichever comes first. Trailing blank lines of the section are
/// kept after the inserted line, and everything from the boundary on is
/// left untouched. A missing header appends a new section at the end.
pub fn append_log_line(text: &str, header_line: &str, new_line: &str) -> String {
    let Some(header_pos) = text.find(header_line) else {
        let existing = text.trim_end();
        if existing.is_empty() {
            return format!("{header_line}\n{new_line}\n");
        }
        return format!("{existing}\n\n{header_line}\n{new_line}\n");
    };

    let (head, body) = match text[header_pos..].find('\n') {
        Some(i) => text.split_at(header_pos + i + 1),
        None => (text, ""),
    };
    let boundary = section_boundary(body);
    let (section, rest) = body.split_at(boundary);

    let content = section.trim_end();
    let blank_tail = &section[content.len()..];
    let blank_tail = blank_tail.trim_start_matches(|c: char| c != '\n' && c.is_whitespace());
    // the newline ending the last content line belongs to the content
    let blank_tail = if content.is_empty() {
        blank_tail
    } else {
        blank_tail.strip_prefix('\n').unwrap_or(blank_tail)
    };

    let mut out = String::with_capacity(text.len() + new_line.len() + 2);
    out.push_str(head);
    if !head.ends_with('\n') {
        out.push('\n');
    }
    if !content.is_empty() {
        out.push_str(content);
        out.push('\n');
    }
    out.push_str(new_line);
    out.push('\n');
    out.push_str(blank_tail);
    out.push_str(rest);
    out
}

/// Byte offset of the first line starting with `##` or `---`; the end of
/// `body` when there is neither.
fn section_boundary(body: &str) -> usize {
    let next_header = line_start_where(body, |l| l.starts_with("##"));
    let separator = line_start_where(body, |l| l.starts_with("---"));
    [next_header, separator]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(body.len())
}

fn line_start_where(body: &str, pred: impl Fn(&str) -> bool) -> Option<usize> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if pred(line.trim_start()) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}
