use super::theme::Palette;
use once_cell::sync::Lazy;
use regex::Regex;
use termimad::{MadSkin, crossterm::style::Stylize};
use worklog_core::schedule::PlanProgress;
use worklog_core::time_utils::format_duration;
use worklog_core::{QueryError, TaskFile, TaskSummaryMap, TimeSlot};

static WIKILINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid wikilink regex"));

#[derive(Clone)]
pub struct RenderOptions {
    pub use_color: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: Palette::skin(),
            opts: config.unwrap_or(RenderOptions { use_color: true }),
        }
    }

    /// Markdown through the skin when colors are on, verbatim otherwise.
    pub fn print_md(&self, md: &str) {
        if self.opts.use_color {
            self.skin.print_text(md);
        } else {
            print!("{md}");
            if !md.ends_with('\n') {
                println!();
            }
        }
    }

    pub fn print_info(&self, message: &str) {
        if self.opts.use_color {
            let md = format!("|-|\n| {message} |\n|-|\n");
            self.skin.print_text(&md);
        } else {
            println!("{message}");
        }
    }

    pub fn print_warning(&self, message: &str) {
        if self.opts.use_color {
            println!("{}", message.with(Palette::WARNING));
        } else {
            println!("{message}");
        }
    }

    pub fn print_log_line(&self, line: &str) {
        if self.opts.use_color {
            println!("{}", line.with(Palette::SUBHEADING));
        } else {
            println!("{line}");
        }
    }

    pub fn print_plain(&self, text: &str) {
        println!("{text}");
    }

    pub fn print_task(&self, text: &str) {
        if self.opts.use_color {
            self.skin.print_text(&highlight_links(text));
        } else {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    pub fn print_task_list(&self, tasks: &[TaskFile]) {
        for task in tasks {
            if self.opts.use_color {
                println!(
                    "{} {}",
                    task.name.as_str().with(Palette::TASK),
                    task.path.display().to_string().with(Palette::MUTED)
                );
            } else {
                println!("{}\t{}", task.name, task.path.display());
            }
        }
    }

    pub fn print_errors(&self, errors: &[QueryError]) {
        if errors.is_empty() {
            return;
        }
        self.print_md("\n# Errors:");
        for error in errors {
            match error {
                QueryError::FileError { path, error } => {
                    let message = format!("* Could not process '{}': {}", path.display(), error);
                    self.print_md(&message);
                }
            }
        }
    }
}

/// `| タスク | 合計 | 回数 | 日数 |` table, largest total first, with a totals row.
pub fn summary_table(summary: &TaskSummaryMap) -> String {
    let mut md = String::from("| タスク | 合計 | 回数 | 日数 |\n|:-|-:|-:|-:|\n");
    for s in summary.iter() {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            s.task_name,
            format_duration(i64::from(s.total_minutes)),
            s.session_count,
            s.work_days.len()
        ));
    }
    md.push_str(&format!(
        "| **合計** | {} | {} | |\n",
        format_duration(i64::from(summary.total_minutes())),
        summary.session_count()
    ));
    md
}

/// Planned versus logged per task; `remaining` goes negative on overrun.
pub fn progress_table(progress: &[PlanProgress]) -> String {
    let mut md = String::from("| タスク | 予定 | 実績 | 残り |\n|:-|-:|-:|-:|\n");
    for p in progress {
        let remaining = i64::from(p.planned_minutes) - i64::from(p.logged_minutes);
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            p.task_name,
            format_duration(i64::from(p.planned_minutes)),
            format_duration(i64::from(p.logged_minutes)),
            format_duration(remaining)
        ));
    }
    md
}

/// One `### ` block per time slot listing its planned lines.
pub fn slots_markdown(slots: &[TimeSlot]) -> String {
    let mut md = String::new();
    for slot in slots {
        md.push_str(&format!(
            "### {}-{} {} ({})\n",
            slot.start_time,
            slot.end_time,
            slot.name,
            format_duration(i64::from(slot.planned_minutes()))
        ));
        for e in &slot.entries {
            if e.sub_task.is_empty() {
                md.push_str(&format!(
                    "* {} {}\n",
                    e.task_name,
                    format_duration(i64::from(e.planned_minutes))
                ));
            } else {
                md.push_str(&format!(
                    "* {} / {} {}\n",
                    e.task_name,
                    e.sub_task,
                    format_duration(i64::from(e.planned_minutes))
                ));
            }
        }
    }
    md
}

fn highlight_links(text: &str) -> String {
    WIKILINK.replace_all(text, "`$1`").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::{PlanEntry, WorkLogEntry, build_task_summary_map};

    fn log(task: &str, date: &str, minutes: u32) -> WorkLogEntry {
        WorkLogEntry {
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            task_name: task.to_string(),
            note: String::new(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn summary_table_lists_tasks_and_totals() {
        let map = build_task_summary_map(&[
            log("A", "2025-08-14", 30),
            log("B", "2025-08-14", 20),
            log("A", "2025-08-15", 10),
        ]);
        let md = summary_table(&map);
        let lines: Vec<_> = md.lines().collect();
        assert_eq!(lines[2], "| A | 40分 | 2 | 2 |");
        assert_eq!(lines[3], "| B | 20分 | 1 | 1 |");
        assert_eq!(lines[4], "| **合計** | 1時間 | 3 | |");
    }

    #[test]
    fn progress_shows_overrun() {
        let md = progress_table(&[PlanProgress {
            task_name: "A".to_string(),
            planned_minutes: 60,
            logged_minutes: 90,
        }]);
        assert!(md.contains("| A | 1時間 | 1時間30分 | 30分超過 |"));
    }

    #[test]
    fn slots_render_entries() {
        let md = slots_markdown(&[TimeSlot {
            name: "Morning".to_string(),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            entries: vec![
                PlanEntry {
                    task_name: "A".to_string(),
                    sub_task: "draft".to_string(),
                    planned_minutes: 30,
                },
                PlanEntry {
                    task_name: "B".to_string(),
                    sub_task: String::new(),
                    planned_minutes: 60,
                },
            ],
        }]);
        assert_eq!(
            md,
            "### 09:00-12:00 Morning (1時間30分)\n* A / draft 30分\n* B 1時間\n"
        );
    }

    #[test]
    fn links_become_inline_code() {
        assert_eq!(highlight_links("see [[Task]] now"), "see `Task` now");
    }
}
