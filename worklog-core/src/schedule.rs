//! Predicts when today's plan will be finished.
//!
//! Remaining work is `planned - logged` (logged restricted to planned tasks),
//! started from the end of the latest session, or from "now" when nothing
//! has been logged yet. A single lunch window is skipped over.

use crate::config::Config;
use crate::entry::{PlanEntry, WorkLogEntry};
use crate::section::{parse_log_entries, parse_plan_entries};
use crate::time_utils::{format_duration, minutes_to_time_str, parse_time_to_minutes};
use std::collections::HashSet;
use std::fmt;

/// Shifts a naive finishing time past the lunch window.
///
/// - An empty or inverted window changes nothing.
/// - Starting inside the window resumes at its end.
/// - Crossing the window's start adds the window's length.
pub fn adjust_for_lunch_break(
    start_minutes: u32,
    remaining_minutes: u32,
    lunch_start: u32,
    lunch_end: u32,
) -> u32 {
    let naive_end = start_minutes.saturating_add(remaining_minutes);
    if lunch_end <= lunch_start {
        return naive_end;
    }
    if (lunch_start..lunch_end).contains(&start_minutes) {
        return lunch_end.saturating_add(remaining_minutes);
    }
    if start_minutes < lunch_start && naive_end > lunch_start {
        return naive_end.saturating_add(lunch_end - lunch_start);
    }
    naive_end
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Nothing (or only zero-minute lines) planned.
    NoPlan,
    /// Planned work is fully logged; `overrun_minutes` is logged beyond plan.
    Completed { overrun_minutes: u32 },
    Predicted {
        /// Minutes since midnight; may exceed a day before formatting.
        end_minutes: u32,
        remaining_minutes: u32,
    },
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::NoPlan => write!(f, "予定なし"),
            Schedule::Completed { overrun_minutes } => {
                write!(f, "完了 (超過 {})", format_duration(i64::from(*overrun_minutes)))
            }
            Schedule::Predicted {
                end_minutes,
                remaining_minutes,
            } => write!(
                f,
                "終了予定 {} (残り {})",
                minutes_to_time_str(*end_minutes),
                format_duration(i64::from(*remaining_minutes))
            ),
        }
    }
}

/// Predicts the schedule from already parsed plan and log entries.
/// `now_minutes` is only used when no session has been logged.
pub fn predict_schedule(
    plan: &[PlanEntry],
    logs: &[WorkLogEntry],
    lunch_start: u32,
    lunch_end: u32,
    now_minutes: u32,
) -> Schedule {
    let planned = saturating_total(plan.iter().map(|p| p.planned_minutes));
    if planned == 0 {
        return Schedule::NoPlan;
    }

    let planned_tasks: HashSet<&str> = plan.iter().map(|p| p.task_name.as_str()).collect();
    let logged = saturating_total(
        logs.iter()
            .filter(|e| planned_tasks.contains(e.task_name.as_str()))
            .map(|e| e.duration_minutes),
    );

    if logged >= planned {
        return Schedule::Completed {
            overrun_minutes: logged - planned,
        };
    }
    let remaining = planned - logged;

    let start = logs
        .iter()
        .filter_map(|e| parse_time_to_minutes(&e.end_time).ok())
        .max()
        .unwrap_or(now_minutes);

    Schedule::Predicted {
        end_minutes: adjust_for_lunch_break(start, remaining, lunch_start, lunch_end),
        remaining_minutes: remaining,
    }
}

/// Parses a daily note and renders its schedule state as display text.
pub fn calculate_schedule(text: &str, config: &Config, now_minutes: u32) -> String {
    let plan = parse_plan_entries(text, config);
    let logs = parse_log_entries(text, "", config);
    predict_schedule(&plan, &logs, config.lunch_start, config.lunch_end, now_minutes).to_string()
}

/// Planned versus logged minutes for one planned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanProgress {
    pub task_name: String,
    pub planned_minutes: u32,
    pub logged_minutes: u32,
}

/// Per planned task, in first-planned order, how much has been logged.
pub fn plan_progress(plan: &[PlanEntry], logs: &[WorkLogEntry]) -> Vec<PlanProgress> {
    let mut progress: Vec<PlanProgress> = Vec::new();
    for entry in plan {
        match progress.iter_mut().find(|p| p.task_name == entry.task_name) {
            Some(p) => p.planned_minutes = p.planned_minutes.saturating_add(entry.planned_minutes),
            None => progress.push(PlanProgress {
                task_name: entry.task_name.clone(),
                planned_minutes: entry.planned_minutes,
                logged_minutes: 0,
            }),
        }
    }
    for p in &mut progress {
        p.logged_minutes = saturating_total(
            logs.iter()
                .filter(|e| e.task_name == p.task_name)
                .map(|e| e.duration_minutes),
        );
    }
    progress
}

/// Sums minutes, pinning at `u32::MAX` instead of overflowing.
pub(crate) fn saturating_total(minutes: impl Iterator<Item = u32>) -> u32 {
    minutes.fold(0, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::mk_config;

    const NOON: u32 = 12 * 60;
    const ONE: u32 = 13 * 60;

    fn plan(task: &str, minutes: u32) -> PlanEntry {
        PlanEntry {
            task_name: task.to_string(),
            sub_task: String::new(),
            planned_minutes: minutes,
        }
    }

    fn log(task: &str, start: &str, end: &str, minutes: u32) -> WorkLogEntry {
        WorkLogEntry {
            date: "2025-08-15".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            task_name: task.to_string(),
            note: String::new(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn lunch_spanning_work_is_pushed_back() {
        let end = adjust_for_lunch_break(700, 120, NOON, ONE);
        assert_eq!(end, 880);
        assert_eq!(minutes_to_time_str(end), "14:40");
    }

    #[test]
    fn starting_inside_lunch_resumes_after_it() {
        let end = adjust_for_lunch_break(730, 60, NOON, ONE);
        assert_eq!(end, 780 + 60);
        assert_eq!(minutes_to_time_str(end), "14:00");
    }

    #[test]
    fn starting_at_lunch_end_is_untouched() {
        assert_eq!(adjust_for_lunch_break(ONE, 30, NOON, ONE), ONE + 30);
    }

    #[test]
    fn finishing_exactly_at_lunch_start_is_untouched() {
        assert_eq!(adjust_for_lunch_break(660, 60, NOON, ONE), NOON);
    }

    #[test]
    fn work_after_lunch_is_untouched() {
        assert_eq!(adjust_for_lunch_break(840, 60, NOON, ONE), 900);
    }

    #[test]
    fn empty_or_inverted_lunch_window_is_ignored() {
        assert_eq!(adjust_for_lunch_break(700, 120, NOON, NOON), 820);
        assert_eq!(adjust_for_lunch_break(700, 120, ONE, NOON), 820);
    }

    #[test]
    fn predictions_past_midnight_wrap_once() {
        let end = adjust_for_lunch_break(23 * 60, 120, NOON, ONE);
        assert_eq!(end, 1500);
        assert_eq!(minutes_to_time_str(end), "01:00");

        // Remaining work spanning more than a day still lands on a clock time.
        let end = adjust_for_lunch_break(600, 2000, NOON, ONE);
        assert_eq!(end, 600 + 2000 + 60);
        assert_eq!(minutes_to_time_str(end), "20:20");
    }

    #[test]
    fn huge_remaining_saturates() {
        assert_eq!(adjust_for_lunch_break(700, u32::MAX, NOON, ONE), u32::MAX);
        assert_eq!(adjust_for_lunch_break(730, u32::MAX, NOON, ONE), u32::MAX);
        assert_eq!(adjust_for_lunch_break(ONE, u32::MAX, NOON, NOON), u32::MAX);
    }

    #[test]
    fn oversized_plan_lines_do_not_overflow() {
        let config = mk_config("/tmp/vault".into());
        let text = "## PLAN\n- [[A]] 4294967295min\n\n## LOG\n- 09:00-10:00 [[B]]\n";
        let s = calculate_schedule(text, &config, 540);
        assert!(s.starts_with("終了予定 "), "{s}");

        let text = "## PLAN\n- [[A]] 99999999h\n- [[B]] 1h\n";
        let entries = parse_plan_entries(text, &config);
        match predict_schedule(&entries, &[], NOON, ONE, 540) {
            Schedule::Predicted { remaining_minutes, .. } => {
                assert_eq!(remaining_minutes, u32::MAX)
            }
            other => panic!("unexpected {other:?}"),
        }
        let progress = plan_progress(&[plan("A", u32::MAX), plan("A", 10)], &[]);
        assert_eq!(progress[0].planned_minutes, u32::MAX);
    }

    #[test]
    fn no_plan() {
        let s = predict_schedule(&[plan("A", 0)], &[], NOON, ONE, 540);
        assert_eq!(s, Schedule::NoPlan);
        assert_eq!(s.to_string(), "予定なし");
        assert_eq!(predict_schedule(&[], &[], NOON, ONE, 540), Schedule::NoPlan);
    }

    #[test]
    fn completed_reports_overrun() {
        let s = predict_schedule(
            &[plan("A", 60)],
            &[log("A", "09:00", "10:30", 90)],
            NOON,
            ONE,
            600,
        );
        assert_eq!(s, Schedule::Completed { overrun_minutes: 30 });
        assert_eq!(s.to_string(), "完了 (超過 30分)");
    }

    #[test]
    fn unplanned_sessions_do_not_count_but_move_the_clock() {
        let s = predict_schedule(
            &[plan("A", 60)],
            &[
                log("A", "09:00", "09:30", 30),
                log("Other", "09:30", "11:00", 90),
            ],
            NOON,
            ONE,
            0,
        );
        assert_eq!(
            s,
            Schedule::Predicted {
                end_minutes: 11 * 60 + 30,
                remaining_minutes: 30
            }
        );
        assert_eq!(s.to_string(), "終了予定 11:30 (残り 30分)");
    }

    #[test]
    fn without_logs_prediction_starts_now() {
        let s = predict_schedule(&[plan("A", 120)], &[], NOON, ONE, 700);
        assert_eq!(
            s,
            Schedule::Predicted {
                end_minutes: 880,
                remaining_minutes: 120
            }
        );
        assert_eq!(s.to_string(), "終了予定 14:40 (残り 2時間)");
    }

    #[test]
    fn calculate_schedule_from_note() {
        let config = mk_config("/tmp/unused".into());
        let note = "## PLAN\n- [[A]] 2h\n- [[B]] 30min\n\n## LOG\n- 09:00-10:00 [[A]]\n- 10:00-10:40 [[X]]\n";
        assert_eq!(
            calculate_schedule(note, &config, 0),
            "終了予定 13:10 (残り 1時間30分)"
        );
        assert_eq!(calculate_schedule("# empty", &config, 600), "予定なし");
    }

    #[test]
    fn progress_groups_plan_by_task() {
        let progress = plan_progress(
            &[plan("A", 60), plan("B", 30), plan("A", 30)],
            &[log("A", "09:00", "09:45", 45), log("C", "10:00", "10:10", 10)],
        );
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].task_name, "A");
        assert_eq!(progress[0].planned_minutes, 90);
        assert_eq!(progress[0].logged_minutes, 45);
        assert_eq!(progress[1].logged_minutes, 0);
    }
}
