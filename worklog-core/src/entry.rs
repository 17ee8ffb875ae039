use crate::schedule::saturating_total;
use std::collections::BTreeSet;

/// One completed work session, parsed from a log line like
/// `- 09:00-10:30 [[Task]] / note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLogEntry {
    /// Key of the daily note the line came from (its formatted date).
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub task_name: String,
    pub note: String,
    /// `max(0, end - start)`; reversed ranges collapse to zero.
    pub duration_minutes: u32,
}

/// One planned sub-task, parsed from a plan line like
/// `- [[Task]] / write the draft 1.5h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub task_name: String,
    pub sub_task: String,
    pub planned_minutes: u32,
}

/// A named planning window (`### 09:00-12:00 Morning`) and the plan lines under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub entries: Vec<PlanEntry>,
}

impl TimeSlot {
    pub fn planned_minutes(&self) -> u32 {
        saturating_total(self.entries.iter().map(|e| e.planned_minutes))
    }
}

/// Aggregate over all sessions of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_name: String,
    pub total_minutes: u32,
    pub session_count: u32,
    pub work_days: BTreeSet<String>,
}

impl TaskSummary {
    pub fn new(task_name: &str) -> Self {
        Self {
            task_name: task_name.to_string(),
            total_minutes: 0,
            session_count: 0,
            work_days: BTreeSet::new(),
        }
    }
}
