use crate::entry::{TaskSummary, WorkLogEntry};
use crate::schedule::saturating_total;
use std::collections::HashMap;

/// Task summaries ordered by total minutes, largest first.
/// Ties are broken by task name so the order is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummaryMap {
    summaries: Vec<TaskSummary>,
}

impl TaskSummaryMap {
    pub fn get(&self, task_name: &str) -> Option<&TaskSummary> {
        self.summaries.iter().find(|s| s.task_name == task_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSummary> {
        self.summaries.iter()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn total_minutes(&self) -> u32 {
        saturating_total(self.summaries.iter().map(|s| s.total_minutes))
    }

    pub fn session_count(&self) -> u32 {
        self.summaries.iter().map(|s| s.session_count).sum()
    }
}

impl IntoIterator for TaskSummaryMap {
    type Item = TaskSummary;
    type IntoIter = std::vec::IntoIter<TaskSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.summaries.into_iter()
    }
}

/// Folds log entries into one summary per task name (exact match).
pub fn build_task_summary_map(entries: &[WorkLogEntry]) -> TaskSummaryMap {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<TaskSummary> = Vec::new();

    for entry in entries {
        let i = *index.entry(entry.task_name.as_str()).or_insert_with(|| {
            summaries.push(TaskSummary::new(&entry.task_name));
            summaries.len() - 1
        });
        let summary = &mut summaries[i];
        summary.total_minutes = summary.total_minutes.saturating_add(entry.duration_minutes);
        summary.session_count += 1;
        summary.work_days.insert(entry.date.clone());
    }

    summaries.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.task_name.cmp(&b.task_name))
    });
    TaskSummaryMap { summaries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(task: &str, date: &str, minutes: u32) -> WorkLogEntry {
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
    fn groups_and_sorts_descending() {
        let map = build_task_summary_map(&[
            entry("A", "2025-08-14", 30),
            entry("B", "2025-08-14", 20),
            entry("A", "2025-08-15", 10),
        ]);
        let order: Vec<_> = map.iter().map(|s| s.task_name.as_str()).collect();
        assert_eq!(order, ["A", "B"]);

        let a = map.get("A").unwrap();
        assert_eq!(a.total_minutes, 40);
        assert_eq!(a.session_count, 2);
        assert_eq!(a.work_days.len(), 2);

        let b = map.get("B").unwrap();
        assert_eq!(b.total_minutes, 20);
        assert_eq!(b.session_count, 1);

        assert_eq!(map.total_minutes(), 60);
        assert_eq!(map.session_count(), 3);
    }

    #[test]
    fn same_day_counts_once() {
        let map = build_task_summary_map(&[
            entry("A", "2025-08-15", 30),
            entry("A", "2025-08-15", 15),
        ]);
        assert_eq!(map.get("A").unwrap().work_days.len(), 1);
        assert_eq!(map.get("A").unwrap().session_count, 2);
    }

    #[test]
    fn ties_break_by_name() {
        let map = build_task_summary_map(&[
            entry("Zeta", "d", 30),
            entry("Alpha", "d", 30),
            entry("Mid", "d", 45),
        ]);
        let order: Vec<_> = map.into_iter().map(|s| s.task_name).collect();
        assert_eq!(order, ["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn names_match_exactly() {
        let map = build_task_summary_map(&[entry("task", "d", 5), entry("Task", "d", 5)]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_input() {
        let map = build_task_summary_map(&[]);
        assert!(map.is_empty());
        assert_eq!(map.total_minutes(), 0);
    }
}
