//! The `Vault` struct: filesystem access to daily notes and task files.

use crate::config::Config;
use crate::dates::DateFilter;
use crate::entry::{PlanEntry, TimeSlot, WorkLogEntry};
use crate::front_matter::{has_marker, parse_front_matter};
use crate::paths::{daily_dir, daily_note_path, is_markdown, task_path, tasks_dir};
use crate::render::{append_log_line, format_daily_note};
use crate::section::{parse_log_entries, parse_plan_entries, parse_time_slots};
use crate::template::expand_template;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("task file already exists: {0}")]
    DuplicateTask(PathBuf),
    #[error("invalid task name `{0}`")]
    InvalidTaskName(String),
}

/// Represents a non-critical issue that occurred during a query.
///
/// Problems with one note are reported here without stopping the rest of
/// a multi-note read.
#[derive(Debug)]
pub enum QueryError {
    FileError { path: PathBuf, error: anyhow::Error },
}

/// Log entries read from one or more daily notes, plus any per-file problems.
#[derive(Debug, Default)]
pub struct QueryResult {
    pub entries: Vec<WorkLogEntry>,
    pub errors: Vec<QueryError>,
}

/// Everything the plan and log sections of one daily note contain.
#[derive(Debug, Default)]
pub struct DayNote {
    pub date: String,
    pub path: PathBuf,
    pub exists: bool,
    pub text: String,
    pub plan: Vec<PlanEntry>,
    pub slots: Vec<TimeSlot>,
    pub logs: Vec<WorkLogEntry>,
}

/// A markdown file in the tasks folder whose front matter carries the task marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct Vault {
    pub config: Config,
}

impl Vault {
    /// Creates a new `Vault`, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Creates a new `Vault` with a specific `Config`, making sure the root exists.
    pub fn with_config(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.vault_dir)
            .with_context(|| format!("creating {}", config.vault_dir.display()))?;
        Ok(Self { config })
    }

    /// Reads and parses the daily note for `date`. A missing note is empty, not an error.
    pub fn read_day(&self, date: NaiveDate) -> Result<DayNote> {
        let path = daily_note_path(&self.config, date);
        let key = self.config.date_key(date);
        if !path.exists() {
            debug!(path = %path.display(), "no daily note");
            return Ok(DayNote {
                date: key,
                path,
                ..Default::default()
            });
        }
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(DayNote {
            plan: parse_plan_entries(&text, &self.config),
            slots: parse_time_slots(&text, &self.config),
            logs: parse_log_entries(&text, &key, &self.config),
            date: key,
            path,
            exists: true,
            text,
        })
    }

    /// Creates the daily note (and its folder) when it does not exist yet.
    pub fn ensure_daily_note(&self, date: NaiveDate) -> Result<PathBuf> {
        let path = daily_note_path(&self.config, date);
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating parent directory {}", parent.display()))?;
        }
        fs::write(&path, format_daily_note(date, &self.config))
            .with_context(|| format!("creating daily note {}", path.display()))?;
        info!(path = %path.display(), "created daily note");
        Ok(path)
    }

    /// Inserts `line` into the log section of the daily note for `date`.
    pub fn append_log(&self, date: NaiveDate, line: &str) -> Result<PathBuf> {
        let path = self.ensure_daily_note(date)?;
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let updated = append_log_line(&text, &self.config.log_header(), line);
        fs::write(&path, updated).with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), line, "appended log line");
        Ok(path)
    }

    /// Reads the log entries of every day in `dates`. Days without a note are skipped.
    pub fn read_log_entries(&self, dates: DateFilter) -> QueryResult {
        let mut result = QueryResult::default();
        for date in dates.days() {
            let path = daily_note_path(&self.config, date);
            if path.exists() {
                let key = self.config.date_key(date);
                self.read_note_into(&path, &key, &mut result);
            }
        }
        result
    }

    /// Every log entry for `task_name` across all daily notes.
    pub fn task_history(&self, task_name: &str) -> QueryResult {
        let mut result = QueryResult::default();
        let dir = daily_dir(&self.config);
        if !dir.exists() {
            return result;
        }
        let files = match scan_dir_for_md_files(&dir) {
            Ok(files) => files,
            Err(error) => {
                result.errors.push(QueryError::FileError { path: dir, error });
                return result;
            }
        };
        for path in files {
            let key = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.read_note_into(&path, &key, &mut result);
        }
        result.entries.retain(|e| e.task_name == task_name);
        result
    }

    fn read_note_into(&self, path: &Path, key: &str, result: &mut QueryResult) {
        match fs::read_to_string(path) {
            Ok(text) => result
                .entries
                .extend(parse_log_entries(&text, key, &self.config)),
            Err(error) => result.errors.push(QueryError::FileError {
                path: path.to_path_buf(),
                error: error.into(),
            }),
        }
    }

    /// Writes a new task file from the configured template.
    /// An existing file is never touched.
    pub fn create_task(&self, task_name: &str, today: NaiveDate) -> Result<PathBuf> {
        let name = task_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("[[") {
            return Err(VaultError::InvalidTaskName(task_name.to_string()).into());
        }
        let path = task_path(&self.config, name);
        if path.exists() {
            return Err(VaultError::DuplicateTask(path).into());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating parent directory {}", parent.display()))?;
        }
        let content = expand_template(
            &self.config.task_template,
            name,
            today,
            &self.config.daily_date_format,
        );
        fs::write(&path, content).with_context(|| format!("creating {}", path.display()))?;
        info!(path = %path.display(), "created task file");
        Ok(path)
    }

    /// Task files under the tasks folder, sorted by name.
    pub fn list_tasks(&self) -> Result<Vec<TaskFile>> {
        let dir = tasks_dir(&self.config);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut tasks = Vec::new();
        for path in scan_dir_for_md_files(&dir)? {
            if self.is_task_file(&path)? {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tasks.push(TaskFile { name, path });
            }
        }
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tasks)
    }

    /// Whether `path` lies in the tasks folder and its front matter carries the marker.
    pub fn is_task_file(&self, path: &Path) -> Result<bool> {
        if !path.starts_with(tasks_dir(&self.config)) || !is_markdown(path) {
            return Ok(false);
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(has_marker(
            &parse_front_matter(&text),
            &self.config.task_marker,
        ))
    }

    /// Reads a task file by name.
    pub fn read_task(&self, task_name: &str) -> Result<Option<(PathBuf, String)>> {
        let path = task_path(&self.config, task_name);
        if !path.exists() {
            return Ok(None);
        }
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some((path, text)))
    }
}

fn scan_dir_for_md_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut file_paths = Vec::new();

    for entry in fs::read_dir(path).with_context(|| format!("listing {}", path.display()))? {
        let entry = entry?;
        let p = entry.path();

        if p.is_dir() {
            file_paths.extend(scan_dir_for_md_files(&p)?);
        } else if p.is_file() && is_markdown(&p) {
            file_paths.push(p);
        }
    }
    file_paths.sort();
    Ok(file_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::mk_config;
    use tempfile::tempdir;

    fn mk_vault() -> (Vault, tempfile::TempDir) {
        let tmp = tempdir().unwrap();
        let cfg = mk_config(tmp.path().join("vault"));
        let v = Vault::with_config(cfg).unwrap();
        (v, tmp)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn append_creates_note_lazily() {
        let (v, _tmp) = mk_vault();
        let path = v.append_log(d(2025, 8, 15), "- 09:00-10:00 [[Task]]").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "# 2025-08-15\n\n## PLAN\n\n## LOG\n- 09:00-10:00 [[Task]]\n"
        );

        v.append_log(d(2025, 8, 15), "- 10:00-10:30 [[Other]] / memo")
            .unwrap();
        let day = v.read_day(d(2025, 8, 15)).unwrap();
        assert!(day.exists);
        assert_eq!(day.logs.len(), 2);
        assert_eq!(day.logs[1].note, "memo");
        assert_eq!(day.logs[1].date, "2025-08-15");
    }

    #[test]
    fn read_missing_day_is_empty() {
        let (v, _tmp) = mk_vault();
        let day = v.read_day(d(2025, 8, 15)).unwrap();
        assert!(!day.exists);
        assert!(day.logs.is_empty());
        assert!(day.plan.is_empty());
    }

    #[test]
    fn reads_range_of_notes() {
        let (v, _tmp) = mk_vault();
        v.append_log(d(2025, 8, 14), "- 09:00-10:00 [[A]]").unwrap();
        v.append_log(d(2025, 8, 16), "- 09:00-09:30 [[B]]").unwrap();
        v.append_log(d(2025, 8, 20), "- 09:00-09:30 [[C]]").unwrap();

        let result = v.read_log_entries(DateFilter::Range(d(2025, 8, 14), d(2025, 8, 16)));
        assert!(result.errors.is_empty());
        let names: Vec<_> = result.entries.iter().map(|e| e.task_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn history_collects_one_task_across_days() {
        let (v, _tmp) = mk_vault();
        v.append_log(d(2025, 8, 14), "- 09:00-10:00 [[A]]").unwrap();
        v.append_log(d(2025, 8, 14), "- 10:00-10:10 [[B]]").unwrap();
        v.append_log(d(2025, 8, 15), "- 13:00-13:45 [[A]] / more").unwrap();

        let result = v.task_history("A");
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].date, "2025-08-14");
        assert_eq!(result.entries[1].date, "2025-08-15");
        assert_eq!(result.entries[1].duration_minutes, 45);
    }

    #[test]
    fn create_task_from_template_and_refuse_duplicates() {
        let (v, _tmp) = mk_vault();
        let path = v.create_task("Write report", d(2025, 8, 15)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "---\ntype: task\ncreated: 2025-08-15\ndue: 2025-08-22\n---\n# Write report\n"
        );

        fs::write(&path, "edited").unwrap();
        let err = v.create_task("Write report", d(2025, 8, 16)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::DuplicateTask(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "edited");
    }

    #[test]
    fn create_task_rejects_bad_names() {
        let (v, _tmp) = mk_vault();
        assert!(v.create_task("  ", d(2025, 8, 15)).is_err());
        assert!(v.create_task("a/b", d(2025, 8, 15)).is_err());
    }

    #[test]
    fn lists_only_marked_task_files() {
        let (v, _tmp) = mk_vault();
        v.create_task("Beta", d(2025, 8, 15)).unwrap();
        v.create_task("Alpha", d(2025, 8, 15)).unwrap();
        let dir = tasks_dir(&v.config);
        fs::write(dir.join("Scratch.md"), "# just a note\n").unwrap();
        fs::write(dir.join("data.txt"), "---\ntype: task\n---\n").unwrap();

        let tasks = v.list_tasks().unwrap();
        let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
        assert!(!v.is_task_file(&daily_note_path(&v.config, d(2025, 8, 15))).unwrap());
    }

    #[test]
    fn read_task_by_name() {
        let (v, _tmp) = mk_vault();
        assert!(v.read_task("Missing").unwrap().is_none());
        v.create_task("Task", d(2025, 8, 15)).unwrap();
        let (_, text) = v.read_task("Task").unwrap().unwrap();
        assert!(text.contains("# Task"));
    }
}
