use crate::time_utils::parse_time_to_minutes;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::BaseDirs;
use serde::Deserialize;
use std::fmt::Write as _;
use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TASK_TEMPLATE: &str =
    "---\ntype: task\ncreated: {{date}}\ndue: {{date+7d}}\n---\n# {{title}}\n";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value `{value}` for `{key}`: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Settings controlling where notes live and how they are parsed.
///
/// Fields are public for reading; edits should go through the `set_*`
/// methods, which reject invalid input and keep the previous value.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding the task and daily-note folders.
    pub vault_dir: PathBuf,
    /// Task files live in `{vault_dir}/{tasks_folder}`.
    pub tasks_folder: String,
    /// Daily notes live in `{vault_dir}/{daily_folder}`.
    pub daily_folder: String,
    /// Header name of the plan section (`## PLAN`).
    pub plan_section: String,
    /// Header name of the log section (`## LOG`).
    pub log_section: String,
    /// chrono pattern naming daily-note files; also the date key of log entries.
    pub daily_date_format: String,
    /// Start/end of a session are rounded to this many minutes.
    pub round_minutes: u32,
    pub show_status: bool,
    /// Print the work-history table after a task file.
    pub auto_history: bool,
    /// Lunch window as minutes since midnight.
    pub lunch_start: u32,
    pub lunch_end: u32,
    /// Template for new task files; supports `{{date}}`, `{{date+Nd|w|m|y}}`, `{{title}}`.
    pub task_template: String,
    /// `key: value` front-matter pair that marks a file as a task.
    pub task_marker: String,
    /// Preferred editor for memos. Falls back to $VISUAL/$EDITOR.
    pub editor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    vault_dir: Option<PathBuf>,
    tasks_folder: Option<String>,
    daily_folder: Option<String>,
    plan_section: Option<String>,
    log_section: Option<String>,
    daily_date_format: Option<String>,
    round_minutes: Option<u32>,
    show_status: Option<bool>,
    auto_history: Option<bool>,
    lunch_start: Option<String>,
    lunch_end: Option<String>,
    task_template: Option<String>,
    task_marker: Option<String>,
    editor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_dir: Self::default_vault_dir(),
            tasks_folder: "tasks".to_string(),
            daily_folder: "daily".to_string(),
            plan_section: "PLAN".to_string(),
            log_section: "LOG".to_string(),
            daily_date_format: "%Y-%m-%d".to_string(),
            round_minutes: 5,
            show_status: true,
            auto_history: true,
            lunch_start: 12 * 60,
            lunch_end: 13 * 60,
            task_template: DEFAULT_TASK_TEMPLATE.to_string(),
            task_marker: "type: task".to_string(),
            editor: None,
        }
    }
}

impl Config {
    /// Loads the first config file found (XDG path, then native), applying
    /// each present value over the defaults. Invalid values are logged and skipped.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config()?;
        Ok(Self::from_file_config(file_config))
    }

    fn from_file_config(file: FileConfig) -> Self {
        let mut config = Self::default();
        if let Some(dir) = file.vault_dir {
            config.vault_dir = dir;
        }
        config.editor = file.editor;
        if let Some(v) = file.show_status {
            config.show_status = v;
        }
        if let Some(v) = file.auto_history {
            config.auto_history = v;
        }
        if let Some(v) = file.task_template {
            config.task_template = v;
        }

        let results = [
            file.tasks_folder.map(|v| config.set_tasks_folder(&v)),
            file.daily_folder.map(|v| config.set_daily_folder(&v)),
            file.plan_section.map(|v| config.set_plan_section(&v)),
            file.log_section.map(|v| config.set_log_section(&v)),
            file.daily_date_format
                .map(|v| config.set_daily_date_format(&v)),
            file.round_minutes.map(|v| config.set_round_minutes(v)),
            file.lunch_start.map(|v| config.set_lunch_start(&v)),
            file.lunch_end.map(|v| config.set_lunch_end(&v)),
            file.task_marker.map(|v| config.set_task_marker(&v)),
        ];
        for err in results.into_iter().flatten().filter_map(Result::err) {
            warn!(%err, "ignoring config value");
        }
        config
    }

    /// Default vault root: `{data_dir}/worklog`
    /// - macOS:   `~/Library/Application Support/worklog`
    /// - Linux:   `$XDG_DATA_HOME/worklog` or `~/.local/share/worklog`
    /// - Windows: `%APPDATA%\worklog`
    fn default_vault_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("worklog")
        } else {
            PathBuf::from("./worklog")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            v.push(
                b.home_dir()
                    .join(".config")
                    .join("worklog")
                    .join("config.toml"),
            );
            v.push(b.config_dir().join("worklog").join("config.toml"));
        }
        v
    }

    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            debug!(path = %path.display(), "reading config");
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }

    pub fn set_tasks_folder(&mut self, value: &str) -> Result<(), ConfigError> {
        self.tasks_folder = non_empty("tasks_folder", value)?;
        Ok(())
    }

    pub fn set_daily_folder(&mut self, value: &str) -> Result<(), ConfigError> {
        self.daily_folder = non_empty("daily_folder", value)?;
        Ok(())
    }

    pub fn set_plan_section(&mut self, value: &str) -> Result<(), ConfigError> {
        self.plan_section = non_empty("plan_section", value)?;
        Ok(())
    }

    pub fn set_log_section(&mut self, value: &str) -> Result<(), ConfigError> {
        self.log_section = non_empty("log_section", value)?;
        Ok(())
    }

    pub fn set_daily_date_format(&mut self, value: &str) -> Result<(), ConfigError> {
        let value = non_empty("daily_date_format", value)?;
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
        let mut out = String::new();
        if write!(out, "{}", probe.format(&value)).is_err() {
            return Err(ConfigError {
                key: "daily_date_format",
                value,
                reason: "not a valid date pattern",
            });
        }
        self.daily_date_format = value;
        Ok(())
    }

    pub fn set_round_minutes(&mut self, value: u32) -> Result<(), ConfigError> {
        if !(1..=60).contains(&value) {
            return Err(ConfigError {
                key: "round_minutes",
                value: value.to_string(),
                reason: "must be between 1 and 60",
            });
        }
        self.round_minutes = value;
        Ok(())
    }

    pub fn set_lunch_start(&mut self, value: &str) -> Result<(), ConfigError> {
        self.lunch_start = clock("lunch_start", value)?;
        Ok(())
    }

    pub fn set_lunch_end(&mut self, value: &str) -> Result<(), ConfigError> {
        self.lunch_end = clock("lunch_end", value)?;
        Ok(())
    }

    pub fn set_task_marker(&mut self, value: &str) -> Result<(), ConfigError> {
        let key = value.split(':').next().unwrap_or_default().trim();
        if key.is_empty() {
            return Err(ConfigError {
                key: "task_marker",
                value: value.to_string(),
                reason: "expected `key` or `key: value`",
            });
        }
        self.task_marker = value.trim().to_string();
        Ok(())
    }

    /// The `## Name` line heading the log section.
    pub fn log_header(&self) -> String {
        format!("## {}", self.log_section)
    }

    pub fn plan_header(&self) -> String {
        format!("## {}", self.plan_section)
    }

    /// Key of a daily note: its date in `daily_date_format`.
    pub fn date_key(&self, date: NaiveDate) -> String {
        date.format(&self.daily_date_format).to_string()
    }
}

fn non_empty(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError {
            key,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    Ok(value.to_string())
}

fn clock(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    parse_time_to_minutes(value).map_err(|_| ConfigError {
        key,
        value: value.to_string(),
        reason: "expected HH:MM",
    })
}
