use crate::config::Config;
use chrono::NaiveDate;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub fn daily_dir(config: &Config) -> PathBuf {
    config.vault_dir.join(&config.daily_folder)
}

pub fn tasks_dir(config: &Config) -> PathBuf {
    config.vault_dir.join(&config.tasks_folder)
}

/// `{vault}/{daily}/{date formatted}.md`
pub fn daily_note_path(config: &Config, date: NaiveDate) -> PathBuf {
    daily_dir(config).join(format!("{}.md", config.date_key(date)))
}

/// `{vault}/{tasks}/{name}.md`
pub fn task_path(config: &Config, task_name: &str) -> PathBuf {
    tasks_dir(config).join(format!("{task_name}.md"))
}

/// Where the in-progress session is kept between invocations.
pub fn active_work_path(config: &Config) -> PathBuf {
    config.vault_dir.join(".worklog").join("active.toml")
}

pub fn is_markdown(p: &Path) -> bool {
    p.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
