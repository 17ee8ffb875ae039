use crate::Config;
use crate::config::DEFAULT_TASK_TEMPLATE;
use std::path::PathBuf;

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(vault_dir: PathBuf) -> Config {
    Config {
        vault_dir,
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
