//! Start/end work actions and the status line, tying the vault to the active slot.

use crate::paths::{active_work_path, task_path};
use crate::render::format_log_line;
use crate::schedule::calculate_schedule;
use crate::session::{ActiveSlot, ActiveWork, StartOutcome};
use crate::time_utils::{format_duration, round_time, time_of_day_minutes};
use crate::vault::Vault;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub enum EndOutcome {
    /// No session was running; nothing was written.
    NotActive,
    Logged {
        work: ActiveWork,
        line: String,
        path: PathBuf,
    },
}

#[derive(Debug)]
pub struct Tracker {
    pub vault: Vault,
    slot: ActiveSlot,
}

impl Tracker {
    pub fn new(vault: Vault) -> Result<Self> {
        let slot = ActiveSlot::open(active_work_path(&vault.config))?;
        Ok(Self { vault, slot })
    }

    pub fn active(&self) -> Option<ActiveWork> {
        self.slot.current()
    }

    pub fn start_work(&self, task_name: &str, now: DateTime<Local>) -> Result<StartOutcome> {
        let path = task_path(&self.vault.config, task_name.trim());
        self.slot.start(task_name.trim(), &path, now)
    }

    /// Logs the running session into the daily note of `now` and clears the slot.
    /// Start and end are rounded to the configured granularity first.
    pub fn end_work(&self, memo: &str, now: DateTime<Local>) -> Result<EndOutcome> {
        let Some(work) = self.slot.current() else {
            return Ok(EndOutcome::NotActive);
        };

        let granularity = self.vault.config.round_minutes;
        let start = round_time(work.started_at, granularity);
        let end = round_time(now, granularity);
        let line = format_log_line(start.time(), end.time(), &work.task_name, memo);

        let path = self.vault.append_log(now.date_naive(), &line)?;
        self.slot.finish()?;
        info!(task = %work.task_name, %line, "work logged");
        Ok(EndOutcome::Logged { work, line, path })
    }

    /// One-line status: the running session, if any, and today's schedule.
    /// Empty when the status display is turned off.
    pub fn status_line(&self, now: DateTime<Local>) -> Result<String> {
        if !self.vault.config.show_status {
            return Ok(String::new());
        }
        let day = self.vault.read_day(now.date_naive())?;
        let schedule = calculate_schedule(
            &day.text,
            &self.vault.config,
            time_of_day_minutes(now.time()),
        );
        Ok(match self.active() {
            Some(work) => {
                let elapsed = (now - work.started_at).num_minutes().max(0);
                format!(
                    "▶ {} ({}) | {}",
                    work.task_name,
                    format_duration(elapsed),
                    schedule
                )
            }
            None => schedule,
        })
    }
}
