//! The single in-progress work session.
//!
//! At most one session is active at a time. It is held behind a mutex and
//! mirrored to a small TOML file so it survives between invocations.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWork {
    pub task_name: String,
    pub task_path: PathBuf,
    pub started_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(ActiveWork),
    /// Work was already in progress; the existing session is returned untouched.
    AlreadyActive(ActiveWork),
}

#[derive(Debug)]
pub struct ActiveSlot {
    state_file: PathBuf,
    current: Mutex<Option<ActiveWork>>,
}

impl ActiveSlot {
    /// Opens the slot backed by `state_file`, loading a persisted session if any.
    /// An unreadable state file is logged and treated as idle.
    pub fn open(state_file: PathBuf) -> Result<Self> {
        let current = if state_file.exists() {
            let s = fs::read_to_string(&state_file)
                .with_context(|| format!("reading {}", state_file.display()))?;
            match toml::from_str::<ActiveWork>(&s) {
                Ok(work) => Some(work),
                Err(err) => {
                    warn!(path = %state_file.display(), %err, "discarding unreadable active work");
                    None
                }
            }
        } else {
            None
        };
        debug!(active = current.is_some(), "opened active work slot");
        Ok(Self {
            state_file,
            current: Mutex::new(current),
        })
    }

    pub fn current(&self) -> Option<ActiveWork> {
        self.lock().clone()
    }

    /// Starts a session unless one is already running.
    pub fn start(
        &self,
        task_name: &str,
        task_path: &Path,
        now: DateTime<Local>,
    ) -> Result<StartOutcome> {
        let mut current = self.lock();
        if let Some(existing) = current.as_ref() {
            warn!(task = %existing.task_name, "work already in progress");
            return Ok(StartOutcome::AlreadyActive(existing.clone()));
        }

        let work = ActiveWork {
            task_name: task_name.to_string(),
            task_path: task_path.to_path_buf(),
            started_at: now,
        };
        self.persist(Some(&work))?;
        info!(task = %work.task_name, "work started");
        *current = Some(work.clone());
        Ok(StartOutcome::Started(work))
    }

    /// Clears the slot, returning the session that was running.
    pub fn finish(&self) -> Result<Option<ActiveWork>> {
        let mut current = self.lock();
        if current.is_none() {
            return Ok(None);
        }
        self.persist(None)?;
        Ok(current.take())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ActiveWork>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, work: Option<&ActiveWork>) -> Result<()> {
        match work {
            Some(work) => {
                if let Some(parent) = self.state_file.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                let s = toml::to_string(work).context("serializing active work")?;
                fs::write(&self.state_file, s)
                    .with_context(|| format!("writing {}", self.state_file.display()))
            }
            None if self.state_file.exists() => fs::remove_file(&self.state_file)
                .with_context(|| format!("removing {}", self.state_file.display())),
            None => Ok(()),
        }
    }
}
