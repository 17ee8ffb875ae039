pub mod config;
pub mod dates;
pub mod entry;
pub mod front_matter;
pub mod history;
pub mod parse_line;
pub mod paths;
pub mod render;
pub mod schedule;
pub mod section;
pub mod session;
pub mod summary;
pub mod template;
pub mod time_utils;
pub mod tracker;
pub mod vault;

pub use config::Config;
pub use entry::{PlanEntry, TaskSummary, TimeSlot, WorkLogEntry};
pub use session::{ActiveWork, StartOutcome};
pub use summary::{TaskSummaryMap, build_task_summary_map};
pub use tracker::{EndOutcome, Tracker};
pub use vault::{DayNote, QueryError, QueryResult, TaskFile, Vault, VaultError};
