use clap::{Parser, Subcommand};

use super::color_mode::ColorMode;

/// wl: track work sessions against daily plans kept in Markdown
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct BaseCli {
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, env = "WL_COLOR", default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start working on a task (e.g. `wl start Write report`)
    Start {
        #[arg(required = true, num_args(1..))]
        task: Vec<String>,
    },
    /// Stop the running session and log it in today's note
    End {
        /// Memo appended to the log line after ` / `
        #[arg(long, short, conflicts_with = "edit")]
        memo: Option<String>,
        /// Write the memo in your $EDITOR
        #[arg(long, short)]
        edit: bool,
    },
    /// Print the status line: running session and today's predicted finish
    Status,
    /// Show a day's plan, time slots, progress and predicted finish
    Schedule {
        /// Day to show (`today`, `yesterday`, `2025-08-15`). Defaults to today.
        #[arg(default_value = "today")]
        date: String,
    },
    /// Summarize logged work per task for a day or a period
    Summary {
        /// A single day or a period keyword (`today`, `yesterday`, `week`, `month`, `2025-08-15`)
        #[arg(long, conflicts_with = "from")]
        on: Option<String>,
        /// Start of a period (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End of a period (inclusive). Defaults to today.
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Print the work-history table of a task
    History {
        #[arg(required = true, num_args(1..))]
        task: Vec<String>,
    },
    /// Print a task file, followed by its history when `auto_history` is on
    Show {
        #[arg(required = true, num_args(1..))]
        task: Vec<String>,
    },
    /// Create a task file from the configured template
    New {
        #[arg(required = true, num_args(1..))]
        task: Vec<String>,
    },
    /// List task files
    Tasks,
    /// Print the vault root directory
    Path,
}

impl BaseCli {
    pub fn new() -> Self {
        BaseCli::parse()
    }
}

impl Default for BaseCli {
    fn default() -> Self {
        Self::new()
    }
}
