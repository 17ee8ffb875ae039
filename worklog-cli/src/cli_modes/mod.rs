mod worklog_cli;

pub use worklog_cli::WorklogCli;
