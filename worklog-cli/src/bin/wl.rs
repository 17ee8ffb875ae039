use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use worklog_cli::{BaseCli, WorklogCli};
use worklog_core::{Tracker, Vault};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = BaseCli::new();
    let tracker = Tracker::new(Vault::new()?)?;
    WorklogCli::new(cli, tracker).run()
}
