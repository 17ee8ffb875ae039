use crate::{
    BaseCli, Command, RenderOptions,
    common::{create_editor_buffer, resolve_editor},
    render::{Renderer, progress_table, slots_markdown, summary_table},
};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use strum::IntoEnumIterator;
use tracing::debug;
use worklog_core::dates::{DateFilter, DateKeyword, parse_date_range, parse_date_token};
use worklog_core::history::render_history_table;
use worklog_core::schedule::{plan_progress, predict_schedule};
use worklog_core::time_utils::time_of_day_minutes;
use worklog_core::{
    EndOutcome, QueryError, StartOutcome, Tracker, VaultError, build_task_summary_map,
};

pub struct WorklogCli {
    cli: BaseCli,
    renderer: Renderer,
    tracker: Tracker,
}

impl WorklogCli {
    pub fn new(cli: BaseCli, tracker: Tracker) -> Self {
        let renderer = Renderer::new(Some(RenderOptions {
            use_color: cli.color.use_color(),
        }));
        WorklogCli {
            cli,
            renderer,
            tracker,
        }
    }

    pub fn run(&self) -> Result<()> {
        debug!(command = ?self.cli.command, "dispatching");
        match &self.cli.command {
            Command::Start { task } => self.start_mode(&task.join(" ")),
            Command::End { memo, edit } => self.end_mode(memo.as_deref(), *edit),
            Command::Status => self.status_mode(),
            Command::Schedule { date } => self.schedule_mode(date),
            Command::Summary { on, from, to } => {
                self.summary_mode(on.as_deref(), from.as_deref(), to.as_deref())
            }
            Command::History { task } => self.history_mode(&task.join(" ")),
            Command::Show { task } => self.show_mode(&task.join(" ")),
            Command::New { task } => self.new_mode(&task.join(" ")),
            Command::Tasks => self.tasks_mode(),
            Command::Path => {
                self.renderer.print_plain(&format!(
                    "{}",
                    self.tracker.vault.config.vault_dir.display()
                ));
                Ok(())
            }
        }
    }

    fn start_mode(&self, task: &str) -> Result<()> {
        match self.tracker.start_work(task, Local::now())? {
            StartOutcome::Started(work) => self.renderer.print_info(&format!(
                "Started {} at {}",
                work.task_name,
                work.started_at.format("%H:%M")
            )),
            StartOutcome::AlreadyActive(work) => self.renderer.print_warning(&format!(
                "Already working on {} since {}. End it first with `wl end`.",
                work.task_name,
                work.started_at.format("%H:%M")
            )),
        }
        Ok(())
    }

    fn end_mode(&self, memo: Option<&str>, edit: bool) -> Result<()> {
        if self.tracker.active().is_none() {
            self.renderer.print_warning("No work in progress.");
            return Ok(());
        }
        let memo = if edit {
            let editor = resolve_editor(&self.tracker.vault.config.editor);
            let text = create_editor_buffer(&editor)?;
            text.lines().map(str::trim).collect::<Vec<_>>().join(" ")
        } else {
            memo.unwrap_or_default().to_string()
        };

        match self.tracker.end_work(&memo, Local::now())? {
            EndOutcome::Logged { line, path, .. } => {
                self.renderer
                    .print_info(&format!("Logged to {}", path.display()));
                self.renderer.print_log_line(&line);
            }
            EndOutcome::NotActive => self.renderer.print_warning("No work in progress."),
        }
        Ok(())
    }

    fn status_mode(&self) -> Result<()> {
        let line = self.tracker.status_line(Local::now())?;
        if !line.is_empty() {
            self.renderer.print_plain(&line);
        }
        Ok(())
    }

    fn schedule_mode(&self, date: &str) -> Result<()> {
        let now = Local::now();
        let date = self.single_date(date, now.date_naive())?;
        let day = self.tracker.vault.read_day(date)?;
        if !day.exists {
            self.renderer
                .print_info(&format!("No daily note for {}.", day.date));
            return Ok(());
        }

        let config = &self.tracker.vault.config;
        let schedule = predict_schedule(
            &day.plan,
            &day.logs,
            config.lunch_start,
            config.lunch_end,
            time_of_day_minutes(now.time()),
        );

        let mut md = format!("# {}\n\n**{}**\n\n", day.date, schedule);
        if !day.slots.is_empty() {
            md.push_str(&slots_markdown(&day.slots));
            md.push('\n');
        }
        let progress = plan_progress(&day.plan, &day.logs);
        if !progress.is_empty() {
            md.push_str(&progress_table(&progress));
        }
        self.renderer.print_md(&md);
        Ok(())
    }

    fn summary_mode(&self, on: Option<&str>, from: Option<&str>, to: Option<&str>) -> Result<()> {
        let filter = summary_filter(on, from, to, Local::now().date_naive())?;
        let (title, table, errors) = self.summary_report(filter);
        match table {
            Some(table) => self.renderer.print_md(&format!("# {title}\n\n{table}")),
            None => self
                .renderer
                .print_info(&format!("No sessions logged for {title}.")),
        }
        self.renderer.print_errors(&errors);
        Ok(())
    }

    /// Title, summary table (`None` when nothing was logged) and read errors for `filter`.
    fn summary_report(&self, filter: DateFilter) -> (String, Option<String>, Vec<QueryError>) {
        let config = &self.tracker.vault.config;
        let title = match filter {
            DateFilter::Single(d) => config.date_key(d),
            DateFilter::Range(s, e) => format!("{} .. {}", config.date_key(s), config.date_key(e)),
        };
        let result = self.tracker.vault.read_log_entries(filter);
        let table = (!result.entries.is_empty())
            .then(|| summary_table(&build_task_summary_map(&result.entries)));
        (title, table, result.errors)
    }

    fn history_mode(&self, task: &str) -> Result<()> {
        let result = self.tracker.vault.task_history(task);
        match render_history_table(&result.entries) {
            Some(table) => self.renderer.print_md(&table),
            None => self
                .renderer
                .print_info(&format!("No sessions logged for {task}.")),
        }
        self.renderer.print_errors(&result.errors);
        Ok(())
    }

    fn show_mode(&self, task: &str) -> Result<()> {
        let Some((path, text)) = self.tracker.vault.read_task(task)? else {
            self.renderer.print_warning(&format!("No task file named {task}."));
            return Ok(());
        };
        self.renderer.print_task(&text);
        if self.tracker.vault.config.auto_history && self.tracker.vault.is_task_file(&path)? {
            self.renderer.print_md("\n---\n");
            self.history_mode(task)?;
        }
        Ok(())
    }

    fn new_mode(&self, task: &str) -> Result<()> {
        match self.tracker.vault.create_task(task, Local::now().date_naive()) {
            Ok(path) => {
                self.renderer
                    .print_info(&format!("Created {}", path.display()));
                Ok(())
            }
            Err(err) => match err.downcast_ref::<VaultError>() {
                Some(VaultError::DuplicateTask(path)) => {
                    self.renderer.print_warning(&format!(
                        "{} already exists, left untouched.",
                        path.display()
                    ));
                    Ok(())
                }
                _ => Err(err),
            },
        }
    }

    fn tasks_mode(&self) -> Result<()> {
        let tasks = self.tracker.vault.list_tasks()?;
        if tasks.is_empty() {
            self.renderer.print_info("No task files found.");
        } else {
            self.renderer.print_task_list(&tasks);
        }
        Ok(())
    }

    fn single_date(&self, token: &str, today: NaiveDate) -> Result<NaiveDate> {
        match parse_date_token(token, today) {
            Some(DateFilter::Single(d)) => Ok(d),
            Some(DateFilter::Range(_, end)) => Ok(end),
            None => Err(invalid_date(token)),
        }
    }
}

/// `--from/--to` wins over `--on`; with neither, today.
fn summary_filter(
    on: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> Result<DateFilter> {
    match (on, from) {
        (_, Some(from)) => parse_date_range(from, to.unwrap_or("today"), today)
            .ok_or_else(|| invalid_date(from)),
        (Some(on), None) => parse_date_token(on, today).ok_or_else(|| invalid_date(on)),
        (None, None) => Ok(DateFilter::Single(today)),
    }
}

fn invalid_date(input: &str) -> anyhow::Error {
    let keywords: Vec<&'static str> = DateKeyword::iter().map(<&'static str>::from).collect();
    anyhow!(
        "`{input}` is not a date. Use YYYY-MM-DD or one of: {}",
        keywords.join(", ")
    )
}
