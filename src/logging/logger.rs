//! The [`Log`] implementation used by the binaries.
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;
use super::{DRY_RUN, SECRET, STAGE};

/// Emits every call as a `tracing` event and keeps step outcomes for
/// [`print_summary`](Self::print_summary).
#[derive(Debug)]
pub struct Logger {
    command: String,
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`, whose file layer writes the default log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(command, log_file_path(command))
    }

    /// Logger whose summary points at `log_file`.
    pub(crate) fn with_log_file(command: &str, log_file: Option<PathBuf>) -> Self {
        Self {
            command: command.to_string(),
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Close a `jau` or `jinstall` run with one line per recorded step and a
    /// tally. Prints nothing when no step was recorded.
    pub fn print_summary(&self) {
        let Ok(tasks) = self.tasks.lock().map(|g| g.clone()) else {
            return;
        };
        if tasks.is_empty() {
            return;
        }

        self.stage(&format!("{} summary", self.command));
        for task in &tasks {
            let detail = task
                .message
                .as_ref()
                .map_or_else(String::new, |m| format!(" ({m})"));
            self.info(&format!(
                "  {}{:<7}\x1b[0m {}{detail}",
                task.status.colour(),
                task.status.label(),
                task.name
            ));
        }
        self.info(&Tally::of(&tasks).to_string());

        if let Some(path) = &self.log_file {
            self.debug(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn secret(&self, msg: &str) {
        tracing::info!(target: SECRET, "{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN, "{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}

/// Step counts per status.
#[derive(Debug, Default)]
struct Tally {
    ok: usize,
    skipped: usize,
    dry_run: usize,
    failed: usize,
}

impl Tally {
    fn of(tasks: &[TaskEntry]) -> Self {
        tasks.iter().fold(Self::default(), |mut tally, task| {
            match task.status {
                TaskStatus::Ok => tally.ok += 1,
                TaskStatus::Skipped => tally.skipped += 1,
                TaskStatus::DryRun => tally.dry_run += 1,
                TaskStatus::Failed => tally.failed += 1,
            }
            tally
        })
    }
}

/// `3 steps: 2 ok, 1 skipped`; statuses with no steps are left out.
impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.ok + self.skipped + self.dry_run + self.failed;
        write!(f, "{total} step{}", if total == 1 { "" } else { "s" })?;
        let mut sep = ": ";
        for (count, status) in [
            (self.ok, TaskStatus::Ok),
            (self.skipped, TaskStatus::Skipped),
            (self.dry_run, TaskStatus::DryRun),
            (self.failed, TaskStatus::Failed),
        ] {
            if count > 0 {
                write!(f, "{sep}{count} {}", status.label())?;
                sep = ", ";
            }
        }
        Ok(())
    }
}
