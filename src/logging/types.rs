//! What a tool reports: the [`Log`] trait and step outcomes.

/// Outcome of one step, kept for the closing summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Step name as shown to the user.
    pub name: String,
    /// How the step ended.
    pub status: TaskStatus,
    /// Skip reason or failure detail.
    pub message: Option<String>,
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The step ran and succeeded.
    Ok,
    /// The step did not apply (tool absent, nothing to do).
    Skipped,
    /// The step was only previewed.
    DryRun,
    /// The step failed and ended the run.
    Failed,
}

impl TaskStatus {
    /// Word used for this status in the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }

    /// ANSI colour of the summary line.
    pub(super) const fn colour(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::Skipped => "\x1b[33m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }
}

/// Sink for everything a tool tells the user.
///
/// [`Logger`](super::Logger) is the real implementation; tests record the
/// calls instead.
pub trait Log: Send + Sync {
    /// Header for the next step.
    fn stage(&self, msg: &str);
    /// Progress or result line.
    fn info(&self, msg: &str);
    /// Line for the user's eyes only: printed, never written to the log file.
    fn secret(&self, msg: &str);
    /// Detail shown with `--verbose` and always kept in the log file.
    fn debug(&self, msg: &str);
    /// Something worth attention that does not stop the run.
    fn warn(&self, msg: &str);
    /// A line on the error stream, usually `error[<code>]: <message>`.
    fn error(&self, msg: &str);
    /// What a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Remember a step outcome for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
