//! Named steps run in order by a fail-fast pipeline.
pub mod update;

use crate::context::Context;
use crate::error::Failure;
use crate::logging::TaskStatus;

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Step completed successfully.
    Ok,
    /// Step had nothing to do.
    Skipped(String),
    /// Step ran in dry-run mode.
    DryRun,
}

/// A named, executable step failing with the tool's error type `E`.
pub trait Task<E>: Send + Sync {
    /// Human-readable step name.
    fn name(&self) -> &str;

    /// Whether this step applies on the current system.
    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    /// Why the step is skipped when [`Task::should_run`] is `false`.
    fn skip_reason(&self) -> String {
        "not applicable".to_string()
    }

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns the tool's error when an external command fails.
    fn run(&self, ctx: &Context) -> Result<TaskResult, E>;
}

/// Run `tasks` in order, recording each outcome for the summary.
///
/// Stops at the first failing step; later steps are neither run nor
/// recorded.
///
/// # Errors
///
/// Returns the error of the first step that fails.
pub fn run_pipeline<E: Failure>(tasks: &[Box<dyn Task<E>>], ctx: &Context) -> Result<(), E> {
    for task in tasks {
        if !task.should_run(ctx) {
            let reason = task.skip_reason();
            ctx.log.info(&format!("skipped: {} ({reason})", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            continue;
        }

        ctx.log.stage(task.name());

        match task.run(ctx) {
            Ok(TaskResult::Ok) => {
                ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            }
            Ok(TaskResult::Skipped(reason)) => {
                ctx.log.info(&format!("skipped: {reason}"));
                ctx.log
                    .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            }
            Ok(TaskResult::DryRun) => {
                ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            }
            Err(e) => {
                ctx.log.record_task(
                    task.name(),
                    TaskStatus::Failed,
                    Some(&format!("exit code {}", e.code())),
                );
                return Err(e);
            }
        }
    }
    Ok(())
}
