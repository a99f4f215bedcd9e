//! `jau`: the system update pipeline.
use crate::context::Context;
use crate::dispatch;
use crate::error::UpdateError;
use crate::tasks::{self, update::update_tasks};

/// Run `jau`: check for `dnf` and `sudo`, then run every update step in
/// order, stopping at the first failure.
///
/// # Errors
///
/// Returns the [`UpdateError`] of the missing tool or the failing step.
pub fn run(ctx: &Context) -> Result<(), UpdateError> {
    dispatch::require_tools(
        &*ctx.executor,
        [
            ("dnf".to_string(), UpdateError::MissingDnf),
            ("sudo".to_string(), UpdateError::MissingSudo),
        ],
    )?;
    if ctx.dry_run {
        ctx.log.info("dry run: no packages will be changed");
    }
    tasks::run_pipeline(&update_tasks(), ctx)
}
