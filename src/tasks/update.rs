//! The `dnf`/`flatpak` update steps run by `jau`.
use super::{Task, TaskResult};
use crate::context::Context;
use crate::error::UpdateError;

/// `dnf check-update` exit status meaning updates are available.
const UPDATES_AVAILABLE: i32 = 100;

/// Run `program args…` attached to the terminal, or preview it in dry-run
/// mode. A non-zero exit becomes `fail(detail)`.
fn run_step(
    ctx: &Context,
    program: &str,
    args: &[&str],
    fail: fn(String) -> UpdateError,
) -> Result<TaskResult, UpdateError> {
    let line = command_line(program, args);
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would run: {line}"));
        return Ok(TaskResult::DryRun);
    }
    ctx.log.debug(&format!("running: {line}"));
    match ctx.executor.run_interactive(program, args) {
        Ok(0) => Ok(TaskResult::Ok),
        Ok(status) => Err(fail(format!("{line} exited with status {status}"))),
        Err(e) => Err(fail(format!("{e:#}"))),
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One external command, optionally gated on a tool being installed.
#[derive(Debug)]
pub struct CommandStep {
    name: &'static str,
    program: &'static str,
    args: &'static [&'static str],
    requires: Option<&'static str>,
    fail: fn(String) -> UpdateError,
}

impl Task<UpdateError> for CommandStep {
    fn name(&self) -> &str {
        self.name
    }

    fn should_run(&self, ctx: &Context) -> bool {
        self.requires.is_none_or(|tool| ctx.executor.which(tool))
    }

    fn skip_reason(&self) -> String {
        self.requires
            .map_or_else(|| "not applicable".to_string(), |tool| format!("{tool} not installed"))
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, UpdateError> {
        run_step(ctx, self.program, self.args, self.fail)
    }
}

/// Check for security advisories and apply them when any are pending.
#[derive(Debug)]
pub struct SecurityUpdates;

impl Task<UpdateError> for SecurityUpdates {
    fn name(&self) -> &str {
        "Apply security updates"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, UpdateError> {
        let check = ["check-update", "--security"];
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run: {}", command_line("dnf", &check)));
            return run_step(
                ctx,
                "sudo",
                &["dnf", "upgrade", "-y", "--security"],
                UpdateError::SecurityUpgradeFailed,
            );
        }
        let result = ctx
            .executor
            .run_unchecked("dnf", &check)
            .map_err(|e| UpdateError::SecurityCheckFailed(format!("{e:#}")))?;
        match result.code {
            Some(0) => Ok(TaskResult::Skipped("no security updates".to_string())),
            Some(UPDATES_AVAILABLE) => run_step(
                ctx,
                "sudo",
                &["dnf", "upgrade", "-y", "--security"],
                UpdateError::SecurityUpgradeFailed,
            ),
            _ => Err(UpdateError::SecurityCheckFailed(result.detail())),
        }
    }
}

/// The update pipeline, in execution order.
#[must_use]
pub fn update_tasks() -> Vec<Box<dyn Task<UpdateError>>> {
    vec![
        Box::new(CommandStep {
            name: "Install auxiliary tools",
            program: "sudo",
            args: &["dnf", "install", "-y", "rpmconf", "dnf-plugins-core"],
            requires: None,
            fail: UpdateError::AuxToolsFailed,
        }),
        Box::new(CommandStep {
            name: "Refresh package cache",
            program: "sudo",
            args: &["dnf", "makecache", "--refresh"],
            requires: None,
            fail: UpdateError::RefreshFailed,
        }),
        Box::new(CommandStep {
            name: "Apply updates",
            program: "sudo",
            args: &["dnf", "upgrade", "-y"],
            requires: None,
            fail: UpdateError::UpgradeFailed,
        }),
        Box::new(CommandStep {
            name: "Reconcile config files",
            program: "sudo",
            args: &["rpmconf", "-a"],
            requires: Some("rpmconf"),
            fail: UpdateError::ReconcileFailed,
        }),
        Box::new(SecurityUpdates),
        Box::new(CommandStep {
            name: "Remove orphaned packages",
            program: "sudo",
            args: &["dnf", "autoremove", "-y"],
            requires: None,
            fail: UpdateError::AutoremoveFailed,
        }),
        Box::new(CommandStep {
            name: "Clean package cache",
            program: "sudo",
            args: &["dnf", "clean", "all"],
            requires: None,
            fail: UpdateError::CleanFailed,
        }),
        Box::new(CommandStep {
            name: "Update flatpak applications",
            program: "flatpak",
            args: &["update", "-y"],
            requires: Some("flatpak"),
            fail: UpdateError::FlatpakUpdateFailed,
        }),
        Box::new(CommandStep {
            name: "Remove unused flatpak runtimes",
            program: "flatpak",
            args: &["uninstall", "--unused", "-y"],
            requires: Some("flatpak"),
            fail: UpdateError::FlatpakCleanupFailed,
        }),
    ]
}
