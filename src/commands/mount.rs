//! `jmount`: mount every configured rclone remote in the background.
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::cli::MountCli;
use crate::config::MountConfig;
use crate::context::Context;
use crate::dispatch;
use crate::error::MountError;
use crate::mount::{self, MountHandle, Mounts, Supervision};

/// How often `--wait` polls the mount processes.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run `jmount` against the live mount table.
///
/// # Errors
///
/// See [`run_with`].
pub fn run(opts: &MountCli, ctx: &Context, stop: &AtomicBool) -> Result<(), MountError> {
    let table = std::fs::read_to_string(mount::MOUNT_TABLE).unwrap_or_default();
    run_with(opts, ctx, stop, &table)
}

/// Run `jmount`, treating `table` as the current mount table.
///
/// Launched mounts are detached unless `--wait` is given, in which case this
/// blocks until they exit or `stop` is raised (then they are unmounted).
///
/// # Errors
///
/// Returns the [`MountError`] of the first precondition or launch that fails.
/// Mounts launched before a failure keep running.
pub fn run_with(
    opts: &MountCli,
    ctx: &Context,
    stop: &AtomicBool,
    table: &str,
) -> Result<(), MountError> {
    dispatch::require_tools(
        &*ctx.executor,
        [("rclone".to_string(), MountError::MissingRclone)],
    )?;
    let path = opts.config.clone().unwrap_or_else(MountConfig::default_path);
    let config = MountConfig::load(&path, &*ctx.log)?;
    if config.remotes.is_empty() {
        return Err(MountError::NoRemotes);
    }

    let mut mounts = Mounts::new();
    for remote in &config.remotes {
        let dir = config.mountpoint_for(remote);
        if mount::is_mounted(table, &dir) {
            ctx.log
                .info(&format!("{remote} already mounted at {}", dir.display()));
            continue;
        }
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would mount {remote} at {} ({})",
                dir.display(),
                config.rclone_flags.join(" ")
            ));
            continue;
        }
        match launch(ctx, &config, remote, &dir) {
            Ok(handle) => mounts.push(handle),
            Err(e) => {
                let _ = mounts.detach();
                return Err(e);
            }
        }
        ctx.log.info(&format!("mounted {remote} at {}", dir.display()));
    }

    if !opts.wait {
        let released = mounts.detach();
        ctx.log.debug(&format!("{released} mount(s) left running"));
        return Ok(());
    }
    if mounts.is_empty() {
        return Ok(());
    }

    ctx.log.info("waiting for mounts; press Ctrl-C to unmount");
    match mounts.supervise(stop, &*ctx.executor, POLL_INTERVAL) {
        Ok(Supervision::Finished) => ctx.log.info("all mounts exited"),
        Ok(Supervision::Cancelled) => ctx.log.info("unmounted"),
        Err(e) => ctx.log.warn(&format!("lost track of mounts: {e}")),
    }
    Ok(())
}

fn launch(
    ctx: &Context,
    config: &MountConfig,
    remote: &str,
    dir: &Path,
) -> Result<MountHandle, MountError> {
    std::fs::create_dir_all(dir).map_err(|source| MountError::MountpointFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let dir_arg = dir.to_string_lossy().into_owned();
    let mut args = vec!["mount", remote, dir_arg.as_str()];
    args.extend(config.rclone_flags.iter().map(String::as_str));
    let child = ctx
        .executor
        .spawn_detached("rclone", &args)
        .map_err(|e| MountError::LaunchFailed {
            remote: remote.to_string(),
            detail: format!("{e:#}"),
        })?;
    Ok(MountHandle::new(remote.to_string(), dir.to_path_buf(), child))
}
