//! `jcp`: round-trip a file between this machine and a remote host.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::cli::CopyCli;
use crate::config::CopyConfig;
use crate::context::Context;
use crate::dispatch;
use crate::error::CopyError;
use crate::exec::shell_quote;

/// What a `jcp` invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fetch the remote file, then open it in the editor.
    EditCycle,
    /// Fetch the remote file.
    Download,
    /// Back up the remote file, then replace it with the local copy.
    Upload,
    /// Upload, then recreate the remote service.
    UploadRestart,
    /// Stop the remote service, upload, start it again.
    Redeploy,
}

/// Flag vocabulary, in the order shown in the help text.
pub const VOCABULARY: &[(&str, Mode)] = &[
    ("-d", Mode::Download),
    ("-u", Mode::Upload),
    ("-uc", Mode::UploadRestart),
    ("-ur", Mode::Redeploy),
];

impl Mode {
    /// Resolve the mode flags; no flag means the edit cycle.
    ///
    /// # Errors
    ///
    /// [`CopyError::UnknownOption`] for any argument outside [`VOCABULARY`].
    pub fn from_flags(flags: &[String]) -> Result<Self, CopyError> {
        dispatch::parse_mode(flags, VOCABULARY)
            .map(|m| m.unwrap_or(Self::EditCycle))
            .map_err(CopyError::UnknownOption)
    }

    /// External programs this mode needs, in check order.
    fn required_tools(self, config: &CopyConfig) -> Vec<(String, CopyError)> {
        let scp = ("scp".to_string(), CopyError::MissingScp);
        let ssh = ("ssh".to_string(), CopyError::MissingSsh);
        match self {
            Self::Download => vec![scp],
            Self::Upload | Self::UploadRestart | Self::Redeploy => vec![scp, ssh],
            Self::EditCycle => {
                let (editor, _) = config.editor_command();
                vec![scp, (editor.clone(), CopyError::MissingEditor(editor))]
            }
        }
    }
}

/// Run `jcp`.
///
/// # Errors
///
/// Returns the [`CopyError`] of the first precondition or action that fails.
pub fn run(opts: &CopyCli, ctx: &Context) -> Result<(), CopyError> {
    let mode = Mode::from_flags(&opts.flags)?;
    let path = opts.config.clone().unwrap_or_else(CopyConfig::default_path);
    let config = CopyConfig::load(&path, &*ctx.log)?;
    ctx.log.debug(&format!("mode: {mode:?}"));

    dispatch::require_tools(&*ctx.executor, mode.required_tools(&config))?;

    match mode {
        Mode::EditCycle => {
            download(ctx, &config)?;
            edit(ctx, &config)
        }
        Mode::Download => download(ctx, &config),
        Mode::Upload => upload(ctx, &config),
        Mode::UploadRestart => upload_restart(ctx, &config),
        Mode::Redeploy => redeploy(ctx, &config),
    }
}

fn partial_path(local: &Path) -> PathBuf {
    let mut name = OsString::from(local.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Copy the remote file over the local path.
///
/// The file is fetched to a `.part` sibling first and only renamed into place
/// once complete, so a failed transfer leaves the local path as it was.
///
/// # Errors
///
/// [`CopyError::MissingSetting`] without a host, [`CopyError::DownloadFailed`]
/// if the transfer or the final rename fails.
pub fn download(ctx: &Context, config: &CopyConfig) -> Result<(), CopyError> {
    config.require_host()?;
    let remote = config.remote_target();
    let part = partial_path(&config.local_path);
    let part_arg = part.to_string_lossy().into_owned();

    let failed = |detail: String| {
        let _ = std::fs::remove_file(&part);
        CopyError::DownloadFailed {
            remote: remote.clone(),
            detail,
        }
    };

    ctx.log.debug(&format!("scp -q {remote} {part_arg}"));
    ctx.executor
        .run("scp", &["-q", &remote, &part_arg])
        .map_err(|e| failed(format!("{e:#}")))?;
    std::fs::rename(&part, &config.local_path).map_err(|e| failed(e.to_string()))?;

    ctx.log.info(&format!(
        "downloaded {remote} to {}",
        config.local_path.display()
    ));
    Ok(())
}

/// Back up the remote file next to itself, then copy the local file over it.
///
/// # Errors
///
/// [`CopyError::LocalFileMissing`] before any network call,
/// [`CopyError::BackupFailed`] (the copy is then skipped), or
/// [`CopyError::UploadFailed`].
pub fn upload(ctx: &Context, config: &CopyConfig) -> Result<(), CopyError> {
    if !config.local_path.is_file() {
        return Err(CopyError::LocalFileMissing(config.local_path.clone()));
    }
    config.require_host()?;

    let backup = config.backup_path();
    let remote_path = shell_quote(&config.remote_path);
    let backup_quoted = shell_quote(&backup);
    ctx.executor
        .run(
            "ssh",
            &[
                config.remote_host.as_str(),
                "cp",
                "-p",
                "--",
                &remote_path,
                &backup_quoted,
            ],
        )
        .map_err(|e| CopyError::BackupFailed {
            path: config.remote_path.clone(),
            detail: format!("{e:#}"),
        })?;
    ctx.log.debug(&format!("backed up {} to {backup}", config.remote_path));

    let remote = config.remote_target();
    let local = config.local_path.to_string_lossy().into_owned();
    ctx.executor
        .run("scp", &["-q", &local, &remote])
        .map_err(|e| CopyError::UploadFailed {
            remote: remote.clone(),
            detail: format!("{e:#}"),
        })?;

    ctx.log.info(&format!("uploaded {local} to {remote}"));
    Ok(())
}

/// Open the local file in the configured editor and wait for it to exit.
///
/// # Errors
///
/// [`CopyError::EditorFailed`] if the editor cannot start or exits non-zero.
pub fn edit(ctx: &Context, config: &CopyConfig) -> Result<(), CopyError> {
    let (program, mut args) = config.editor_command();
    args.push(config.local_path.to_string_lossy().into_owned());
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    let status = ctx
        .executor
        .run_interactive(&program, &arg_refs)
        .map_err(|e| {
            ctx.log.debug(&format!("{e:#}"));
            CopyError::EditorFailed {
                editor: program.clone(),
                status: -1,
            }
        })?;
    if status != 0 {
        return Err(CopyError::EditorFailed {
            editor: program,
            status,
        });
    }
    ctx.log.info(&format!("edited {}", config.local_path.display()));
    Ok(())
}

/// Run `docker compose -f <remote path> <args…>` on the remote host.
fn remote_compose(ctx: &Context, config: &CopyConfig, args: &[&str]) -> anyhow::Result<()> {
    let file = shell_quote(&config.remote_path);
    let mut full = vec![config.remote_host.as_str(), "docker", "compose", "-f", file.as_str()];
    full.extend_from_slice(args);
    ctx.executor.run("ssh", &full)?;
    Ok(())
}

/// Upload, then recreate the remote service from the new file.
///
/// # Errors
///
/// Any [`upload`] error, or [`CopyError::RemoteRestartFailed`].
pub fn upload_restart(ctx: &Context, config: &CopyConfig) -> Result<(), CopyError> {
    upload(ctx, config)?;
    remote_compose(ctx, config, &["up", "-d", "--force-recreate"]).map_err(|e| {
        CopyError::RemoteRestartFailed {
            host: config.remote_host.clone(),
            detail: format!("{e:#}"),
        }
    })?;
    ctx.log
        .info(&format!("restarted service on {}", config.remote_host));
    Ok(())
}

/// Stop the remote service, upload, then start it again.
///
/// Steps run strictly in order with no rollback: a failed stop skips the
/// upload and start, a failed upload leaves the service stopped.
///
/// # Errors
///
/// [`CopyError::RemoteStopFailed`], any [`upload`] error, or
/// [`CopyError::RemoteStartFailed`].
pub fn redeploy(ctx: &Context, config: &CopyConfig) -> Result<(), CopyError> {
    if !config.local_path.is_file() {
        return Err(CopyError::LocalFileMissing(config.local_path.clone()));
    }
    config.require_host()?;
    let host = config.remote_host.clone();

    remote_compose(ctx, config, &["down"]).map_err(|e| CopyError::RemoteStopFailed {
        host: host.clone(),
        detail: format!("{e:#}"),
    })?;
    ctx.log.info(&format!("stopped service on {host}"));

    upload(ctx, config)?;

    remote_compose(ctx, config, &["up", "-d"]).map_err(|e| CopyError::RemoteStartFailed {
        host: host.clone(),
        detail: format!("{e:#}"),
    })?;
    ctx.log.info(&format!("started service on {host}"));
    Ok(())
}
