//! `jdc`: bring a Docker Compose project up or down.
use std::path::{Path, PathBuf};

use crate::cli::DeployCli;
use crate::context::Context;
use crate::dispatch;
use crate::error::DeployError;

/// Compose file names, in lookup order.
pub const COMPOSE_FILES: &[&str] = &[
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// What a `jdc` invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Start the project in the background.
    Up,
    /// Stop and remove the project's containers.
    Down,
    /// Down, then up.
    Restart,
    /// Pull newer images, then up.
    Pull,
}

/// Flag vocabulary.
pub const VOCABULARY: &[(&str, Mode)] = &[
    ("-u", Mode::Up),
    ("-d", Mode::Down),
    ("-r", Mode::Restart),
    ("-p", Mode::Pull),
];

/// First compose file present in `dir`.
#[must_use]
pub fn find_compose_file(dir: &Path) -> Option<PathBuf> {
    COMPOSE_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Run `jdc`.
///
/// # Errors
///
/// Returns the [`DeployError`] of the first precondition or compose command
/// that fails.
pub fn run(opts: &DeployCli, ctx: &Context) -> Result<(), DeployError> {
    let mode = dispatch::parse_mode(&opts.flags, VOCABULARY)
        .map_err(DeployError::UnknownOption)?
        .unwrap_or(Mode::Up);

    dispatch::require_tools(
        &*ctx.executor,
        [("docker".to_string(), DeployError::MissingDocker)],
    )?;
    ctx.executor
        .run("docker", &["compose", "version"])
        .map_err(|e| DeployError::MissingComposePlugin(format!("{e:#}")))?;

    let dir = opts
        .dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = dunce::canonicalize(&dir).unwrap_or(dir);
    let file = find_compose_file(&dir).ok_or_else(|| DeployError::ComposeFileMissing(dir.clone()))?;
    ctx.log.debug(&format!("compose file: {}", file.display()));

    let project = Project { ctx, file: &file };
    match mode {
        Mode::Up => project.up(),
        Mode::Down => project.down(),
        Mode::Restart => {
            project.down()?;
            project.up()
        }
        Mode::Pull => {
            project.pull()?;
            project.up()
        }
    }
}

struct Project<'a> {
    ctx: &'a Context,
    file: &'a Path,
}

impl Project<'_> {
    fn compose(&self, args: &[&str], fail: fn(String) -> DeployError) -> Result<(), DeployError> {
        let file = self.file.to_string_lossy();
        let mut full = vec!["compose", "-f", file.as_ref()];
        full.extend_from_slice(args);
        self.ctx.log.stage(&format!("docker compose {}", args.join(" ")));
        match self.ctx.executor.run_interactive("docker", &full) {
            Ok(0) => Ok(()),
            Ok(status) => Err(fail(format!("exit {status}"))),
            Err(e) => Err(fail(format!("{e:#}"))),
        }
    }

    fn up(&self) -> Result<(), DeployError> {
        self.compose(&["up", "-d"], DeployError::UpFailed)?;
        self.ctx
            .log
            .info(&format!("started {}", self.file.display()));
        Ok(())
    }

    fn down(&self) -> Result<(), DeployError> {
        self.compose(&["down"], DeployError::DownFailed)?;
        self.ctx
            .log
            .info(&format!("stopped {}", self.file.display()));
        Ok(())
    }

    fn pull(&self) -> Result<(), DeployError> {
        self.compose(&["pull"], DeployError::PullFailed)
    }
}
