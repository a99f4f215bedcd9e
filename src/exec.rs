//! External process execution behind an injectable [`Executor`].
use anyhow::{Context, Result, bail};
use std::io::Write as _;
use std::process::{Child, Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// A successful result with empty output.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }

    /// A result with the given exit code and standard error text.
    #[must_use]
    pub fn exit(code: i32, stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: code == 0,
            code: Some(code),
        }
    }

    /// Short human-readable failure detail: stderr if present, else the exit code.
    #[must_use]
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit {}", self.code.unwrap_or(-1))
        } else {
            stderr.to_string()
        }
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Every action reaches external tools through this trait so that tests can
/// replace the system with a scripted fake.
pub trait Executor: Send + Sync {
    /// Run a command and capture its output, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command and capture its output without judging the exit code.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command feeding `input` on its standard input.
    ///
    /// Standard output is discarded and standard error goes to the terminal;
    /// the call returns once the program itself exits, even if it leaves a
    /// background process behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned, the input cannot be
    /// written, or the program exits non-zero.
    fn run_with_stdin(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult>;

    /// Run a command attached to the current terminal and wait for it.
    ///
    /// Returns the exit code (`-1` when terminated by a signal).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<i32>;

    /// Start a command in the background with null stdio and return its handle
    /// without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<Child>;

    /// Check whether `program` resolves on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and bail on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_with_stdin(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult> {
        // Clipboard tools fork a server that keeps any inherited pipe open,
        // so nothing is read back from the child.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to execute: {program}"))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .with_context(|| format!("failed to write stdin of {program}"))?;
        }
        let status = child
            .wait()
            .with_context(|| format!("failed to wait for {program}"))?;
        if !status.success() {
            bail!("{program} failed (exit {})", status.code().unwrap_or(-1));
        }
        Ok(ExecResult {
            code: status.code(),
            success: true,
            ..ExecResult::default()
        })
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<i32> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.code().unwrap_or(-1))
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<Child> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch: {program}"))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Quote `s` for a POSIX shell so it survives the remote side of `ssh`.
///
/// Strings made only of safe characters are returned unchanged.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '/' | '.' | '_' | '-' | '~' | ':' | '@' | '+' | '=')
        });
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
