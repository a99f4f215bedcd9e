//! Shared fakes for unit tests.
//!
//! [`FakeExecutor`] records every command issued and replays scripted
//! results; [`RecordingLog`] captures log output so tests can assert on what
//! a command reported.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::process::Child;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use crate::context::Context;
use crate::exec::{ExecResult, Executor};
use crate::logging::{Log, TaskStatus};

type Effect = Box<dyn Fn(&[&str]) + Send + Sync>;

/// Scripted [`Executor`] that never touches the real system, apart from
/// spawning a harmless `sleep`/`true` for background launches.
#[derive(Default)]
pub struct FakeExecutor {
    missing: HashSet<String>,
    responses: Vec<(String, ExecResult)>,
    spawn_failures: Vec<String>,
    effects: Vec<(String, Effect)>,
    long_running: bool,
    calls: Mutex<Vec<String>>,
}

impl std::fmt::Debug for FakeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeExecutor")
            .field("missing", &self.missing)
            .field("responses", &self.responses)
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}

impl FakeExecutor {
    /// Every tool present, every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `which(program)` return `false`.
    #[must_use]
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Reply with `result` to any command line containing `pattern`.
    ///
    /// The first matching rule wins.
    #[must_use]
    pub fn respond(mut self, pattern: &str, result: ExecResult) -> Self {
        self.responses.push((pattern.to_string(), result));
        self
    }

    /// Fail any command line containing `pattern` with `code`.
    #[must_use]
    pub fn fail(self, pattern: &str, code: i32) -> Self {
        self.respond(pattern, ExecResult::exit(code, "simulated failure"))
    }

    /// Refuse to spawn background commands containing `pattern`.
    #[must_use]
    pub fn fail_spawn(mut self, pattern: &str) -> Self {
        self.spawn_failures.push(pattern.to_string());
        self
    }

    /// Run `effect` with the argument list whenever a command containing
    /// `pattern` succeeds.
    #[must_use]
    pub fn on_call(mut self, pattern: &str, effect: impl Fn(&[&str]) + Send + Sync + 'static) -> Self {
        self.effects.push((pattern.to_string(), Box::new(effect)));
        self
    }

    /// Background launches stay alive (`sleep 30`) until killed.
    #[must_use]
    pub const fn long_running(mut self) -> Self {
        self.long_running = true;
        self
    }

    /// Every command line issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any issued command line contains `pattern`.
    pub fn called(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());
        let result = self
            .responses
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map_or_else(ExecResult::ok, |(_, r)| r.clone());
        if result.success {
            for (pattern, effect) in &self.effects {
                if line.contains(pattern.as_str()) {
                    effect(args);
                }
            }
        }
        result
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.record(program, args);
        if !result.success {
            bail!("{program} failed ({})", result.detail());
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn run_with_stdin(&self, program: &str, args: &[&str], _input: &str) -> Result<ExecResult> {
        self.run(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<i32> {
        Ok(self.record(program, args).code.unwrap_or(-1))
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<Child> {
        let result = self.record(program, args);
        let line = self.calls().last().cloned().unwrap_or_default();
        if !result.success || self.spawn_failures.iter().any(|p| line.contains(p.as_str())) {
            bail!("failed to launch: {program}");
        }
        let child = if self.long_running {
            std::process::Command::new("sleep").arg("30").spawn()?
        } else {
            std::process::Command::new("true").spawn()?
        };
        Ok(child)
    }

    fn which(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }
}

/// Level tag for a captured log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `stage`
    Stage,
    /// `info`
    Info,
    /// `secret`
    Secret,
    /// `debug`
    Debug,
    /// `warn`
    Warn,
    /// `error`
    Error,
    /// `dry_run`
    DryRun,
}

/// [`Log`] implementation that keeps everything in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(Level, String)>>,
    tasks: Mutex<Vec<(String, TaskStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }

    /// Messages logged at `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Messages logged with `info`.
    pub fn infos(&self) -> Vec<String> {
        self.at(Level::Info)
    }

    /// Messages logged with `error`.
    pub fn errors(&self) -> Vec<String> {
        self.at(Level::Error)
    }

    /// Recorded step results.
    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks.lock().unwrap().clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }
    fn secret(&self, msg: &str) {
        self.push(Level::Secret, msg);
    }
    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }
    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push(Level::DryRun, msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.tasks.lock().unwrap().push((name.to_string(), status));
    }
}

/// Build a [`Context`] over `executor`, returning handles to both fakes.
pub fn make_context(executor: FakeExecutor) -> (Context, Arc<FakeExecutor>, Arc<RecordingLog>) {
    make_context_with(executor, false)
}

/// Like [`make_context`], with an explicit dry-run flag.
pub fn make_context_with(
    executor: FakeExecutor,
    dry_run: bool,
) -> (Context, Arc<FakeExecutor>, Arc<RecordingLog>) {
    let executor = Arc::new(executor);
    let log = Arc::new(RecordingLog::default());
    let ctx = Context::new(
        Arc::clone(&log) as Arc<dyn Log>,
        Arc::clone(&executor) as Arc<dyn Executor>,
        dry_run,
    );
    (ctx, executor, log)
}
