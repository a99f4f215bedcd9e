// Shared helpers for integration tests.
//
// Provides a scripted executor and an in-memory logger so each integration
// test can drive a tool's `run` through the public API without touching the
// real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::process::Child;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use jtools::context::Context;
use jtools::exec::{ExecResult, Executor};
use jtools::logging::{Log, TaskStatus};

/// Executor that records every command and fails the ones it is told to.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    missing: HashSet<String>,
    failures: Vec<(String, i32)>,
    download_content: Option<String>,
    calls: Mutex<Vec<String>>,
    stdin: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    /// Every tool present, every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `program` as absent from `PATH`.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Exit with `code` for command lines containing `pattern`.
    pub fn fail(mut self, pattern: &str, code: i32) -> Self {
        self.failures.push((pattern.to_string(), code));
        self
    }

    /// Make a successful `scp` write `content` to its last argument.
    pub fn download(mut self, content: &str) -> Self {
        self.download_content = Some(content.to_string());
        self
    }

    /// Command lines issued so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Text fed to commands on standard input.
    pub fn stdin(&self) -> Vec<String> {
        self.stdin.lock().unwrap().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());
        if let Some((_, code)) = self.failures.iter().find(|(p, _)| line.contains(p.as_str())) {
            return ExecResult::exit(*code, "scripted failure");
        }
        if program == "scp"
            && let (Some(content), Some(dest)) = (&self.download_content, args.last())
            && !dest.contains(':')
        {
            std::fs::write(dest, content).expect("write download");
        }
        ExecResult::ok()
    }
}

impl Executor for ScriptedExecutor {
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

    fn run_with_stdin(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult> {
        self.stdin.lock().unwrap().push(input.to_string());
        self.run(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<i32> {
        Ok(self.record(program, args).code.unwrap_or(-1))
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<Child> {
        if !self.record(program, args).success {
            bail!("failed to launch: {program}");
        }
        Ok(std::process::Command::new("true").spawn()?)
    }

    fn which(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }
}

/// Logger that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
    tasks: Mutex<Vec<(String, TaskStatus)>>,
}

impl MemoryLog {
    /// Every logged line, prefixed with its level.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines logged with `info`.
    pub fn infos(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| l.strip_prefix("info: ").map(String::from))
            .collect()
    }

    /// Lines logged with `secret`.
    pub fn secrets(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| l.strip_prefix("secret: ").map(String::from))
            .collect()
    }

    /// Recorded step outcomes.
    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks.lock().unwrap().clone()
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines.lock().unwrap().push(format!("{level}: {msg}"));
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn secret(&self, msg: &str) {
        self.push("secret", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.tasks.lock().unwrap().push((name.to_string(), status));
    }
}

/// A [`Context`] over `executor`, plus handles to inspect it afterwards.
pub fn context(
    executor: ScriptedExecutor,
    dry_run: bool,
) -> (Context, Arc<ScriptedExecutor>, Arc<MemoryLog>) {
    let executor = Arc::new(executor);
    let log = Arc::new(MemoryLog::default());
    let ctx = Context::new(
        Arc::clone(&log) as Arc<dyn Log>,
        Arc::clone(&executor) as Arc<dyn Executor>,
        dry_run,
    );
    (ctx, executor, log)
}
