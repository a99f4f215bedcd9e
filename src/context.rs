//! Per-invocation context shared by every command.
use std::sync::Arc;

use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};

/// Shared context for a single tool invocation.
pub struct Context {
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Command executor (system or test fake).
    pub executor: Arc<dyn Executor>,
    /// Preview commands instead of running them.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a context from explicit parts.
    #[must_use]
    pub fn new(log: Arc<dyn Log>, executor: Arc<dyn Executor>, dry_run: bool) -> Self {
        Self {
            log,
            executor,
            dry_run,
        }
    }

    /// Context for a real run: the given logger and the system executor.
    #[must_use]
    pub fn system(log: Arc<Logger>, dry_run: bool) -> Self {
        Self::new(log, Arc::new(SystemExecutor), dry_run)
    }
}
