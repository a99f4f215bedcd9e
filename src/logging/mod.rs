//! Console and file logging on top of `tracing`.
//!
//! Tools report through the [`Log`] trait. [`Logger`] turns each call into a
//! `tracing` event; the subscriber from [`init_subscriber`] prints it and
//! appends it to `$XDG_CACHE_HOME/jtools/<command>.log`. Lines sent with
//! [`Log::secret`] reach the console only.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, TaskEntry, TaskStatus};

/// Target of stage headers.
const STAGE: &str = "jtools::stage";
/// Target of dry-run previews.
const DRY_RUN: &str = "jtools::dry_run";
/// Target of console-only lines; the file layer withholds their text.
const SECRET: &str = "jtools::secret";

/// A [`Logger`] wired to a log file in a temporary directory for as long as
/// the value lives on the current thread.
#[cfg(test)]
pub(crate) struct Capture {
    pub(crate) logger: std::sync::Arc<Logger>,
    path: std::path::PathBuf,
    _dir: tempfile::TempDir,
    _guard: tracing::dispatcher::DefaultGuard,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl Capture {
    pub(crate) fn new(command: &str) -> Self {
        use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(format!("{command}.log"));
        let layer = subscriber::FileLayer::open(&path, command).expect("open log file");
        let subscriber = tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG));
        let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
        Self {
            logger: std::sync::Arc::new(Logger::with_log_file(command, Some(path.clone()))),
            path,
            _dir: dir,
            _guard: guard,
        }
    }

    /// Everything written to the log file so far.
    pub(crate) fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read log file")
    }
}
