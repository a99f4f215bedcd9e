//! The `tracing` subscriber: a plain console format and the log file layer.
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{log_file_path, strip_ansi, utc_now};
use super::{DRY_RUN, SECRET, STAGE};

/// How an event is presented, from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Secret,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE) => Self::Stage,
            (Level::INFO, DRY_RUN) => Self::DryRun,
            (Level::INFO, SECRET) => Self::Secret,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Tag in front of the message in the log file.
    const fn file_tag(self) -> Option<&'static str> {
        match self {
            Self::Stage => Some("==>"),
            Self::DryRun => Some("[dry run]"),
            Self::Debug => Some("[debug]"),
            Self::Warn => Some("[warn]"),
            Self::Error => Some("[error]"),
            Self::Secret | Self::Info => None,
        }
    }
}

/// The formatted `message` field of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            write!(self.0, "{value:?}").ok();
        }
    }
}

impl Message {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut message = Self::default();
        event.record(&mut message);
        message.0
    }
}

/// Appends every event at `DEBUG` and above to a log file, timestamped and
/// without colour. The text of [`Log::secret`](super::Log::secret) lines is
/// replaced by a marker.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Layer writing the default log file of `command`, or `None` when the
    /// file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::open(&log_file_path(command)?, command).ok()
    }

    /// Truncate `path` and start it with a header naming the run.
    pub(super) fn open(path: &Path, command: &str) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        writeln!(
            file,
            "# {command} (jtools {}) started {}",
            crate::cli::VERSION,
            utc_now("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let kind = Kind::of(event.metadata());
        let text = if kind == Kind::Secret {
            "[secret withheld]".to_string()
        } else {
            strip_ansi(&Message::of(event))
        };
        let ts = utc_now("%H:%M:%S");
        let line = match kind.file_tag() {
            Some(tag) => format!("{ts} {tag} {text}"),
            None => format!("{ts} {text}"),
        };
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console format: messages as plain lines, stage headers and warnings
/// coloured, errors verbatim since they carry their own `error[<code>]:`.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = Message::of(event);
        match Kind::of(event.metadata()) {
            Kind::Error | Kind::Info | Kind::Secret => writeln!(writer, "{msg}"),
            Kind::Warn => writeln!(writer, "\x1b[33mwarning:\x1b[0m {msg}"),
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "\x1b[33m[dry run]\x1b[0m {msg}"),
            Kind::Debug => writeln!(writer, "\x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for `command`. Call once, first thing in
/// `main`.
///
/// The console gets `INFO` and above (`DEBUG` with `verbose`): warnings
/// and errors on stderr, the rest on stdout. The log file always gets
/// `DEBUG` and above. A log file that cannot be created is skipped.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = io::stderr
        .with_max_level(Level::WARN)
        .and(io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormat)
                .with_writer(make_writer)
                .with_filter(console_level),
        )
        .with(FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();
}
