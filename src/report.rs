//! The process boundary: turn a tool's result into an exit status.
use std::process::ExitCode;

use crate::error::Failure;
use crate::logging::{Log, Logger, init_subscriber};

/// Format the `error[<code>]: <message>` line for `err`.
#[must_use]
pub fn error_line<E: Failure>(err: &E) -> String {
    format!("error[{}]: {err}", err.code())
}

/// Report the outcome of a run and return the process exit status.
///
/// `Ok` maps to success; `Err` is written to the error stream as
/// `error[<code>]: <message>` and becomes exit status `<code>`.
pub fn finish<E: Failure>(result: Result<(), E>, log: &dyn Log) -> ExitCode {
    ExitCode::from(status(&result, log))
}

/// Log a failed result and return its numeric exit status (`0` on success).
pub fn status<E: Failure>(result: &Result<(), E>, log: &dyn Log) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log.error(&error_line(e));
            e.code()
        }
    }
}

/// Turn a clap parse error into the tool's usage failure.
///
/// Help and version requests print and exit normally; any other parse error
/// is handed to `usage` so it is reported with the tool's code 1.
pub fn usage_error<E>(err: &clap::Error, usage: impl FnOnce(String) -> E) -> Result<E, ExitCode> {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            Err(ExitCode::SUCCESS)
        }
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let message = first.trim_start_matches("error: ").to_string();
            Ok(usage(message))
        }
    }
}

/// Parse the process arguments into `P`.
///
/// On a usage error the `error[1]: …` line is reported for `command` and the
/// exit status comes back as `Err`; `--help` and `--version` exit with
/// success.
///
/// # Errors
///
/// Returns the exit status to end the process with when parsing does not
/// yield options.
pub fn parse_args<P: clap::Parser, E: Failure>(
    command: &str,
    usage: impl FnOnce(String) -> E,
) -> Result<P, ExitCode> {
    P::try_parse().map_err(|err| match usage_error(&err, usage) {
        Ok(failure) => {
            init_subscriber(false, command);
            finish(Err::<(), E>(failure), &Logger::new(command))
        }
        Err(code) => code,
    })
}
