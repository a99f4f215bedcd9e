//! `jcp`: remote edit round-trip.
use std::process::ExitCode;
use std::sync::Arc;

use jtools::cli::CopyCli;
use jtools::context::Context;
use jtools::error::CopyError;
use jtools::logging::{Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: CopyCli = match report::parse_args("jcp", CopyError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "jcp");
    let log = Arc::new(Logger::new("jcp"));
    let ctx = Context::system(Arc::clone(&log), false);
    report::finish(commands::copy::run(&opts, &ctx), &*log)
}
