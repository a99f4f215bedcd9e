//! `jau`: system update pipeline.
use std::process::ExitCode;
use std::sync::Arc;

use jtools::cli::UpdateCli;
use jtools::context::Context;
use jtools::error::UpdateError;
use jtools::logging::{Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: UpdateCli = match report::parse_args("jau", UpdateError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "jau");
    let log = Arc::new(Logger::new("jau"));
    let ctx = Context::system(Arc::clone(&log), opts.dry_run);
    let result = commands::update::run(&ctx);
    log.print_summary();
    report::finish(result, &*log)
}
