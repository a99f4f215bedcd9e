//! `jdc`: Docker Compose helper.
use std::process::ExitCode;
use std::sync::Arc;

use jtools::cli::DeployCli;
use jtools::context::Context;
use jtools::error::DeployError;
use jtools::logging::{Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: DeployCli = match report::parse_args("jdc", DeployError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "jdc");
    let log = Arc::new(Logger::new("jdc"));
    let ctx = Context::system(Arc::clone(&log), false);
    report::finish(commands::deploy::run(&opts, &ctx), &*log)
}
