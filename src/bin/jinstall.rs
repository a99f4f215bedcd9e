//! `jinstall`: installer for the other tools.
use std::process::ExitCode;
use std::sync::Arc;

use jtools::cli::{InstallCli, VERSION};
use jtools::context::Context;
use jtools::error::InstallError;
use jtools::logging::{Log as _, Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: InstallCli = match report::parse_args("jinstall", InstallError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "jinstall");
    let log = Arc::new(Logger::new("jinstall"));
    log.info(&format!("jtools {VERSION}"));

    let ctx = Context::system(Arc::clone(&log), opts.dry_run);
    let result = commands::install::run(&opts, &ctx);
    log.print_summary();
    report::finish(result, &*log)
}
