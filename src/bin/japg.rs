//! `japg`: passphrase generator.
use std::process::ExitCode;
use std::sync::Arc;

use jtools::cli::PassphraseCli;
use jtools::context::Context;
use jtools::error::PassphraseError;
use jtools::logging::{Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: PassphraseCli = match report::parse_args("japg", PassphraseError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "japg");
    let log = Arc::new(Logger::new("japg"));
    let ctx = Context::system(Arc::clone(&log), false);
    report::finish(commands::passphrase::run(&opts, &ctx), &*log)
}
