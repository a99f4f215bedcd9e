//! `jmount`: rclone mount wrapper.
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use jtools::cli::MountCli;
use jtools::context::Context;
use jtools::error::MountError;
use jtools::logging::{Log as _, Logger, init_subscriber};
use jtools::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let opts: MountCli = match report::parse_args("jmount", MountError::UnknownOption) {
        Ok(opts) => opts,
        Err(code) => return code,
    };
    init_subscriber(opts.verbose, "jmount");
    let log = Arc::new(Logger::new("jmount"));

    let stop = Arc::new(AtomicBool::new(false));
    if opts.wait {
        let flag = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            log.warn(&format!("cannot handle Ctrl-C, mounts will not be unmounted: {e}"));
        }
    }

    let ctx = Context::system(Arc::clone(&log), opts.dry_run);
    report::finish(commands::mount::run(&opts, &ctx, &stop), &*log)
}
