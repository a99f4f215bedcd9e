//! Mode-flag dispatch shared by the flag-driven tools (`jcp`, `jdc`).
//!
//! A tool declares its vocabulary as a table of `(flag, mode)` pairs. The
//! arguments left over after clap has taken the ambient options are matched
//! against it, and then every external tool the chosen mode needs is checked
//! before any action runs.
use crate::exec::Executor;

/// Map the mode-flag arguments onto a mode.
///
/// Every argument must exactly equal one flag in `vocabulary`. When several
/// flags are given the last one wins. Returns `Ok(None)` when no flag is
/// present, so the caller can apply its default.
///
/// # Errors
///
/// Returns the first argument that is not in the vocabulary.
pub fn parse_mode<M: Copy>(args: &[String], vocabulary: &[(&str, M)]) -> Result<Option<M>, String> {
    let mut mode = None;
    for arg in args {
        let Some((_, m)) = vocabulary.iter().find(|(flag, _)| flag == arg) else {
            return Err(arg.clone());
        };
        mode = Some(*m);
    }
    Ok(mode)
}

/// Check that every program in `tools` is on `PATH`.
///
/// Tools are checked in order and the error of the first missing one is
/// returned.
///
/// # Errors
///
/// Returns the error paired with the first missing program.
pub fn require_tools<E>(
    executor: &dyn Executor,
    tools: impl IntoIterator<Item = (String, E)>,
) -> Result<(), E> {
    for (program, err) in tools {
        if !executor.which(&program) {
            return Err(err);
        }
    }
    Ok(())
}
