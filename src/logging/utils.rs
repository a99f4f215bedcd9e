//! Log file location, timestamps and ANSI stripping.
use std::path::PathBuf;

/// `$XDG_CACHE_HOME/jtools`, or `~/.cache/jtools` when it is unset.
fn log_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| crate::config::home_dir().map(|home| home.join(".cache")))
        .map(|base| base.join("jtools"))
}

/// Log file of `command`: `<log dir>/<command>.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time in a `chrono` format.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Remove ANSI escapes: CSI sequences (`ESC [ … final`) whole, any other
/// escape together with the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('\x1b') {
        out.push_str(rest.get(..pos).unwrap_or_default());
        let after = rest.get(pos + 1..).unwrap_or_default();
        rest = if let Some(csi) = after.strip_prefix('[') {
            csi.find(|c: char| ('@'..='~').contains(&c))
                .and_then(|end| csi.get(end + 1..))
                .unwrap_or_default()
        } else {
            let mut chars = after.chars();
            chars.next();
            chars.as_str()
        };
    }
    out.push_str(rest);
    out
}
