//! Configuration loading: assignment files and the install manifest.
//!
//! Each tool turns its file into an immutable value object at start-up and
//! passes it by reference to every action.
pub mod copy;
pub mod keyvalue;
pub mod manifest;
pub mod mount;

use std::path::{Path, PathBuf};

pub use copy::CopyConfig;
pub use mount::MountConfig;

/// Directory holding the installed configuration files.
pub const CONFIG_DIR: &str = "/etc/jtools";

/// The invoking user's home directory, from `$HOME`.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~` or `~/` against `home`.
///
/// Any other value, or a missing home directory, is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use jtools::config::expand_tilde;
///
/// let home = Path::new("/home/me");
/// assert_eq!(expand_tilde("~/Cloud", Some(home)), PathBuf::from("/home/me/Cloud"));
/// assert_eq!(expand_tilde("/srv/x", Some(home)), PathBuf::from("/srv/x"));
/// ```
#[must_use]
pub fn expand_tilde(value: &str, home: Option<&Path>) -> PathBuf {
    match (value, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (v, Some(home)) if v.starts_with("~/") => home.join(v.get(2..).unwrap_or_default()),
        (v, _) => PathBuf::from(v),
    }
}
