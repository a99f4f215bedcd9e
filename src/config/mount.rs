//! Settings for the cloud-storage mount wrapper (`jmount`).
use std::path::{Path, PathBuf};

use super::keyvalue::{self, Assignment};
use super::{CONFIG_DIR, expand_tilde, home_dir};
use crate::error::MountError;
use crate::logging::Log;

const DEFAULT_REMOTES: &str = "gdrive: onedrive:";
const DEFAULT_FLAGS: &str = "--vfs-cache-mode writes";

/// Immutable settings for one `jmount` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Directory under which each remote gets its own mount point.
    pub mount_root: PathBuf,
    /// rclone remotes to mount (`name:` or `name:path`).
    pub remotes: Vec<String>,
    /// Extra flags passed to every `rclone mount`.
    pub rclone_flags: Vec<String>,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self::with_home(home_dir().as_deref())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl MountConfig {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Path::new(CONFIG_DIR).join("jmount.conf")
    }

    fn with_home(home: Option<&Path>) -> Self {
        Self {
            mount_root: expand_tilde("~/Cloud", home),
            remotes: split_list(DEFAULT_REMOTES),
            rclone_flags: DEFAULT_FLAGS.split_whitespace().map(String::from).collect(),
        }
    }

    /// Load settings from `path`, falling back to compiled-in defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::ConfigInvalid`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &Path, log: &dyn Log) -> Result<Self, MountError> {
        if !path.exists() {
            log.debug(&format!("{} not found, using defaults", path.display()));
            return Ok(Self::default());
        }
        let assignments =
            keyvalue::parse_file(path).map_err(|e| MountError::ConfigInvalid(e.to_string()))?;
        Ok(Self::from_assignments(&assignments, home_dir().as_deref(), log))
    }

    /// Build settings from parsed assignments over the defaults.
    #[must_use]
    pub fn from_assignments(assignments: &[Assignment], home: Option<&Path>, log: &dyn Log) -> Self {
        let mut config = Self::with_home(home);
        for a in assignments {
            match a.key.as_str() {
                "MOUNT_ROOT" => config.mount_root = expand_tilde(&a.value, home),
                "REMOTES" => config.remotes = split_list(&a.value),
                "RCLONE_FLAGS" => {
                    config.rclone_flags = a.value.split_whitespace().map(String::from).collect();
                }
                other => log.debug(&format!("ignoring unknown key {other} (line {})", a.line)),
            }
        }
        config
    }

    /// Mount point for `remote`: the remote name (text before the first `:`)
    /// under [`mount_root`](Self::mount_root).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use jtools::config::MountConfig;
    ///
    /// let config = MountConfig {
    ///     mount_root: PathBuf::from("/home/me/Cloud"),
    ///     remotes: vec![],
    ///     rclone_flags: vec![],
    /// };
    /// assert_eq!(config.mountpoint_for("gdrive:Photos"), PathBuf::from("/home/me/Cloud/gdrive"));
    /// ```
    #[must_use]
    pub fn mountpoint_for(&self, remote: &str) -> PathBuf {
        let name = remote
            .split(':')
            .find(|part| !part.is_empty())
            .unwrap_or(remote);
        self.mount_root.join(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::keyvalue::parse_str;
    use crate::error::Failure as _;
    use crate::test_helpers::RecordingLog;

    #[test]
    fn defaults_mount_two_remotes() {
        let config = MountConfig::with_home(Some(Path::new("/home/me")));
        assert_eq!(config.remotes, vec!["gdrive:", "onedrive:"]);
        assert_eq!(config.mount_root, PathBuf::from("/home/me/Cloud"));
        assert_eq!(config.rclone_flags, vec!["--vfs-cache-mode", "writes"]);
    }

    #[test]
    fn remotes_accept_commas_and_spaces() {
        let log = RecordingLog::default();
        let config = MountConfig::from_assignments(
            &parse_str("REMOTES=\"work:, personal:Docs\"\nMOUNT_ROOT=/mnt/cloud\n").unwrap(),
            None,
            &log,
        );
        assert_eq!(config.remotes, vec!["work:", "personal:Docs"]);
        assert_eq!(config.mountpoint_for("personal:Docs"), PathBuf::from("/mnt/cloud/personal"));
    }

    #[test]
    fn empty_remotes_is_allowed_at_load() {
        let log = RecordingLog::default();
        let config = MountConfig::from_assignments(&parse_str("REMOTES=\n").unwrap(), None, &log);
        assert!(config.remotes.is_empty());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let log = RecordingLog::default();
        let config = MountConfig::load(Path::new("/nonexistent/jmount.conf"), &log).unwrap();
        assert_eq!(config.remotes.len(), 2);
    }

    #[test]
    fn invalid_file_is_config_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jmount.conf");
        std::fs::write(&path, "REMOTES='open\n").unwrap();
        let log = RecordingLog::default();
        assert!(matches!(
            MountConfig::load(&path, &log),
            Err(MountError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn unquoted_remote_list_names_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jmount.conf");
        std::fs::write(&path, "MOUNT_ROOT=/mnt/cloud\nREMOTES=gdrive: work:\n").unwrap();
        let log = RecordingLog::default();
        let err = MountConfig::load(&path, &log).unwrap_err();
        assert_eq!(err.code(), 3);
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
