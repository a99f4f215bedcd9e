//! Settings for the remote edit round-trip (`jcp`).
use std::path::{Path, PathBuf};

use super::keyvalue::{self, Assignment, ConfigError};
use super::{CONFIG_DIR, expand_tilde, home_dir};
use crate::error::CopyError;
use crate::exec::shell_quote;
use crate::logging::Log;

/// Editor used when the configuration does not name one.
pub const DEFAULT_EDITOR: &str = "vi";

/// Immutable settings for one `jcp` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyConfig {
    /// SSH destination (`host`, `user@host`, or an ssh config alias).
    pub remote_host: String,
    /// Path of the file on the remote host.
    pub remote_path: String,
    /// Path of the working copy on this machine.
    pub local_path: PathBuf,
    /// Editor command line (program followed by arguments).
    pub editor: String,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            remote_host: String::new(),
            remote_path: "docker-compose.yml".to_string(),
            local_path: expand_tilde("~/docker-compose.yml", home_dir().as_deref()),
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl CopyConfig {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Path::new(CONFIG_DIR).join("jcp.conf")
    }

    /// Load settings from `path`.
    ///
    /// # Errors
    ///
    /// [`CopyError::ConfigMissing`] if the file does not exist,
    /// [`CopyError::ConfigInvalid`] if it cannot be read or parsed.
    pub fn load(path: &Path, log: &dyn Log) -> Result<Self, CopyError> {
        if !path.exists() {
            return Err(CopyError::ConfigMissing(path.to_path_buf()));
        }
        log.debug(&format!("loading {}", path.display()));
        let assignments = keyvalue::parse_file(path).map_err(|e| match e {
            ConfigError::InvalidSyntax { .. } => {
                CopyError::ConfigInvalid(format!("{}: {e}", path.display()))
            }
            ConfigError::Io { .. } => CopyError::ConfigInvalid(e.to_string()),
        })?;
        Ok(Self::from_assignments(&assignments, home_dir().as_deref(), log))
    }

    /// Build settings from parsed assignments, keeping defaults for keys the
    /// file does not set. Later assignments override earlier ones.
    #[must_use]
    pub fn from_assignments(assignments: &[Assignment], home: Option<&Path>, log: &dyn Log) -> Self {
        let mut config = Self {
            local_path: expand_tilde("~/docker-compose.yml", home),
            ..Self::default()
        };
        for a in assignments {
            match a.key.as_str() {
                "REMOTE_HOST" => config.remote_host.clone_from(&a.value),
                "REMOTE_PATH" => config.remote_path.clone_from(&a.value),
                "LOCAL_PATH" => config.local_path = expand_tilde(&a.value, home),
                "EDITOR" => config.editor.clone_from(&a.value),
                other => log.debug(&format!("ignoring unknown key {other} (line {})", a.line)),
            }
        }
        config
    }

    /// `host:path` argument for `scp`, with the path quoted since the remote
    /// shell of the legacy scp protocol splits it on whitespace.
    #[must_use]
    pub fn remote_target(&self) -> String {
        format!("{}:{}", self.remote_host, shell_quote(&self.remote_path))
    }

    /// Path of the backup taken on the remote host before an upload.
    #[must_use]
    pub fn backup_path(&self) -> String {
        format!("{}.bak", self.remote_path)
    }

    /// Editor program and its arguments.
    #[must_use]
    pub fn editor_command(&self) -> (String, Vec<String>) {
        let mut parts = self.editor.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        (program, parts.collect())
    }

    /// Fail with [`CopyError::MissingSetting`] if no remote host is set.
    ///
    /// # Errors
    ///
    /// Returns an error when `REMOTE_HOST` is empty.
    pub fn require_host(&self) -> Result<(), CopyError> {
        if self.remote_host.trim().is_empty() {
            return Err(CopyError::MissingSetting("REMOTE_HOST"));
        }
        Ok(())
    }
}
