//! Tagged error types, one per tool.
//!
//! Every failure a tool can hit is a variant of that tool's enum, and every
//! variant owns a process exit code unique within the tool. The code is only
//! turned into a process status at the binary boundary by
//! [`report::finish`](crate::report::finish).
//!
//! ```text
//! CopyError        jcp       remote edit round-trip
//! PassphraseError  japg      passphrase generator
//! UpdateError      jau       dnf/flatpak update pipeline
//! DeployError      jdc       docker compose helper
//! MountError       jmount    rclone mount wrapper
//! InstallError     jinstall  installer
//! ```
//!
//! Code `1` is "unknown option / usage error" in every tool.

use std::path::PathBuf;

use thiserror::Error;

/// An error that maps onto a process exit code.
pub trait Failure: std::error::Error {
    /// The exit code reported for this failure (never zero).
    fn code(&self) -> u8;
}

/// Errors raised by `jcp`.
#[derive(Error, Debug)]
pub enum CopyError {
    /// An argument outside the flag vocabulary, or a clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// `scp` is not on `PATH`.
    #[error("required tool not found: scp")]
    MissingScp,

    /// `ssh` is not on `PATH`.
    #[error("required tool not found: ssh")]
    MissingSsh,

    /// The configured editor is not on `PATH`.
    #[error("editor not found: {0}")]
    MissingEditor(String),

    /// The local file to upload does not exist.
    #[error("local file not found: {}", .0.display())]
    LocalFileMissing(PathBuf),

    /// Copying the remote file to the local path failed.
    #[error("download of {remote} failed: {detail}")]
    DownloadFailed {
        /// `host:path` that was fetched.
        remote: String,
        /// Failure detail from `scp`.
        detail: String,
    },

    /// Copying the local file to the remote host failed.
    #[error("upload to {remote} failed: {detail}")]
    UploadFailed {
        /// `host:path` that was written.
        remote: String,
        /// Failure detail from `scp`.
        detail: String,
    },

    /// The remote backup copy taken before an upload failed.
    #[error("remote backup of {path} failed: {detail}")]
    BackupFailed {
        /// Remote path being backed up.
        path: String,
        /// Failure detail from `ssh`.
        detail: String,
    },

    /// The editor exited non-zero.
    #[error("editor {editor} exited with status {status}")]
    EditorFailed {
        /// Editor program.
        editor: String,
        /// Exit status reported.
        status: i32,
    },

    /// Stopping the remote service failed.
    #[error("remote stop failed on {host}: {detail}")]
    RemoteStopFailed {
        /// Remote host.
        host: String,
        /// Failure detail from `ssh`.
        detail: String,
    },

    /// Starting the remote service failed.
    #[error("remote start failed on {host}: {detail}")]
    RemoteStartFailed {
        /// Remote host.
        host: String,
        /// Failure detail from `ssh`.
        detail: String,
    },

    /// Restarting the remote service after an upload failed.
    #[error("remote restart failed on {host}: {detail}")]
    RemoteRestartFailed {
        /// Remote host.
        host: String,
        /// Failure detail from `ssh`.
        detail: String,
    },

    /// A required setting is empty.
    #[error("setting {0} is not configured")]
    MissingSetting(&'static str),
}

impl Failure for CopyError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::ConfigMissing(_) => 2,
            Self::ConfigInvalid(_) => 3,
            Self::MissingScp => 4,
            Self::MissingSsh => 5,
            Self::MissingEditor(_) => 6,
            Self::LocalFileMissing(_) => 7,
            Self::DownloadFailed { .. } => 8,
            Self::UploadFailed { .. } => 9,
            Self::BackupFailed { .. } => 10,
            Self::EditorFailed { .. } => 11,
            Self::RemoteStopFailed { .. } => 12,
            Self::RemoteStartFailed { .. } => 13,
            Self::RemoteRestartFailed { .. } => 14,
            Self::MissingSetting(_) => 15,
        }
    }
}

/// Errors raised by `japg`.
#[derive(Error, Debug)]
pub enum PassphraseError {
    /// A clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The word count is not a positive integer.
    #[error("word count must be a positive integer, got '{0}'")]
    InvalidWordCount(String),

    /// The word list file does not exist.
    #[error("word list not found: {}", .0.display())]
    WordListMissing(PathBuf),

    /// The word list exists but cannot be read.
    #[error("cannot read word list {}: {source}", .path.display())]
    WordListUnreadable {
        /// Path of the word list.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No clipboard tool is on `PATH`.
    #[error("clipboard tool not found: {0}")]
    MissingClipboardTool(&'static str),

    /// The word list has fewer distinct words than requested.
    #[error("word list has {available} words, {requested} requested")]
    NotEnoughWords {
        /// Words requested.
        requested: usize,
        /// Words available.
        available: usize,
    },

    /// Writing to the clipboard failed.
    #[error("copy to clipboard failed: {0}")]
    ClipboardFailed(String),
}

impl Failure for PassphraseError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::InvalidWordCount(_) => 2,
            Self::WordListMissing(_) => 3,
            Self::WordListUnreadable { .. } => 4,
            Self::MissingClipboardTool(_) => 5,
            Self::NotEnoughWords { .. } => 6,
            Self::ClipboardFailed(_) => 7,
        }
    }
}

/// Errors raised by `jau`.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// A clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// `dnf` is not on `PATH`.
    #[error("required tool not found: dnf")]
    MissingDnf,

    /// `sudo` is not on `PATH`.
    #[error("required tool not found: sudo")]
    MissingSudo,

    /// Installing the auxiliary tools failed.
    #[error("installing auxiliary tools failed: {0}")]
    AuxToolsFailed(String),

    /// Refreshing the package cache failed.
    #[error("refreshing package cache failed: {0}")]
    RefreshFailed(String),

    /// Applying updates failed.
    #[error("applying updates failed: {0}")]
    UpgradeFailed(String),

    /// Reconciling leftover config files failed.
    #[error("reconciling config files failed: {0}")]
    ReconcileFailed(String),

    /// Checking for security updates failed (exit other than 0 or 100).
    #[error("security update check failed: {0}")]
    SecurityCheckFailed(String),

    /// Applying security updates failed.
    #[error("applying security updates failed: {0}")]
    SecurityUpgradeFailed(String),

    /// Removing orphaned packages failed.
    #[error("removing orphaned packages failed: {0}")]
    AutoremoveFailed(String),

    /// Cleaning the package cache failed.
    #[error("cleaning package cache failed: {0}")]
    CleanFailed(String),

    /// Updating flatpak applications failed.
    #[error("flatpak update failed: {0}")]
    FlatpakUpdateFailed(String),

    /// Removing unused flatpak runtimes failed.
    #[error("flatpak cleanup failed: {0}")]
    FlatpakCleanupFailed(String),
}

impl Failure for UpdateError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::MissingDnf => 2,
            Self::MissingSudo => 3,
            Self::AuxToolsFailed(_) => 4,
            Self::RefreshFailed(_) => 5,
            Self::UpgradeFailed(_) => 6,
            Self::ReconcileFailed(_) => 7,
            Self::SecurityCheckFailed(_) => 8,
            Self::SecurityUpgradeFailed(_) => 9,
            Self::AutoremoveFailed(_) => 10,
            Self::CleanFailed(_) => 11,
            Self::FlatpakUpdateFailed(_) => 12,
            Self::FlatpakCleanupFailed(_) => 13,
        }
    }
}

/// Errors raised by `jdc`.
#[derive(Error, Debug)]
pub enum DeployError {
    /// An argument outside the flag vocabulary, or a clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// `docker` is not on `PATH`.
    #[error("required tool not found: docker")]
    MissingDocker,

    /// `docker compose` is not available.
    #[error("docker compose plugin not available: {0}")]
    MissingComposePlugin(String),

    /// No compose file in the project directory.
    #[error("no compose file found in {}", .0.display())]
    ComposeFileMissing(PathBuf),

    /// `docker compose down` failed.
    #[error("compose down failed: {0}")]
    DownFailed(String),

    /// `docker compose up` failed.
    #[error("compose up failed: {0}")]
    UpFailed(String),

    /// `docker compose pull` failed.
    #[error("compose pull failed: {0}")]
    PullFailed(String),
}

impl Failure for DeployError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::MissingDocker => 2,
            Self::MissingComposePlugin(_) => 3,
            Self::ComposeFileMissing(_) => 4,
            Self::DownFailed(_) => 5,
            Self::UpFailed(_) => 6,
            Self::PullFailed(_) => 7,
        }
    }
}

/// Errors raised by `jmount`.
#[derive(Error, Debug)]
pub enum MountError {
    /// A clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// `rclone` is not on `PATH`.
    #[error("required tool not found: rclone")]
    MissingRclone,

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// No remotes are configured.
    #[error("no remotes configured")]
    NoRemotes,

    /// A mount point directory could not be created.
    #[error("cannot create mount point {}: {source}", .path.display())]
    MountpointFailed {
        /// Mount point directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Launching the mount process failed.
    #[error("launching mount for {remote} failed: {detail}")]
    LaunchFailed {
        /// Remote being mounted.
        remote: String,
        /// Failure detail.
        detail: String,
    },
}

impl Failure for MountError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::MissingRclone => 2,
            Self::ConfigInvalid(_) => 3,
            Self::NoRemotes => 4,
            Self::MountpointFailed { .. } => 5,
            Self::LaunchFailed { .. } => 6,
        }
    }
}

/// Errors raised by `jinstall`.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A clap usage error.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The source directory does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    /// A script listed in the manifest is missing from the source directory.
    #[error("source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// A destination directory could not be created.
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDirFailed {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Copying a script failed.
    #[error("copying {} failed: {source}", .path.display())]
    CopyFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Setting the executable bit failed.
    #[error("setting permissions on {} failed: {source}", .path.display())]
    PermissionFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the word list failed.
    #[error("installing word list {} failed: {source}", .path.display())]
    WordListFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing a configuration template failed.
    #[error("installing config template {} failed: {source}", .path.display())]
    ConfigTemplateFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The embedded manifest could not be parsed.
    #[error("invalid install manifest: {0}")]
    ManifestInvalid(String),
}

impl Failure for InstallError {
    fn code(&self) -> u8 {
        match self {
            Self::UnknownOption(_) => 1,
            Self::SourceDirMissing(_) => 2,
            Self::SourceMissing(_) => 3,
            Self::CreateDirFailed { .. } => 4,
            Self::CopyFailed { .. } => 5,
            Self::PermissionFailed { .. } => 6,
            Self::WordListFailed { .. } => 7,
            Self::ConfigTemplateFailed { .. } => 8,
            Self::ManifestInvalid(_) => 9,
        }
    }
}
