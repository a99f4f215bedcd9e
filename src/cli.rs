//! Command-line definitions for every binary.
//!
//! Ambient options are clap arguments. `jcp` and `jdc` also take mode flags
//! (`-d`, `-u`, `-ur`, …) that clap collects verbatim into `flags` for
//! [`dispatch::parse_mode`](crate::dispatch::parse_mode); they follow the
//! ambient options on the command line.
use std::path::PathBuf;

use clap::Parser;

/// Version string baked in by the build script.
pub const VERSION: &str = match option_env!("JTOOLS_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// `jcp`: edit a file that lives on a remote host.
#[derive(Parser, Debug)]
#[command(
    name = "jcp",
    version = VERSION,
    about = "Download, edit, and upload a file on a remote host",
    after_help = "Modes:\n  (none)  download, then edit\n  -d      download\n  -u      upload (remote backup first)\n  -uc     upload, then restart the remote service\n  -ur     stop the remote service, upload, start it"
)]
pub struct CopyCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Mode flag
    #[arg(
        value_name = "MODE",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub flags: Vec<String>,
}

/// `japg`: generate a passphrase and copy it to the clipboard.
#[derive(Parser, Debug)]
#[command(name = "japg", version = VERSION, about = "Generate a passphrase from a word list")]
pub struct PassphraseCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Word list, one word per line
    #[arg(long, value_name = "PATH")]
    pub wordlist: Option<PathBuf>,

    /// Number of words (default 4)
    #[arg(allow_hyphen_values = true)]
    pub word_count: Option<String>,

    /// Text placed between words (default "-")
    #[arg(allow_hyphen_values = true)]
    pub delimiter: Option<String>,
}

/// `jau`: bring the system's packages up to date.
#[derive(Parser, Debug)]
#[command(name = "jau", version = VERSION, about = "Update dnf and flatpak packages")]
pub struct UpdateCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Preview commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// `jdc`: drive a Docker Compose project.
#[derive(Parser, Debug)]
#[command(
    name = "jdc",
    version = VERSION,
    about = "Bring a Docker Compose project up, down, or refresh it",
    after_help = "Modes:\n  -u  up (default)\n  -d  down\n  -r  restart (down, then up)\n  -p  pull images, then up"
)]
pub struct DeployCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Project directory holding the compose file
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Mode flag
    #[arg(
        value_name = "MODE",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub flags: Vec<String>,
}

/// `jmount`: mount the configured cloud remotes.
#[derive(Parser, Debug)]
#[command(name = "jmount", version = VERSION, about = "Mount cloud storage remotes with rclone")]
pub struct MountCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stay in the foreground until the mounts exit; Ctrl-C unmounts them
    #[arg(long)]
    pub wait: bool,

    /// Preview mounts without launching them
    #[arg(long)]
    pub dry_run: bool,
}

/// `jinstall`: install the tools into the system directories.
#[derive(Parser, Debug)]
#[command(name = "jinstall", version = VERSION, about = "Install the jtools scripts")]
pub struct InstallCli {
    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the built binaries (default: this binary's directory)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Prefix prepended to every destination directory
    #[arg(long, value_name = "DIR")]
    pub destdir: Option<PathBuf>,
}
