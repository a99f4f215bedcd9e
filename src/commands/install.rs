//! `jinstall`: copy the tools and their data files into the system
//! directories.
use std::fs;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};

use crate::cli::InstallCli;
use crate::config::manifest::{self, Manifest, ScriptEntry};
use crate::config::CONFIG_DIR;
use crate::context::Context;
use crate::error::InstallError;
use crate::logging::TaskStatus;

/// Executables directory.
pub const BIN_DIR: &str = "/usr/local/bin";

/// Word list directory.
pub const DICT_DIR: &str = "/usr/share/dict";

/// Mode given to installed scripts.
const SCRIPT_MODE: u32 = 0o755;

/// Where one run installs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory holding the built binaries.
    pub source: PathBuf,
    /// Executables directory.
    pub bin: PathBuf,
    /// Word list directory.
    pub dict: PathBuf,
    /// Configuration directory.
    pub config: PathBuf,
}

impl Layout {
    /// Destination directories under an optional staging prefix.
    #[must_use]
    pub fn new(source: PathBuf, destdir: Option<&Path>) -> Self {
        Self {
            source,
            bin: prefixed(destdir, BIN_DIR),
            dict: prefixed(destdir, DICT_DIR),
            config: prefixed(destdir, CONFIG_DIR),
        }
    }
}

/// `target` re-rooted under `destdir`, or `target` itself without one.
#[must_use]
pub fn prefixed(destdir: Option<&Path>, target: &str) -> PathBuf {
    destdir.map_or_else(
        || PathBuf::from(target),
        |root| root.join(target.trim_start_matches('/')),
    )
}

/// Directory of the running executable.
fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = dunce::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}

/// Run `jinstall`.
///
/// # Errors
///
/// Returns the [`InstallError`] of the first manifest entry that cannot be
/// installed; entries before it stay installed.
pub fn run(opts: &InstallCli, ctx: &Context) -> Result<(), InstallError> {
    let manifest =
        Manifest::embedded().map_err(|e| InstallError::ManifestInvalid(e.to_string()))?;
    let source = opts
        .source
        .clone()
        .or_else(exe_dir)
        .ok_or_else(|| InstallError::SourceDirMissing(PathBuf::from(".")))?;
    install(&manifest, &Layout::new(source, opts.destdir.as_deref()), ctx)
}

/// Install every entry of `manifest` according to `layout`.
///
/// # Errors
///
/// See [`run`].
pub fn install(manifest: &Manifest, layout: &Layout, ctx: &Context) -> Result<(), InstallError> {
    if !layout.source.is_dir() {
        return Err(InstallError::SourceDirMissing(layout.source.clone()));
    }
    ctx.log.debug(&format!("source: {}", layout.source.display()));

    for entry in &manifest.scripts {
        ctx.log.stage(&entry.name);
        install_script(entry, layout, ctx)?;
        if let Some(name) = &entry.wordlist {
            install_wordlist(name, layout, ctx)?;
        }
        if let Some(name) = &entry.config_template {
            install_template(name, layout, ctx)?;
        }
        let status = if ctx.dry_run {
            TaskStatus::DryRun
        } else {
            TaskStatus::Ok
        };
        ctx.log.record_task(&entry.name, status, None);
    }

    let count = manifest.scripts.len();
    if ctx.dry_run {
        ctx.log.info(&format!("would install {count} scripts"));
    } else {
        ctx.log.info(&format!("installed {count} scripts"));
    }
    Ok(())
}

fn digest(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}

/// Digest of the file at `path`, if it can be read.
fn file_digest(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).ok().map(|bytes| digest(&bytes))
}

fn ensure_dir(dir: &Path, ctx: &Context) -> Result<(), InstallError> {
    if dir.is_dir() {
        return Ok(());
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would create {}", dir.display()));
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| InstallError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })
}

fn install_script(entry: &ScriptEntry, layout: &Layout, ctx: &Context) -> Result<(), InstallError> {
    let src = layout.source.join(&entry.name);
    if !src.is_file() {
        return Err(InstallError::SourceMissing(src));
    }
    ensure_dir(&layout.bin, ctx)?;
    let dest = layout.bin.join(&entry.name);

    if file_digest(&src).is_some_and(|d| file_digest(&dest).as_ref() == Some(&d)) {
        ctx.log.info(&format!("up to date: {}", dest.display()));
        return Ok(());
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would install {} -> {}",
            src.display(),
            dest.display()
        ));
        return Ok(());
    }

    // Staged beside the destination so a running binary is replaced by rename.
    let staged = layout.bin.join(format!(".{}.new", entry.name));
    let copy_failed = |source| InstallError::CopyFailed {
        path: dest.clone(),
        source,
    };
    fs::copy(&src, &staged).map_err(copy_failed)?;
    make_executable(&staged, &dest).inspect_err(|_| {
        let _ = fs::remove_file(&staged);
    })?;
    fs::rename(&staged, &dest).map_err(|source| {
        let _ = fs::remove_file(&staged);
        copy_failed(source)
    })?;

    ctx.log.info(&format!("installed {}", dest.display()));
    Ok(())
}

/// Give `staged` the script mode; failures are reported against `dest`.
fn make_executable(staged: &Path, dest: &Path) -> Result<(), InstallError> {
    fs::set_permissions(staged, fs::Permissions::from_mode(SCRIPT_MODE)).map_err(|source| {
        InstallError::PermissionFailed {
            path: dest.to_path_buf(),
            source,
        }
    })
}

fn embedded(name: &str) -> Result<&'static str, InstallError> {
    manifest::data_file(name)
        .ok_or_else(|| InstallError::ManifestInvalid(format!("unknown data file: {name}")))
}

fn install_wordlist(name: &str, layout: &Layout, ctx: &Context) -> Result<(), InstallError> {
    let content = embedded(name)?;
    ensure_dir(&layout.dict, ctx)?;
    let dest = layout.dict.join(name);

    if file_digest(&dest).is_some_and(|d| d == digest(content.as_bytes())) {
        ctx.log.info(&format!("up to date: {}", dest.display()));
        return Ok(());
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would write {}", dest.display()));
        return Ok(());
    }
    fs::write(&dest, content).map_err(|source| InstallError::WordListFailed {
        path: dest.clone(),
        source,
    })?;
    ctx.log.info(&format!("installed {}", dest.display()));
    Ok(())
}

fn install_template(name: &str, layout: &Layout, ctx: &Context) -> Result<(), InstallError> {
    let content = embedded(name)?;
    ensure_dir(&layout.config, ctx)?;
    let dest = layout.config.join(name);

    if dest.exists() {
        ctx.log.info(&format!("kept existing {}", dest.display()));
        return Ok(());
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would write {}", dest.display()));
        return Ok(());
    }
    fs::write(&dest, content).map_err(|source| InstallError::ConfigTemplateFailed {
        path: dest.clone(),
        source,
    })?;
    ctx.log.info(&format!("installed {}", dest.display()));
    Ok(())
}
