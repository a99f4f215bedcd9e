//! Tracked background mount processes.
//!
//! Every launched mount is kept as a [`MountHandle`] so the caller decides
//! explicitly whether to wait for it, stop it, or let it run on after the
//! launcher exits.
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::exec::Executor;

/// Kernel mount table of the current process.
pub const MOUNT_TABLE: &str = "/proc/self/mounts";

/// One running mount process.
#[derive(Debug)]
pub struct MountHandle {
    remote: String,
    mountpoint: PathBuf,
    child: Child,
}

impl MountHandle {
    /// Track `child`, which serves `remote` at `mountpoint`.
    #[must_use]
    pub const fn new(remote: String, mountpoint: PathBuf, child: Child) -> Self {
        Self {
            remote,
            mountpoint,
            child,
        }
    }

    /// Remote being served.
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Directory the remote is mounted on.
    #[must_use]
    pub fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    /// Exit status if the process has already finished.
    ///
    /// # Errors
    ///
    /// Returns the OS error from polling the child.
    pub fn try_status(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Block until the mount process exits.
    ///
    /// # Errors
    ///
    /// Returns the OS error from waiting on the child.
    pub fn join(mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }

    /// Unmount, then kill the process if it is still alive, and reap it.
    ///
    /// # Errors
    ///
    /// Returns the OS error from killing or waiting on the child.
    pub fn cancel(mut self, executor: &dyn Executor) -> io::Result<ExitStatus> {
        let dir = self.mountpoint.to_string_lossy().into_owned();
        // rclone exits on its own once the filesystem is released.
        let _ = executor.run_unchecked("fusermount", &["-u", &dir]);
        if self.child.try_wait()?.is_none() {
            self.child.kill()?;
        }
        self.child.wait()
    }
}

/// How a supervised set of mounts ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supervision {
    /// Every mount process exited by itself.
    Finished,
    /// The stop flag was raised and the remaining mounts were cancelled.
    Cancelled,
}

/// The mounts launched by one run.
#[derive(Debug, Default)]
pub struct Mounts {
    handles: Vec<MountHandle>,
}

impl Mounts {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track another mount.
    pub fn push(&mut self, handle: MountHandle) {
        self.handles.push(handle);
    }

    /// Number of tracked mounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no mount is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every mount process, in launch order.
    #[must_use]
    pub fn join(self) -> Vec<(String, io::Result<ExitStatus>)> {
        self.handles
            .into_iter()
            .map(|h| (h.remote.clone(), h.join()))
            .collect()
    }

    /// Cancel every mount process.
    #[must_use]
    pub fn cancel(self, executor: &dyn Executor) -> Vec<(String, io::Result<ExitStatus>)> {
        self.handles
            .into_iter()
            .map(|h| (h.remote.clone(), h.cancel(executor)))
            .collect()
    }

    /// Stop tracking the mounts and leave them running.
    ///
    /// Returns how many were released.
    #[must_use]
    pub fn detach(self) -> usize {
        self.handles.len()
    }

    /// Wait for the mounts, cancelling the ones still running as soon as
    /// `stop` is raised.
    ///
    /// # Errors
    ///
    /// Returns the first OS error from polling a child.
    pub fn supervise(
        mut self,
        stop: &AtomicBool,
        executor: &dyn Executor,
        poll: Duration,
    ) -> io::Result<Supervision> {
        loop {
            if stop.load(Ordering::SeqCst) {
                for (_, result) in self.cancel(executor) {
                    result?;
                }
                return Ok(Supervision::Cancelled);
            }
            let mut running = Vec::with_capacity(self.handles.len());
            for mut handle in self.handles {
                if handle.try_status()?.is_none() {
                    running.push(handle);
                }
            }
            self.handles = running;
            if self.handles.is_empty() {
                return Ok(Supervision::Finished);
            }
            std::thread::sleep(poll);
        }
    }
}

/// Mount points listed in mount-table text (`/proc/self/mounts` format).
///
/// The kernel escapes space, tab, newline, and backslash in paths as
/// three-digit octal sequences; those are decoded.
#[must_use]
pub fn mounted_paths(table: &str) -> Vec<PathBuf> {
    table
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|field| PathBuf::from(unescape_octal(field)))
        .collect()
}

/// Whether `path` appears as a mount point in `table`.
#[must_use]
pub fn is_mounted(table: &str, path: &Path) -> bool {
    mounted_paths(table).iter().any(|p| p == path)
}

fn unescape_octal(field: &str) -> String {
    let mut out = Vec::with_capacity(field.len());
    let mut rest = field.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        if first == b'\\'
            && let Some(byte) = tail.get(..3).and_then(octal_byte)
        {
            out.push(byte);
            rest = tail.get(3..).unwrap_or_default();
            continue;
        }
        out.push(first);
        rest = tail;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn octal_byte(digits: &[u8]) -> Option<u8> {
    if !digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
    u8::try_from(value).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::test_helpers::FakeExecutor;
    use std::process::Command;

    fn handle(program: &str, args: &[&str], dir: &str) -> MountHandle {
        let child = Command::new(program).args(args).spawn().unwrap();
        MountHandle::new(format!("{dir}:"), PathBuf::from(dir), child)
    }

    #[test]
    fn join_waits_for_exit() {
        let h = handle("true", &[], "/mnt/a");
        assert_eq!(h.remote(), "/mnt/a:");
        assert!(h.join().unwrap().success());
    }

    #[test]
    fn cancel_unmounts_then_kills() {
        let exec = FakeExecutor::new();
        let h = handle("sleep", &["30"], "/mnt/b");
        let status = h.cancel(&exec).unwrap();
        assert!(!status.success(), "killed process does not exit cleanly");
        assert_eq!(exec.calls(), vec!["fusermount -u /mnt/b"]);
    }

    #[test]
    fn mounts_join_in_launch_order() {
        let mut mounts = Mounts::new();
        mounts.push(handle("true", &[], "/mnt/a"));
        mounts.push(handle("false", &[], "/mnt/b"));
        assert_eq!(mounts.len(), 2);
        let results = mounts.join();
        assert_eq!(results[0].0, "/mnt/a:");
        assert!(results[0].1.as_ref().unwrap().success());
        assert!(!results[1].1.as_ref().unwrap().success());
    }

    #[test]
    fn detach_releases_without_waiting() {
        let mut mounts = Mounts::new();
        mounts.push(handle("true", &[], "/mnt/a"));
        assert_eq!(mounts.detach(), 1);
    }

    #[test]
    fn supervise_finishes_when_processes_exit() {
        let mut mounts = Mounts::new();
        mounts.push(handle("true", &[], "/mnt/a"));
        let stop = AtomicBool::new(false);
        let exec = FakeExecutor::new();
        let outcome = mounts
            .supervise(&stop, &exec, Duration::from_millis(10))
            .unwrap();
        assert_eq!(outcome, Supervision::Finished);
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn supervise_cancels_on_stop() {
        let mut mounts = Mounts::new();
        mounts.push(handle("sleep", &["30"], "/mnt/c"));
        let stop = AtomicBool::new(true);
        let exec = FakeExecutor::new();
        let outcome = mounts
            .supervise(&stop, &exec, Duration::from_millis(10))
            .unwrap();
        assert_eq!(outcome, Supervision::Cancelled);
        assert!(exec.called("fusermount -u /mnt/c"));
    }

    #[test]
    fn mount_table_paths_are_decoded() {
        let table = "proc /proc proc rw 0 0\n\
                     gdrive: /home/me/Cloud/my\\040drive fuse.rclone rw 0 0\n";
        assert!(is_mounted(table, Path::new("/proc")));
        assert!(is_mounted(table, Path::new("/home/me/Cloud/my drive")));
        assert!(!is_mounted(table, Path::new("/home/me/Cloud")));
    }

    #[test]
    fn malformed_escape_is_kept() {
        assert_eq!(unescape_octal(r"a\09b"), r"a\09b");
        assert_eq!(unescape_octal(r"tail\04"), r"tail\04");
    }
}
