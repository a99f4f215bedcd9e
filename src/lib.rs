//! Workstation utilities.
//!
//! Six small tools share this library: `jcp` (remote edit round-trip),
//! `japg` (passphrases), `jau` (package updates), `jdc` (Docker Compose),
//! `jmount` (rclone mounts) and `jinstall` (installer). Each is a short,
//! linear sequence of external commands; every failure has its own exit
//! code, reported as `error[<code>]: <message>`.
//!
//! The public API is organised into these layers:
//!
//! - **[`cli`]** and **[`dispatch`]**: option parsing and mode-flag dispatch
//! - **[`config`]**: key=value settings files and the install manifest
//! - **[`commands`]**: one `run` per tool, built on [`exec`] and [`context`]
//! - **[`error`]** and **[`report`]**: tagged errors and the exit boundary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod exec;
pub mod logging;
pub mod mount;
pub mod passphrase;
pub mod report;
pub mod tasks;

#[cfg(test)]
mod test_helpers;
