//! One module per tool; each exposes `run`, returning the tool's error type.
pub mod copy;
pub mod deploy;
pub mod install;
pub mod mount;
pub mod passphrase;
pub mod update;
