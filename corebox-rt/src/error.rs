//! Error kinds for the scheduler core (spec §7).
//!
//! `MALFORMED_INSTRUCTION` is deliberately absent here: per spec, a
//! malformed instruction is skipped with no state change and no surfaced
//! error, matching `original_source`'s behavior.

use std::path::PathBuf;

/// Errors the scheduler façade can return.
///
/// All of these are "not fatal" in the spec's terms — callers are expected
/// to log and continue rather than abort the process.
#[derive(thiserror::Error, Debug)]
pub enum SchedulerError {
    /// CONFIG_IO — the config file could not be opened. Defaults are kept.
    #[error("failed to open config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// UNKNOWN_POLICY — neither `fcfs` nor `rr`.
    #[error("unsupported scheduler policy: {0}")]
    UnknownPolicy(String),

    /// PROCESS_NOT_FOUND — `screen -r`/`-s` on an unknown name.
    #[error("process not found: {0}")]
    ProcessNotFound(String),

    /// LIFECYCLE_VIOLATION — `start` while already running.
    #[error("scheduler already running")]
    AlreadyRunning,

    /// LIFECYCLE_VIOLATION — `stop` while not running.
    #[error("scheduler not running")]
    NotRunning,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
