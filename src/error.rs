//! Error types for the crate.
//!
//! Terminal-query failures are reported by the width probes as
//! [`ProbeError`] and swallowed by the container, so they never appear in
//! [`Error`]. Lifecycle misuse is always surfaced to the caller.

use std::io;
use thiserror::Error;

/// The terminal width could not be determined.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The external size query could not be executed or exited non-zero.
    #[error("fail to get terminal width")]
    ExecFail,

    /// The native window-size query failed.
    #[error("terminal size query failed")]
    Io {
        /// Underlying OS error.
        #[from]
        source: io::Error,
    },
}

/// A `start`/`stop`/`listen` call that is invalid in the current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// A refresh loop is already active for this container.
    #[error("progress is already running")]
    AlreadyRunning,

    /// `stop` was called while no refresh loop was active.
    #[error("progress is not running")]
    NotRunning,
}

/// Errors returned by [`Progress`](crate::Progress) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid lifecycle transition.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Subscribing to the terminal resize signal failed.
    #[error("failed to subscribe to terminal resize: {0}")]
    Signal(#[source] io::Error),

    /// I/O error, e.g. spawning the refresh thread.
    #[error("I/O error")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Result type alias for fallible container operations.
pub type Result<T> = std::result::Result<T, Error>;
