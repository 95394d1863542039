//! # Error Types
//!
//! Every step of a run reports failure through [`Error`]. The variants follow
//! the four failure classes of the pipeline:
//! - transport: [`Error::Request`], [`Error::Status`]
//! - filesystem: [`Error::Io`]
//! - external process: [`Error::Spawn`], [`Error::Process`], [`Error::Task`],
//!   [`Error::Unsupported`]
//! - configuration: [`Error::Config`]
//!
//! "No qualifying image" is not an error; the locator returns `Ok(None)`.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The automation program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The automation program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Process {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The blocking task running a wallpaper backend panicked or was cancelled.
    #[error("wallpaper backend {backend} did not finish: {source}")]
    Task {
        backend: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },

    /// No wallpaper backend applies to this desktop.
    #[error("cannot set wallpaper: {0}")]
    Unsupported(String),

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Shorthand for building an [`Error::Io`] inside `map_err`.
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { action, path, source }
    }
}
