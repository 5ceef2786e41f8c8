use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors aborting a rotation pipeline, one per stage
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The secret store could not be reached, or answered with a
    /// non-success status.
    #[error("failed to fetch CRL from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The secret store answered, but its body could not be fully read.
    #[error("failed to read CRL payload from {url}: {source}")]
    ReadFailed { url: String, source: reqwest::Error },

    #[error("failed to write CRL to {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("process table unavailable: {0}")]
    ProcessTableUnavailable(String),

    /// Delivery was attempted for the whole target set; this reports the
    /// part of it that failed.
    #[error("signal delivery failed: {}", describe_failures(.failed))]
    SignalDeliveryFailed { failed: Vec<SignalFailure> },
}

/// A single target the reload signal could not be delivered to.
#[derive(Debug)]
pub struct SignalFailure {
    pub pid: i32,
    pub source: io::Error,
}

fn describe_failures(failed: &[SignalFailure]) -> String {
    failed
        .iter()
        .map(|f| format!("pid {} ({})", f.pid, f.source))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReloadError {
    /// Pipeline stage the error aborted, for the operational log.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } | Self::ReadFailed { .. } => "fetch",
            Self::WriteFailed { .. } => "write",
            Self::ProcessTableUnavailable(_) => "match",
            Self::SignalDeliveryFailed { .. } => "signal",
        }
    }

    /// Short diagnostic returned to the trigger's caller. Never carries
    /// URLs, paths or token material.
    pub fn category(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "failed to fetch CRL from secret store",
            Self::ReadFailed { .. } => "failed to read CRL payload",
            Self::WriteFailed { .. } => "failed to update CRL file",
            Self::ProcessTableUnavailable(_) => "failed to scan process table",
            Self::SignalDeliveryFailed { .. } => "failed to signal proxy process",
        }
    }
}

/// Convenient Result type alias
pub type ReloadResult<T> = Result<T, ReloadError>;
