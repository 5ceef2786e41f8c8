//! CRL rotation and proxy reload pipeline
//!
//! # Features
//! - CRL fetching from a Vault-style secret store
//! - Atomic rotation of the CRL file the proxy reads
//! - Matching live processes against a configured command-line pattern
//! - SIGHUP delivery so the proxy re-reads its configuration in place

mod content;
mod errors;
mod fetcher;
mod pipeline;
mod process;
mod signal;

// Re-export public types
pub use content::{CrlContent, ensure_crl_file};
pub use errors::{ReloadError, ReloadResult, SignalFailure};
pub use fetcher::SecretStoreClient;
pub use pipeline::{ReloadOutcome, ReloadPipeline};
pub use process::find_matching_pids;
pub use signal::signal_reload;
