use std::path::PathBuf;

use regex::Regex;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};

use super::content::CrlContent;
use super::errors::ReloadResult;
use super::fetcher::SecretStoreClient;
use super::process::find_matching_pids;
use super::signal::signal_reload;

/// Outcome of one completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    /// Number of processes the reload signal went out to.
    pub signalled: usize,
}

/// The fetch → write → match → signal pipeline behind the trigger endpoint.
///
/// Built once at startup from an immutable configuration snapshot; the
/// environment is never re-read per trigger. Every stage is terminal on
/// failure, there is no retry or rollback: a CRL file written before a later
/// stage aborts stays in place. Concurrent triggers are not serialized here;
/// the atomic rename in the writer keeps readers consistent while the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct ReloadPipeline {
    client: SecretStoreClient,
    crl_file: PathBuf,
    pattern: Regex,
}

impl ReloadPipeline {
    /// Fails on an uncompilable process pattern, before any trigger is served.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client: SecretStoreClient::new(config.vault.clone()),
            crl_file: config.crl.file.clone(),
            pattern: config.proxy.compiled_pattern()?,
        })
    }

    /// Run one rotation: fetch fresh CRL bytes, rotate the file, then ask
    /// every matching process to reload.
    ///
    /// Zero matched processes is a success: the CRL was still rotated, there
    /// was just nobody to signal.
    pub async fn execute(&self) -> ReloadResult<ReloadOutcome> {
        let payload = self.client.fetch_crl().await?;
        CrlContent::new(payload, &self.crl_file).write()?;
        info!(file = %self.crl_file.display(), "rotated CRL file");

        let pids = find_matching_pids(&self.pattern)?;
        if pids.is_empty() {
            warn!(pattern = %self.pattern, "no process matched, skipping reload signal");
            return Ok(ReloadOutcome { signalled: 0 });
        }

        signal_reload(&pids)?;
        info!(count = pids.len(), "sent reload signal to matching processes");
        Ok(ReloadOutcome { signalled: pids.len() })
    }
}
