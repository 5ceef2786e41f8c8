use std::{collections::HashMap, path::PathBuf};

use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// `::` disambiguates the config crate from this module.
use ::config::{Config as ConfigLib, Environment, File};

pub use ::config::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub vault: VaultConfig,
    pub crl: CrlConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the rotation trigger is served on.
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Base URL of the secret store, without the `/v1/...` suffix.
    pub url: String,
    /// Sent as `X-Vault-Token` when present.
    #[serde(default)]
    pub token: Option<SecretString>,
    pub root_secret: String,
    pub intermediate_secret: String,
    /// When true, the intermediate CRL is fetched and appended to the root one.
    pub intermediate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrlConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Regex matched against the command line of every live process.
    pub process_pattern: String,
}

impl ProxyConfig {
    /// Compile the process pattern. An invalid pattern is a startup error,
    /// never a per-request one.
    pub fn compiled_pattern(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.process_pattern)
            .map_err(|e| ConfigError::Message(format!("invalid proxy.process_pattern: {e}")))
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.endpoint", "/reload")?
            .set_default("vault.url", "http://localhost")?
            .set_default("vault.root_secret", "pki")?
            .set_default("vault.intermediate_secret", "pki_int")?
            .set_default("vault.intermediate", false)?
            .set_default("crl.file", "crl.pem")?
            .set_default("proxy.process_pattern", ".*nginx: master.*")?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format APP_SERVER__PORT or APP_VAULT__TOKEN
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
