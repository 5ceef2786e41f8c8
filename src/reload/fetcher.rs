use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::config::VaultConfig;

use super::errors::{ReloadError, ReloadResult};

const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Client for the secret store serving CRL material.
///
/// One attempt per call, no retries; a rotation pipeline that wants the
/// fetch again must be triggered again.
#[derive(Debug, Clone)]
pub struct SecretStoreClient {
    http: Client,
    config: VaultConfig,
}

impl SecretStoreClient {
    pub fn new(config: VaultConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Fetch the PEM-encoded CRL of a single secret engine.
    async fn fetch_pem(&self, secret_name: &str) -> ReloadResult<Vec<u8>> {
        let url = format!(
            "{}/v1/{}/crl/pem",
            self.config.url.trim_end_matches('/'),
            secret_name
        );
        debug!("Fetching CRL from: {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.token {
            request = request.header(VAULT_TOKEN_HEADER, token.expose_secret());
        }

        let response = request.send().await.map_err(|e| ReloadError::FetchFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(ReloadError::FetchFailed {
                reason: format!("HTTP status {}", response.status()),
                url,
            });
        }

        let payload = response
            .bytes()
            .await
            .map_err(|source| ReloadError::ReadFailed { url, source })?;

        Ok(payload.to_vec())
    }

    /// Fetch the root CRL, with the intermediate CRL appended after a single
    /// newline when the configuration asks for it.
    pub async fn fetch_crl(&self) -> ReloadResult<Vec<u8>> {
        let mut payload = self.fetch_pem(&self.config.root_secret).await?;

        if self.config.intermediate {
            let intermediate = self.fetch_pem(&self.config.intermediate_secret).await?;
            payload.push(b'\n');
            payload.extend_from_slice(&intermediate);
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vault_config(url: &str, intermediate: bool) -> VaultConfig {
        VaultConfig {
            url: url.to_string(),
            token: Some("s.test-token".to_string().into()),
            root_secret: "pki".to_string(),
            intermediate_secret: "pki_int".to_string(),
            intermediate,
        }
    }

    #[tokio::test]
    async fn fetches_root_crl_with_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pki/crl/pem"))
            .and(header(VAULT_TOKEN_HEADER, "s.test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes("A"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SecretStoreClient::new(vault_config(&server.uri(), false));
        let payload = client.fetch_crl().await.unwrap();

        assert_eq!(payload, b"A");
    }

    #[tokio::test]
    async fn appends_intermediate_crl_after_a_newline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pki/crl/pem"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes("A"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/pki_int/crl/pem"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes("B"))
            .mount(&server)
            .await;

        let client = SecretStoreClient::new(vault_config(&server.uri(), true));
        let payload = client.fetch_crl().await.unwrap();

        assert_eq!(payload, b"A\nB");
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SecretStoreClient::new(vault_config(&server.uri(), false));
        let err = client.fetch_crl().await.unwrap_err();

        assert_eq!(err.stage(), "fetch");
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_fetch_failure() {
        // Reserved port; nothing listens there.
        let client = SecretStoreClient::new(vault_config("http://127.0.0.1:1", false));
        let err = client.fetch_crl().await.unwrap_err();

        assert_eq!(err.category(), "failed to fetch CRL from secret store");
    }
}
