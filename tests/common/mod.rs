use std::collections::HashMap;
use std::path::Path;

use crl_reloader::{config::Config, reload::ReloadPipeline, server::Server};

/// Spawn the service on a random port, pointed at the given secret store
/// and CRL destination, and return its base URL.
pub async fn spawn_server(vault_url: &str, crl_file: &Path, process_pattern: &str) -> String {
    let mut env_vars = HashMap::new();
    env_vars.insert("server.host".to_string(), "localhost".to_string());
    // Use a random OS port
    env_vars.insert("server.port".to_string(), "0".to_string());
    env_vars.insert("vault.url".to_string(), vault_url.to_string());
    env_vars.insert("crl.file".to_string(), crl_file.display().to_string());
    env_vars.insert(
        "proxy.process_pattern".to_string(),
        process_pattern.to_string(),
    );

    let config = Config::load_with_sources(Some(env_vars)).unwrap();
    let pipeline = ReloadPipeline::new(&config).unwrap();
    let server = Server::new(&config.server, pipeline).await.unwrap();

    let port = server.port().unwrap();
    tokio::spawn(async move {
        server.run().await.expect("failed to run server");
    });

    format!("http://localhost:{port}")
}
