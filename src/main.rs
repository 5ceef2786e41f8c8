use crl_reloader::{
    config::Config,
    reload::{ReloadPipeline, ensure_crl_file},
    server::Server,
    telemetry,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    // Load configuration; any unparsable value is fatal here, before a
    // single trigger is served.
    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    // The proxy may try to open the CRL file before the first rotation.
    ensure_crl_file(&config.crl.file)?;

    let pipeline = ReloadPipeline::new(&config)?;
    let server = Server::new(&config.server, pipeline).await?;
    server.run().await
}
