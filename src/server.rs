use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::reload::ReloadPipeline;
use crate::web::handlers::{health::health_check, reload::reload_handler};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<ReloadPipeline>,
}

pub struct Server {
    router: Router,
    listener: TcpListener,
}

impl Server {
    /// Binds the listener and wires the trigger endpoint onto the
    /// configured path. The trigger accepts any method, matching what
    /// rotation pipelines typically send (GET or POST callbacks).
    pub async fn new(config: &ServerConfig, pipeline: ReloadPipeline) -> Result<Self> {
        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("request", method = %request.method(), uri)
            });

        let state = AppState {
            pipeline: Arc::new(pipeline),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route(&config.endpoint, any(reload_handler))
            .layer(trace_layer)
            .with_state(state);

        let listener = TcpListener::bind(format!("{}:{}", config.host, config.port))
            .await
            .context("Binding TCP listener")?;

        Ok(Self { router, listener })
    }

    /// The port actually bound, useful when the configured port is 0.
    pub fn port(&self) -> Result<u16> {
        Ok(self
            .listener
            .local_addr()
            .context("Getting local address")?
            .port())
    }

    /// Serves until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let addr = self.listener.local_addr().context("Getting local address")?;
        tracing::info!("Server listening on http://{}", addr);

        axum::serve(self.listener, self.router)
            .await
            .context("Running server")?;
        Ok(())
    }
}
