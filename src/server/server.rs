use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use super::bot::ReplyEngine;
use super::routes::{self, AppState};
use crate::config::Settings;
use crate::error::Result;

/// Demo reply service answering `GET {endpoint}?{query_param}=`
pub struct ApiServer {
    state: Arc<AppState>,
    endpoint: String,
    host: String,
    port: u16,
}

impl ApiServer {
    /// Serves `GET /get-response/?msg=`.
    pub fn new(engine: ReplyEngine, host: String, port: u16) -> Self {
        Self::with_route(engine, host, port, "/get-response/".to_string(), "msg".to_string())
    }

    pub fn with_route(
        engine: ReplyEngine,
        host: String,
        port: u16,
        endpoint: String,
        query_param: String,
    ) -> Self {
        info!("Creating new reply server on {}:{}{}", host, port, endpoint);
        Self {
            state: Arc::new(AppState { engine, query_param }),
            endpoint,
            host,
            port,
        }
    }

    /// Uses the client's endpoint and query parameter, so `run` talks to itself.
    pub fn from_settings(settings: &Settings) -> Self {
        info!("Loaded catalog with {} products", settings.bot.products.len());
        Self::with_route(
            ReplyEngine::new(settings.bot.clone()),
            settings.server.host.clone(),
            settings.server.port,
            settings.client.endpoint.clone(),
            settings.client.query_param.clone(),
        )
    }

    pub fn router(&self) -> Router {
        let mut router = Router::new().route(self.endpoint.as_str(), get(routes::get_response));
        if self.endpoint != "/" {
            router = router.route("/", get(routes::health_check));
        }
        router.with_state(Arc::clone(&self.state))
    }

    /// Binds to the configured address and serves until the process exits.
    pub async fn start(&self) -> Result<()> {
        info!("Starting server on {}:{}", self.host, self.port);
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        info!("Server listening on {}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
