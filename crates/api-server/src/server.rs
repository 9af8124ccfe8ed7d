//! API server: routes, middleware and the metrics exporter.

use crate::offer_rest;
use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use offer_core::config::AppConfig;
use offer_engine::OfferEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Offers
        .route("/api/v1/offer", post(offer_rest::handle_add_offer))
        .route("/api/v1/cart/apply_offer", post(offer_rest::handle_apply_offer))
        .route("/api/v1/offers/:restaurant_id", get(offer_rest::handle_list_offers))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    config: AppConfig,
    engine: Arc<OfferEngine>,
}

impl ApiServer {
    pub fn new(config: AppConfig, engine: Arc<OfferEngine>) -> Self {
        Self { config, engine }
    }

    /// Serve HTTP until ctrl-c.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(AppState::new(self.engine.clone(), self.config.node_id.clone()));

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Start the Prometheus exporter on its own port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
