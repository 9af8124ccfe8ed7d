//! Cart Offer: restaurant discount offers targeted at user segments.
//!
//! Main entry point that wires the offer store, segment client and engine
//! together and starts the HTTP server.

use clap::Parser;
use offer_api::ApiServer;
use offer_core::config::AppConfig;
use offer_engine::{CartLedger, OfferEngine};
use offer_segmentation::HttpSegmentClient;
use offer_store::OfferStore;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cart-offer")]
#[command(about = "Segment-targeted restaurant offers applied to cart totals")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CART_OFFER__NODE_ID")]
    node_id: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "CART_OFFER__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CART_OFFER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Base URL of the user segment service (overrides config)
    #[arg(long, env = "CART_OFFER__SEGMENT_SERVICE__BASE_URL")]
    segment_url: Option<String>,

    /// Disable the Prometheus exporter
    #[arg(long, default_value_t = false)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cart_offer=info,offer_api=info,offer_engine=info,tower_http=info".into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Cart Offer starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(url) = cli.segment_url {
        config.segment_service.base_url = url;
    }
    if cli.no_metrics {
        config.metrics.enabled = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        segment_service = %config.segment_service.base_url,
        restaurants = ?config.offers.valid_restaurant_ids,
        "Configuration loaded"
    );

    let store = Arc::new(OfferStore::new(&config.offers));
    let segments = Arc::new(HttpSegmentClient::new(&config.segment_service)?);
    let engine = Arc::new(
        OfferEngine::new(store, segments).with_ledger(CartLedger::from_config(&config.offers)),
    );

    let api_server = ApiServer::new(config.clone(), engine.clone());

    if let Err(e) = api_server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    // Spawn ledger maintenance task
    let engine_for_maintenance = engine.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = engine_for_maintenance.ledger().evict_expired();
            if evicted > 0 {
                tracing::debug!(evicted, "Expired cart ledger entries removed");
            }
        }
    });

    info!("Cart Offer is ready to serve traffic");

    api_server.start_http().await
}
