use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CART_OFFER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub segment_service: SegmentServiceConfig,
    #[serde(default)]
    pub offers: OffersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Location of the external user-segment lookup service.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentServiceConfig {
    #[serde(default = "default_segment_base_url")]
    pub base_url: String,
    #[serde(default = "default_segment_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OffersConfig {
    /// Restaurants that may carry offers.
    #[serde(default = "default_valid_restaurant_ids")]
    pub valid_restaurant_ids: Vec<u64>,
    /// Segment catalogue offers may target. Empty accepts any label.
    #[serde(default = "default_known_segments")]
    pub known_segments: Vec<String>,
    /// How long a discounted cart is remembered for re-apply detection.
    #[serde(default = "default_reapply_window_secs")]
    pub reapply_window_secs: u64,
    /// Upper bound on remembered carts; the oldest are evicted first.
    #[serde(default = "default_max_tracked_carts")]
    pub max_tracked_carts: usize,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    9001
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_segment_base_url() -> String {
    "http://localhost:1080".to_string()
}
fn default_segment_timeout_ms() -> u64 {
    2000
}
fn default_valid_restaurant_ids() -> Vec<u64> {
    vec![1, 2, 3]
}
fn default_known_segments() -> Vec<String> {
    vec!["p1".to_string(), "p2".to_string(), "p3".to_string()]
}
fn default_reapply_window_secs() -> u64 {
    3600
}
fn default_max_tracked_carts() -> usize {
    100_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for SegmentServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_segment_base_url(),
            timeout_ms: default_segment_timeout_ms(),
        }
    }
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            valid_restaurant_ids: default_valid_restaurant_ids(),
            known_segments: default_known_segments(),
            reapply_window_secs: default_reapply_window_secs(),
            max_tracked_carts: default_max_tracked_carts(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            segment_service: SegmentServiceConfig::default(),
            offers: OffersConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CART_OFFER")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("offers.valid_restaurant_ids")
                .with_list_parse_key("offers.known_segments"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 9001);
        assert_eq!(config.offers.valid_restaurant_ids, vec![1, 2, 3]);
        assert_eq!(config.segment_service.base_url, "http://localhost:1080");
        assert!(config.offers.known_segments.contains(&"p1".to_string()));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"api": {"http_port": 8088}, "offers": {"known_segments": []}}"#,
        )
        .unwrap();
        assert_eq!(config.api.http_port, 8088);
        assert_eq!(config.api.host, "0.0.0.0");
        assert!(config.offers.known_segments.is_empty());
        assert_eq!(config.offers.valid_restaurant_ids, vec![1, 2, 3]);
        assert_eq!(config.segment_service.timeout_ms, 2000);
        assert_eq!(config.offers.max_tracked_carts, 100_000);
    }

    #[test]
    fn test_load_lists_from_environment() {
        std::env::set_var("CART_OFFER__OFFERS__VALID_RESTAURANT_IDS", "1,2,5");
        std::env::set_var("CART_OFFER__OFFERS__KNOWN_SEGMENTS", "gold,silver");
        std::env::set_var("CART_OFFER__API__HTTP_PORT", "8181");

        let loaded = AppConfig::load();

        std::env::remove_var("CART_OFFER__OFFERS__VALID_RESTAURANT_IDS");
        std::env::remove_var("CART_OFFER__OFFERS__KNOWN_SEGMENTS");
        std::env::remove_var("CART_OFFER__API__HTTP_PORT");

        let config = loaded.unwrap();
        assert_eq!(config.offers.valid_restaurant_ids, vec![1, 2, 5]);
        assert_eq!(config.offers.known_segments, vec!["gold", "silver"]);
        assert_eq!(config.api.http_port, 8181);
        assert_eq!(config.node_id, "node-01");
    }
}
