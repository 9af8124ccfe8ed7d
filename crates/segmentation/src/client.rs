//! HTTP client for the external user-segment service.

use async_trait::async_trait;
use offer_core::config::SegmentServiceConfig;
use offer_core::types::SegmentResponse;
use offer_core::{OfferError, OfferResult};
use std::time::Duration;
use tracing::{debug, warn};

const SEGMENT_PATH: &str = "/api/v1/user_segment";

/// Resolves a user id to the segment label used for offer targeting.
#[async_trait]
pub trait SegmentResolver: Send + Sync {
    async fn segment_for(&self, user_id: u64) -> OfferResult<String>;
}

pub struct HttpSegmentClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpSegmentClient {
    pub fn new(config: &SegmentServiceConfig) -> OfferResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| OfferError::Config(format!("segment http client: {e}")))?;

        let endpoint = format!("{}{}", config.base_url.trim_end_matches('/'), SEGMENT_PATH);
        debug!(endpoint = %endpoint, timeout_ms = config.timeout_ms, "Segment client configured");

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, user_id: u64) -> Result<String, String> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("user_id", user_id)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("segment service returned {status}"));
        }

        let body = response.bytes().await.map_err(|e| e.to_string())?;
        let parsed: SegmentResponse =
            serde_json::from_slice(&body).map_err(|e| format!("malformed body: {e}"))?;
        Ok(parsed.segment)
    }
}

#[async_trait]
impl SegmentResolver for HttpSegmentClient {
    async fn segment_for(&self, user_id: u64) -> OfferResult<String> {
        match self.fetch(user_id).await {
            Ok(segment) => {
                debug!(user_id, segment = %segment, "Resolved user segment");
                Ok(segment)
            }
            Err(reason) => {
                warn!(user_id, error = %reason, "Segment lookup failed");
                metrics::counter!("segment.lookup_failures").increment(1);
                Err(OfferError::SegmentLookupFailed(reason))
            }
        }
    }
}
