//! Offer domain types shared by the store, the engine and the HTTP layer.

use crate::error::OfferError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of discount an offer grants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OfferType {
    /// Fixed amount off the cart value.
    #[serde(rename = "FLATX", alias = "FLAT_AMOUNT")]
    FlatAmount,
    /// Percentage of the current cart value, rounded down.
    #[serde(rename = "FLATX%", alias = "FLAT_PERCENT")]
    FlatPercent,
}

impl OfferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::FlatAmount => "FLATX",
            OfferType::FlatPercent => "FLATX%",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferType {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "FLATX" | "FLAT_AMOUNT" => Ok(OfferType::FlatAmount),
            "FLATX%" | "FLAT_PERCENT" => Ok(OfferType::FlatPercent),
            other => Err(OfferError::InvalidOfferType(other.to_string())),
        }
    }
}

/// A discount registered for one restaurant and targeted at user segments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: Uuid,
    pub restaurant_id: u64,
    pub offer_type: OfferType,
    pub offer_value: u64,
    /// Segment labels in the order they were submitted, without duplicates.
    pub segments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(
        restaurant_id: u64,
        offer_type: OfferType,
        offer_value: u64,
        segments: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for segment in segments {
            if !unique.contains(&segment) {
                unique.push(segment);
            }
        }
        Self {
            id: Uuid::new_v4(),
            restaurant_id,
            offer_type,
            offer_value,
            segments: unique,
            created_at: Utc::now(),
        }
    }

    pub fn targets(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }

    /// Apply this offer once to `value`. Never goes below zero.
    pub fn apply_to(&self, value: u64) -> u64 {
        match self.offer_type {
            OfferType::FlatAmount => value.saturating_sub(self.offer_value),
            OfferType::FlatPercent => {
                let off = (value as u128 * self.offer_value as u128) / 100;
                let off = u64::try_from(off).unwrap_or(u64::MAX);
                value.saturating_sub(off)
            }
        }
    }
}

// ─── Wire types ─────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/offer`. Fields stay loosely typed so that bad
/// values surface as domain errors instead of body rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOfferRequest {
    pub restaurant_id: u64,
    pub offer_type: String,
    pub offer_value: i64,
    #[serde(default)]
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddOfferResponse {
    pub response_msg: String,
}

impl AddOfferResponse {
    pub fn success() -> Self {
        Self {
            response_msg: "success".to_string(),
        }
    }
}

/// Body of `POST /api/v1/cart/apply_offer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub user_id: u64,
    pub cart_value: i64,
    pub restaurant_id: u64,
    /// Optional cart session identifier used to recognise re-applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyResponse {
    pub cart_value: u64,
}

/// Payload returned by the external segment service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentResponse {
    pub segment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(offer_type: OfferType, value: u64) -> Offer {
        Offer::new(1, offer_type, value, vec!["p1".to_string()])
    }

    #[test]
    fn test_parse_offer_type_labels() {
        assert_eq!("FLATX".parse::<OfferType>().unwrap(), OfferType::FlatAmount);
        assert_eq!("FLATX%".parse::<OfferType>().unwrap(), OfferType::FlatPercent);
        assert_eq!(
            "FLAT_PERCENT".parse::<OfferType>().unwrap(),
            OfferType::FlatPercent
        );
        let err = "INVALID_OFFER".parse::<OfferType>().unwrap_err();
        assert!(matches!(err, OfferError::InvalidOfferType(ref s) if s == "INVALID_OFFER"));
    }

    #[test]
    fn test_offer_type_serializes_as_wire_label() {
        let json = serde_json::to_string(&OfferType::FlatPercent).unwrap();
        assert_eq!(json, "\"FLATX%\"");
        let parsed: OfferType = serde_json::from_str("\"FLAT_AMOUNT\"").unwrap();
        assert_eq!(parsed, OfferType::FlatAmount);
    }

    #[test]
    fn test_flat_amount_clamps_at_zero() {
        assert_eq!(offer(OfferType::FlatAmount, 20).apply_to(200), 180);
        assert_eq!(offer(OfferType::FlatAmount, 300).apply_to(200), 0);
    }

    #[test]
    fn test_flat_percent_rounds_down() {
        assert_eq!(offer(OfferType::FlatPercent, 20).apply_to(200), 160);
        // 15% of 99 is 14.85, floored to 14
        assert_eq!(offer(OfferType::FlatPercent, 15).apply_to(99), 85);
        assert_eq!(offer(OfferType::FlatPercent, 150).apply_to(200), 0);
    }

    #[test]
    fn test_segments_are_deduplicated() {
        let offer = Offer::new(
            1,
            OfferType::FlatAmount,
            10,
            vec!["p1".to_string(), "p2".to_string(), "p1".to_string()],
        );
        assert_eq!(offer.segments, vec!["p1", "p2"]);
        assert!(offer.targets("p2"));
        assert!(!offer.targets("p3"));
    }

    #[test]
    fn test_apply_request_without_cart_id() {
        let req: ApplyRequest =
            serde_json::from_str(r#"{"cart_value":200,"user_id":1,"restaurant_id":1}"#).unwrap();
        assert_eq!(req.cart_value, 200);
        assert!(req.cart_id.is_none());
    }
}
