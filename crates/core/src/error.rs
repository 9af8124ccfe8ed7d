use thiserror::Error;

pub type OfferResult<T> = Result<T, OfferError>;

#[derive(Error, Debug)]
pub enum OfferError {
    #[error("Unknown restaurant: {0}")]
    InvalidRestaurant(u64),

    #[error("Unrecognized offer type: {0}")]
    InvalidOfferType(String),

    #[error("Offer value must be non-negative, got {0}")]
    InvalidOfferValue(i64),

    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    #[error("Cart value must be non-negative, got {0}")]
    InvalidCartValue(i64),

    #[error("Segment lookup failed: {0}")]
    SegmentLookupFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OfferError {
    /// Stable machine-readable code used in API error bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            OfferError::InvalidRestaurant(_) => "invalid_restaurant",
            OfferError::InvalidOfferType(_) => "invalid_offer_type",
            OfferError::InvalidOfferValue(_) => "invalid_offer_value",
            OfferError::InvalidSegment(_) => "invalid_segment",
            OfferError::InvalidCartValue(_) => "invalid_cart_value",
            OfferError::SegmentLookupFailed(_) => "segment_lookup_failed",
            OfferError::Config(_) => "config_error",
        }
    }

    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OfferError::InvalidRestaurant(_)
                | OfferError::InvalidOfferType(_)
                | OfferError::InvalidOfferValue(_)
                | OfferError::InvalidSegment(_)
                | OfferError::InvalidCartValue(_)
        )
    }
}
