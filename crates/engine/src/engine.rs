//! Offer engine: registers offers and computes the discounted cart value
//! for a user's segment at a restaurant.

use crate::ledger::{CartKey, CartLedger};
use offer_core::types::{AddOfferRequest, ApplyRequest};
use offer_core::{Offer, OfferError, OfferResult, OfferType};
use offer_segmentation::SegmentResolver;
use offer_store::OfferStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fold `offers` over `cart_value` in order. The result is never negative.
pub fn discount(cart_value: u64, offers: &[Offer]) -> u64 {
    offers
        .iter()
        .fold(cart_value, |value, offer| offer.apply_to(value))
}

pub struct OfferEngine {
    store: Arc<OfferStore>,
    segments: Arc<dyn SegmentResolver>,
    ledger: CartLedger,
}

impl OfferEngine {
    pub fn new(store: Arc<OfferStore>, segments: Arc<dyn SegmentResolver>) -> Self {
        info!(offers = store.len(), "Offer engine initialized");
        Self {
            store,
            segments,
            ledger: CartLedger::default(),
        }
    }

    /// Replace the default re-apply ledger, e.g. one sized from config.
    pub fn with_ledger(mut self, ledger: CartLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    /// Validate an add-offer request and append the offer to the store.
    pub fn add_offer(&self, request: &AddOfferRequest) -> OfferResult<Offer> {
        let offer_type: OfferType = request.offer_type.parse()?;
        let offer_value = u64::try_from(request.offer_value)
            .map_err(|_| OfferError::InvalidOfferValue(request.offer_value))?;

        let offer = Offer::new(
            request.restaurant_id,
            offer_type,
            offer_value,
            request.segments.iter().map(|s| s.trim().to_string()),
        );
        self.store.add_offer(offer.clone())?;

        info!(
            offer_id = %offer.id,
            restaurant_id = offer.restaurant_id,
            offer_type = %offer.offer_type,
            offer_value = offer.offer_value,
            segments = ?offer.segments,
            "Offer added"
        );
        metrics::counter!("offers.added").increment(1);
        Ok(offer)
    }

    /// Discount `cart_value` with every offer of `restaurant_id` targeting
    /// the user's segment. Lookup failures leave the value unchanged.
    pub async fn apply_offer(&self, user_id: u64, cart_value: u64, restaurant_id: u64) -> u64 {
        let segment = match self.segments.segment_for(user_id).await {
            Ok(segment) => segment,
            Err(e) => {
                warn!(user_id, restaurant_id, error = %e, "No segment for user, skipping offers");
                metrics::counter!("offers.segment_lookup_failed").increment(1);
                return cart_value;
            }
        };

        let offers = self.store.offers_for(restaurant_id, &segment);
        if offers.is_empty() {
            debug!(user_id, restaurant_id, segment = %segment, "No matching offers");
            return cart_value;
        }

        let final_value = discount(cart_value, &offers);
        debug!(
            user_id,
            restaurant_id,
            segment = %segment,
            offers = offers.len(),
            cart_value,
            final_value,
            "Offers applied"
        );
        metrics::counter!("offers.applied").increment(offers.len() as u64);
        final_value
    }

    /// Apply offers for one cart session. Re-submitting the value this
    /// session was last discounted to returns it unchanged.
    pub async fn apply_to_cart(&self, request: &ApplyRequest) -> OfferResult<u64> {
        let cart_value = u64::try_from(request.cart_value)
            .map_err(|_| OfferError::InvalidCartValue(request.cart_value))?;

        let key = CartKey::for_request(request);
        if self.ledger.is_reapply(&key, cart_value) {
            debug!(
                user_id = request.user_id,
                restaurant_id = request.restaurant_id,
                cart_value,
                "Offer already applied to this cart"
            );
            metrics::counter!("offers.reapply_skipped").increment(1);
            return Ok(cart_value);
        }

        let final_value = self
            .apply_offer(request.user_id, cart_value, request.restaurant_id)
            .await;
        if final_value != cart_value {
            self.ledger.record(key, final_value);
        }
        Ok(final_value)
    }
}
