//! In-process offer table backed by DashMap.
//! Each restaurant owns an ordered list of offers; insertion order is the
//! order in which discounts are applied.

use dashmap::DashMap;
use offer_core::config::OffersConfig;
use offer_core::{Offer, OfferError, OfferResult};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct OfferStore {
    offers: DashMap<u64, Vec<Offer>>,
    valid_restaurants: HashSet<u64>,
    known_segments: HashSet<String>,
}

impl OfferStore {
    pub fn new(config: &OffersConfig) -> Self {
        info!(
            restaurants = config.valid_restaurant_ids.len(),
            segments = config.known_segments.len(),
            "Offer store initialized"
        );
        Self {
            offers: DashMap::with_capacity(config.valid_restaurant_ids.len()),
            valid_restaurants: config.valid_restaurant_ids.iter().copied().collect(),
            known_segments: config.known_segments.iter().cloned().collect(),
        }
    }

    pub fn is_valid_restaurant(&self, restaurant_id: u64) -> bool {
        self.valid_restaurants.contains(&restaurant_id)
    }

    fn validate(&self, offer: &Offer) -> OfferResult<()> {
        if !self.is_valid_restaurant(offer.restaurant_id) {
            return Err(OfferError::InvalidRestaurant(offer.restaurant_id));
        }
        if offer.segments.is_empty() {
            return Err(OfferError::InvalidSegment(
                "offer must target at least one segment".to_string(),
            ));
        }
        if !self.known_segments.is_empty() {
            if let Some(unknown) = offer
                .segments
                .iter()
                .find(|s| !self.known_segments.contains(s.as_str()))
            {
                return Err(OfferError::InvalidSegment(unknown.clone()));
            }
        }
        Ok(())
    }

    /// Validate and append an offer to its restaurant's sequence.
    /// A rejected offer leaves the store untouched.
    pub fn add_offer(&self, offer: Offer) -> OfferResult<()> {
        self.validate(&offer)?;

        debug!(
            offer_id = %offer.id,
            restaurant_id = offer.restaurant_id,
            offer_type = %offer.offer_type,
            offer_value = offer.offer_value,
            "Storing offer"
        );

        // The entry guard holds the shard lock, so the push is atomic per restaurant.
        self.offers
            .entry(offer.restaurant_id)
            .or_default()
            .push(offer);
        metrics::counter!("store.offers").increment(1);
        Ok(())
    }

    /// Offers of `restaurant_id` that target `segment`, in insertion order.
    pub fn offers_for(&self, restaurant_id: u64, segment: &str) -> Vec<Offer> {
        match self.offers.get(&restaurant_id) {
            Some(list) => list.iter().filter(|o| o.targets(segment)).cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn offers_by_restaurant(&self, restaurant_id: u64) -> Vec<Offer> {
        self.offers
            .get(&restaurant_id)
            .map(|list| list.value().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.offers.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
