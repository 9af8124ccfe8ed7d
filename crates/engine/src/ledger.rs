//! Remembers the last discounted value handed out per cart session so that
//! submitting that value again does not discount it a second time.
//! Entries expire after a time window and the ledger never holds more than
//! `max_entries` carts.

use dashmap::DashMap;
use offer_core::config::OffersConfig;
use offer_core::types::ApplyRequest;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartKey {
    /// Caller-supplied cart identifier.
    Cart(String),
    /// Fallback session when no cart id is given.
    ///
    /// This key cannot tell two carts of the same user apart: a new cart
    /// whose total equals the user's last discounted total at this
    /// restaurant is taken for a re-apply and left undiscounted until the
    /// entry expires. Callers that need exact tracking send a `cart_id`.
    UserRestaurant { user_id: u64, restaurant_id: u64 },
}

impl CartKey {
    pub fn for_request(request: &ApplyRequest) -> Self {
        match &request.cart_id {
            Some(id) if !id.is_empty() => CartKey::Cart(id.clone()),
            _ => CartKey::UserRestaurant {
                user_id: request.user_id,
                restaurant_id: request.restaurant_id,
            },
        }
    }
}

struct LedgerEntry {
    discounted_value: u64,
    recorded_at: Instant,
    /// Insertion sequence; the smallest is evicted first.
    seq: u64,
}

pub struct CartLedger {
    discounted: DashMap<CartKey, LedgerEntry>,
    ttl: Duration,
    max_entries: usize,
    next_seq: AtomicU64,
}

impl CartLedger {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            discounted: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &OffersConfig) -> Self {
        Self::new(
            Duration::from_secs(config.reapply_window_secs),
            config.max_tracked_carts,
        )
    }

    /// True when `cart_value` is exactly the value this session was last
    /// discounted to and the entry has not expired.
    pub fn is_reapply(&self, key: &CartKey, cart_value: u64) -> bool {
        let Some(entry) = self.discounted.get(key) else {
            return false;
        };
        if entry.recorded_at.elapsed() > self.ttl {
            drop(entry);
            self.discounted.remove(key);
            return false;
        }
        entry.discounted_value == cart_value
    }

    pub fn record(&self, key: CartKey, discounted_value: u64) {
        if self.discounted.len() >= self.max_entries
            && !self.discounted.contains_key(&key)
            && self.evict_expired() == 0
        {
            self.evict_oldest();
        }
        self.discounted.insert(
            key,
            LedgerEntry {
                discounted_value,
                recorded_at: Instant::now(),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            },
        );
    }

    /// Remove expired entries. Also run periodically from a background task.
    pub fn evict_expired(&self) -> usize {
        let before = self.discounted.len();
        self.discounted
            .retain(|_, entry| entry.recorded_at.elapsed() <= self.ttl);
        before.saturating_sub(self.discounted.len())
    }

    fn evict_oldest(&self) {
        let oldest = self
            .discounted
            .iter()
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.discounted.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.discounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discounted.is_empty()
    }
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::from_config(&OffersConfig::default())
    }
}
