#![warn(clippy::unwrap_used)]

pub mod engine;
pub mod ledger;

pub use engine::{discount, OfferEngine};
pub use ledger::{CartKey, CartLedger};
