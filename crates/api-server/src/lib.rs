#![warn(clippy::unwrap_used)]

pub mod offer_rest;
pub mod rest;
pub mod server;

pub use rest::AppState;
pub use server::{router, ApiServer};
