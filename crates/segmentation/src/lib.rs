//! User segment resolution. The offer engine only sees the
//! [`SegmentResolver`] capability; [`HttpSegmentClient`] is the production
//! implementation talking to the external segment service.

#![warn(clippy::unwrap_used)]

pub mod client;

pub use client::{HttpSegmentClient, SegmentResolver};
