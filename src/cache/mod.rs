//! Cache module for API responses
//!
//! Holds the in-memory `ResponseCache` used by the listing client. Fresh
//! reads avoid redundant network calls; expired entries stay readable through
//! `get_ignoring_expiry` so the client can degrade gracefully when the API is
//! unavailable.

mod response;

pub use response::{ResponseCache, DEFAULT_SWEEP_PROBABILITY};
