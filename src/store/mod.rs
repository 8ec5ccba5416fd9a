//! Local persistence for user data
//!
//! Favorites, recently viewed businesses, the itinerary and the last active
//! category survive restarts as small JSON documents under the XDG data
//! directory.

mod local;

pub use local::{LocalStore, StoreError, Stored};
