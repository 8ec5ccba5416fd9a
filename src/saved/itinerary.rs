//! Trip itinerary
//!
//! An ordered list of stops. Positions are 1-based and always contiguous:
//! removing a stop renumbers the ones after it.

use super::persist;
use crate::data::{Business, Category, Location};
use crate::store::LocalStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

const ITINERARY_KEY: &str = "itinerary";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub address: Option<String>,
    /// 1-based position in the trip
    pub order: usize,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Itinerary {
    items: Vec<ItineraryItem>,
    store: Option<LocalStore>,
}

impl Itinerary {
    pub fn load(store: Option<LocalStore>) -> Self {
        let mut itinerary = Self {
            items: store
                .as_ref()
                .and_then(|s| s.load(ITINERARY_KEY))
                .unwrap_or_default(),
            store,
        };
        itinerary.items.sort_by_key(|item| item.order);
        itinerary.renumber();
        itinerary
    }

    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Appends a business as the last stop
    ///
    /// # Returns
    /// `false` without changing anything if the business is already planned
    pub fn add(&mut self, business: &Business) -> bool {
        if self.contains(&business.id) {
            return false;
        }

        self.items.push(ItineraryItem {
            id: business.id.clone(),
            name: business.name.clone(),
            category: business.category,
            image_url: business.image_url.clone(),
            location: business.location,
            address: business.address.clone(),
            order: self.items.len() + 1,
            added_at: Utc::now(),
        });

        info!(id = %business.id, stops = self.items.len(), "Added itinerary stop");
        self.save();
        true
    }

    /// Removes a stop and renumbers the rest
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return false;
        }

        self.renumber();
        self.save();
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = index + 1;
        }
    }

    fn save(&self) {
        persist(self.store.as_ref(), ITINERARY_KEY, &self.items);
    }
}
