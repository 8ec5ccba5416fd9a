//! Recently viewed businesses

use super::persist;
use crate::data::{Business, Category};
use crate::store::LocalStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const RECENT_KEY: &str = "recently-viewed";

/// How many businesses the history keeps
pub const MAX_RECENT_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

/// Most recently opened businesses, newest first
#[derive(Debug, Clone, Default)]
pub struct RecentlyViewed {
    items: Vec<RecentEntry>,
    store: Option<LocalStore>,
}

impl RecentlyViewed {
    pub fn load(store: Option<LocalStore>) -> Self {
        let mut items: Vec<RecentEntry> = store
            .as_ref()
            .and_then(|s| s.load(RECENT_KEY))
            .unwrap_or_default();
        items.truncate(MAX_RECENT_ITEMS);
        Self { items, store }
    }

    pub fn items(&self) -> &[RecentEntry] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Puts a business at the front of the history
    ///
    /// A business already in the history moves to the front instead of
    /// appearing twice. The oldest entry drops off past the limit.
    pub fn record(&mut self, business: &Business) {
        self.items.retain(|entry| entry.id != business.id);
        self.items.insert(
            0,
            RecentEntry {
                id: business.id.clone(),
                name: business.name.clone(),
                category: business.category,
                image_url: business.image_url.clone(),
                viewed_at: Utc::now(),
            },
        );
        self.items.truncate(MAX_RECENT_ITEMS);
        self.save();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    fn save(&self) {
        persist(self.store.as_ref(), RECENT_KEY, &self.items);
    }
}
