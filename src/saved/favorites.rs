//! Favorite businesses

use super::persist;
use crate::data::{Business, Category};
use crate::store::LocalStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    fn from_business(business: &Business) -> Self {
        Self {
            id: business.id.clone(),
            name: business.name.clone(),
            category: business.category,
            image_url: business.image_url.clone(),
            added_at: Utc::now(),
        }
    }
}

/// Businesses the user has starred, oldest first
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    items: Vec<FavoriteEntry>,
    store: Option<LocalStore>,
}

impl Favorites {
    /// Loads saved favorites, starting empty if there are none
    pub fn load(store: Option<LocalStore>) -> Self {
        let items = store
            .as_ref()
            .and_then(|s| s.load(FAVORITES_KEY))
            .unwrap_or_default();
        Self { items, store }
    }

    pub fn items(&self) -> &[FavoriteEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.items.iter().any(|entry| entry.id == id)
    }

    /// Stars or unstars a business
    ///
    /// # Returns
    /// `true` if the business is a favorite afterwards
    pub fn toggle(&mut self, business: &Business) -> bool {
        let now_favorite = if self.is_favorite(&business.id) {
            self.items.retain(|entry| entry.id != business.id);
            false
        } else {
            self.items.push(FavoriteEntry::from_business(business));
            true
        };

        info!(id = %business.id, favorite = now_favorite, "Toggled favorite");
        self.save();
        now_favorite
    }

    /// Unstars a business by id, returning whether it was a favorite
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|entry| entry.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    fn save(&self) {
        persist(self.store.as_ref(), FAVORITES_KEY, &self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn winery(id: &str) -> Business {
        let mut business = Business::new(id, format!("Winery {id}"), Category::Wineries);
        business.image_url = Some(format!("https://example.com/{id}.jpg"));
        business
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::default();

        assert!(favorites.toggle(&winery("a")));
        assert!(favorites.is_favorite("a"));
        assert_eq!(favorites.items()[0].image_url.as_deref(), Some("https://example.com/a.jpg"));

        assert!(!favorites.toggle(&winery("a")));
        assert!(!favorites.is_favorite("a"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let mut favorites = Favorites::default();
        favorites.toggle(&winery("a"));
        favorites.toggle(&winery("b"));

        assert!(favorites.remove("a"));
        assert!(!favorites.remove("a"));
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.items()[0].id, "b");
    }

    #[test]
    fn test_favorites_persist_across_loads() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = LocalStore::with_dir(temp_dir.path());

        let mut favorites = Favorites::load(Some(store.clone()));
        favorites.toggle(&winery("a"));
        favorites.toggle(&winery("b"));

        let reloaded = Favorites::load(Some(store));
        let ids: Vec<_> = reloaded.items().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(reloaded.items()[0].category, Category::Wineries);
    }
}
