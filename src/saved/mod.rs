//! User collections that survive restarts
//!
//! Each collection keeps its entries in memory and writes the whole list
//! through a [`LocalStore`] after every change. Without a store (no home
//! directory, or in tests) the collections work in memory only.

mod favorites;
mod itinerary;
mod recent;

pub use favorites::{FavoriteEntry, Favorites};
pub use itinerary::{Itinerary, ItineraryItem};
pub use recent::{RecentEntry, RecentlyViewed, MAX_RECENT_ITEMS};

use crate::data::CategoryFilter;
use crate::store::LocalStore;
use serde::Serialize;
use tracing::warn;

const ACTIVE_CATEGORY_KEY: &str = "active-category";

/// Saves `data` under `key`, logging instead of failing
fn persist<T: Serialize>(store: Option<&LocalStore>, key: &str, data: &T) {
    if let Some(store) = store {
        if let Err(e) = store.save(key, data) {
            warn!(key, error = %e, "Failed to save user data");
        }
    }
}

/// The category that was active when the application last ran
pub fn load_active_category(store: Option<&LocalStore>) -> Option<CategoryFilter> {
    let id: String = store?.load(ACTIVE_CATEGORY_KEY)?;
    CategoryFilter::parse(&id)
}

/// Remembers the active category for the next run
pub fn save_active_category(store: Option<&LocalStore>, category: CategoryFilter) {
    persist(store, ACTIVE_CATEGORY_KEY, &category.id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;
    use tempfile::TempDir;

    #[test]
    fn test_active_category_roundtrip() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = LocalStore::with_dir(temp_dir.path());

        assert_eq!(load_active_category(Some(&store)), None);

        save_active_category(Some(&store), CategoryFilter::Only(Category::Lodging));
        assert_eq!(
            load_active_category(Some(&store)),
            Some(CategoryFilter::Only(Category::Lodging))
        );

        save_active_category(Some(&store), CategoryFilter::All);
        assert_eq!(load_active_category(Some(&store)), Some(CategoryFilter::All));
    }

    #[test]
    fn test_active_category_without_store() {
        save_active_category(None, CategoryFilter::All);
        assert_eq!(load_active_category(None), None);
    }
}
