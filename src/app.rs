//! Application state management for the Fredericksburg directory
//!
//! This module contains the main application state, handling keyboard input,
//! directory events and state transitions between the different views.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::StartupConfig;
use crate::data::geo::{annotate_distances, annotate_visibility};
use crate::data::{
    filters_for, BoundingBox, Business, CategoryFilter, FilterDefinition, Location,
};
use crate::events::{publish, DirectoryEvent};
use crate::pipeline::{Page, PipelineState};
use crate::saved::{self, Favorites, Itinerary, RecentlyViewed};
use crate::store::LocalStore;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first listing load
    Loading,
    /// Filterable, paginated list of businesses
    Directory,
    /// Detail view for one business
    Details(String),
    /// Favorites, history and itinerary
    Saved(SavedTab),
}

/// Tabs of the saved-items view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedTab {
    Favorites,
    Recent,
    Itinerary,
}

impl SavedTab {
    pub fn all() -> [SavedTab; 3] {
        [SavedTab::Favorites, SavedTab::Recent, SavedTab::Itinerary]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SavedTab::Favorites => "Favorites",
            SavedTab::Recent => "Recently Viewed",
            SavedTab::Itinerary => "Itinerary",
        }
    }

    pub fn next(&self) -> SavedTab {
        match self {
            SavedTab::Favorites => SavedTab::Recent,
            SavedTab::Recent => SavedTab::Itinerary,
            SavedTab::Itinerary => SavedTab::Favorites,
        }
    }
}

/// Whether keystrokes go to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// One selectable option of the category filters
#[derive(Debug, Clone, Copy)]
pub struct FilterOption {
    pub definition: &'static FilterDefinition,
    pub value: &'static str,
    pub label: &'static str,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    pub input_mode: InputMode,
    /// Every business loaded for the current area, in fetch order
    pub businesses: Vec<Business>,
    /// Category, search, filters and page
    pub pipeline: PipelineState,
    /// Index of the selected business on the current page
    pub selected_index: usize,
    /// Index into [`App::filter_options`]
    pub filter_cursor: usize,
    /// Index of the selected entry in the saved view
    pub saved_cursor: usize,
    /// Transient notification for the status bar
    pub status: Option<String>,
    /// The last load failed with nothing cached
    pub load_error: Option<String>,
    /// The listings shown are an expired cached copy
    pub stale: bool,
    pub user_location: Option<Location>,
    /// Area listings are loaded for
    pub bounds: BoundingBox,
    pub favorites: Favorites,
    pub recent: RecentlyViewed,
    pub itinerary: Itinerary,
    /// Timestamp of last data refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Page requested at startup, applied once data arrives
    pending_page: Option<usize>,
    store: Option<LocalStore>,
    events: Option<mpsc::Sender<DirectoryEvent>>,
}

impl App {
    /// Creates an App with in-memory saved items and no event channel
    ///
    /// # Arguments
    /// * `page_size` - Results per page
    /// * `bounds` - Area listings are loaded for
    pub fn new(page_size: usize, bounds: BoundingBox) -> Self {
        Self {
            state: AppState::Loading,
            input_mode: InputMode::Normal,
            businesses: Vec::new(),
            pipeline: PipelineState::new(page_size),
            selected_index: 0,
            filter_cursor: 0,
            saved_cursor: 0,
            status: None,
            load_error: None,
            stale: false,
            user_location: None,
            bounds,
            favorites: Favorites::default(),
            recent: RecentlyViewed::default(),
            itinerary: Itinerary::default(),
            last_refresh: None,
            refresh_requested: false,
            show_help: false,
            should_quit: false,
            pending_page: None,
            store: None,
            events: None,
        }
    }

    /// Loads saved items and the last active category from a store
    pub fn with_store(mut self, store: Option<LocalStore>) -> Self {
        self.favorites = Favorites::load(store.clone());
        self.recent = RecentlyViewed::load(store.clone());
        self.itinerary = Itinerary::load(store.clone());
        if let Some(category) = saved::load_active_category(store.as_ref()) {
            self.pipeline.set_category(category);
        }
        self.store = store;
        self
    }

    /// Routes state-change notifications through the event channel
    pub fn with_events(mut self, sender: mpsc::Sender<DirectoryEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Applies CLI arguments
    ///
    /// An explicit category overrides the one restored from the store. The
    /// page is applied once listings have loaded.
    pub fn apply_startup_config(&mut self, config: &StartupConfig) {
        if let Some(category) = config.category {
            self.set_category(category);
        }
        if let Some(search) = &config.search {
            self.pipeline.set_search(search.clone());
        }
        if let Some(location) = config.user_location {
            self.set_user_location(location);
        }
        if config.page > 1 {
            self.pending_page = Some(config.page);
        }
    }

    /// The page of businesses currently shown
    pub fn current_page(&self) -> Page<Business> {
        self.pipeline.view(&self.businesses)
    }

    /// The business under the cursor in the directory
    pub fn selected_business(&self) -> Option<Business> {
        self.current_page().items.into_iter().nth(self.selected_index)
    }

    /// Looks up a loaded business by id
    pub fn business_by_id(&self, id: &str) -> Option<&Business> {
        self.businesses.iter().find(|b| b.id == id)
    }

    /// Every option of the filters offered for the active category, in order
    pub fn filter_options(&self) -> Vec<FilterOption> {
        filters_for(self.pipeline.category())
            .iter()
            .flat_map(|definition| {
                definition
                    .options
                    .iter()
                    .map(move |&(value, label)| FilterOption {
                        definition,
                        value,
                        label,
                    })
            })
            .collect()
    }

    /// Switches category, persisting the choice
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.pipeline.set_category(category);
        self.selected_index = 0;
        self.filter_cursor = 0;
        self.notify(DirectoryEvent::CategoryChanged(category));
    }

    /// Sets the user's location and recomputes distances
    pub fn set_user_location(&mut self, location: Location) {
        self.user_location = Some(location);
        annotate_distances(&mut self.businesses, &location);
        self.notify(DirectoryEvent::DistancesUpdated);
    }

    /// Sends an event through the channel, or handles it in place without one
    fn notify(&mut self, event: DirectoryEvent) {
        match self.events.clone() {
            Some(sender) => publish(&sender, event),
            None => self.handle_event(event),
        }
    }

    /// Applies an event from the event channel
    pub fn handle_event(&mut self, event: DirectoryEvent) {
        match event {
            DirectoryEvent::LoadStarted => {
                self.status = Some("Loading businesses...".to_string());
            }
            DirectoryEvent::DataLoaded { businesses, stale } => {
                self.load_businesses(businesses, stale);
            }
            DirectoryEvent::LoadFailed(message) => {
                self.status = Some("Could not load businesses".to_string());
                self.load_error = Some(message);
                if self.state == AppState::Loading {
                    self.state = AppState::Directory;
                }
            }
            DirectoryEvent::CategoryChanged(category) => {
                saved::save_active_category(self.store.as_ref(), category);
            }
            DirectoryEvent::FiltersChanged(criteria) => {
                debug!(filters = criteria.len(), "Filters changed");
                self.status = Some(match criteria.len() {
                    0 => "Filters cleared".to_string(),
                    1 => "1 filter active".to_string(),
                    n => format!("{} filters active", n),
                });
                self.clamp_selection();
            }
            DirectoryEvent::DistancesUpdated => {
                if let Some(location) = self.user_location {
                    debug!(lat = location.lat, lng = location.lng, "Distances updated");
                }
            }
        }
    }

    /// Replaces the loaded businesses and annotates them
    fn load_businesses(&mut self, mut businesses: Vec<Business>, stale: bool) {
        if let Some(location) = self.user_location {
            annotate_distances(&mut businesses, &location);
        }
        annotate_visibility(&mut businesses, &self.bounds);

        info!(count = businesses.len(), stale, "Businesses loaded");
        self.businesses = businesses;
        self.stale = stale;
        self.load_error = None;
        self.last_refresh = Some(Local::now());
        self.status = stale.then(|| "Using cached data due to connection issues".to_string());

        let total = self.current_page().total_pages;
        if let Some(page) = self.pending_page.take() {
            self.pipeline.go_to_page(page, total);
        }
        // A reload may shrink the result set below the current page
        if !self.current_page().is_in_range() {
            self.pipeline.go_to_page(total, total);
        }
        self.clamp_selection();

        if self.state == AppState::Loading {
            self.state = AppState::Directory;
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application (`Esc` too, in the directory)
    /// - `Tab`/`BackTab`, `0`-`6`: Change category
    /// - `/`: Search; `Enter` keeps the term, `Esc` clears it
    /// - `Up`/`k`, `Down`/`j`: Move selection
    /// - `Right`/`n`, `Left`/`N`: Next or previous page
    /// - `Enter`: Open details of the selected business
    /// - `s`: Toggle favorite, `a`: Add to itinerary
    /// - `[`/`]`: Move the filter cursor, `Space`: toggle the filter option
    /// - `x`: Clear search and filters
    /// - `v`: Saved items; `Tab` switches tabs, `d` removes, `c` clears
    /// - `r`: Refresh, `?`: Help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key_event);
            return;
        }

        match self.state.clone() {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Directory => self.handle_directory_key(key_event),
            AppState::Details(id) => self.handle_details_key(key_event, &id),
            AppState::Saved(tab) => self.handle_saved_key(key_event, tab),
        }
    }

    fn handle_directory_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.set_category(self.pipeline.category().next());
            }
            KeyCode::BackTab => {
                self.set_category(self.pipeline.category().previous());
            }
            KeyCode::Char(c @ '0'..='9') => {
                let index = c as usize - '0' as usize;
                if let Some(&category) = CategoryFilter::choices().get(index) {
                    self.set_category(category);
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Right | KeyCode::Char('n') => {
                let total = self.current_page().total_pages;
                if self.pipeline.next_page(total) {
                    self.selected_index = 0;
                }
            }
            KeyCode::Left | KeyCode::Char('N') => {
                if self.pipeline.prev_page() {
                    self.selected_index = 0;
                }
            }
            KeyCode::Enter => {
                if let Some(business) = self.selected_business() {
                    self.open_details(&business);
                }
            }
            KeyCode::Char('s') => {
                if let Some(business) = self.selected_business() {
                    self.toggle_favorite(&business);
                }
            }
            KeyCode::Char('a') => {
                if let Some(business) = self.selected_business() {
                    self.add_to_itinerary(&business);
                }
            }
            KeyCode::Char(']') => {
                let count = self.filter_options().len();
                if count > 0 {
                    self.filter_cursor = (self.filter_cursor + 1) % count;
                }
            }
            KeyCode::Char('[') => {
                let count = self.filter_options().len();
                if count > 0 {
                    self.filter_cursor = (self.filter_cursor + count - 1) % count;
                }
            }
            KeyCode::Char(' ') => {
                self.toggle_filter_option();
            }
            KeyCode::Char('x') => {
                self.pipeline.reset();
                self.selected_index = 0;
                self.notify(DirectoryEvent::FiltersChanged(self.pipeline.criteria().clone()));
            }
            KeyCode::Char('v') => {
                self.saved_cursor = 0;
                self.state = AppState::Saved(SavedTab::Favorites);
            }
            KeyCode::Char('r') => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_details_key(&mut self, key_event: KeyEvent, id: &str) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.state = AppState::Directory;
            }
            KeyCode::Char('s') => {
                if let Some(business) = self.business_by_id(id).cloned() {
                    self.toggle_favorite(&business);
                }
            }
            KeyCode::Char('a') => {
                if let Some(business) = self.business_by_id(id).cloned() {
                    self.add_to_itinerary(&business);
                }
            }
            KeyCode::Char('r') => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_saved_key(&mut self, key_event: KeyEvent, tab: SavedTab) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc | KeyCode::Char('v') => {
                self.state = AppState::Directory;
            }
            KeyCode::Tab => {
                self.saved_cursor = 0;
                self.state = AppState::Saved(tab.next());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.saved_cursor = self.saved_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.saved_cursor + 1 < self.saved_ids(tab).len() {
                    self.saved_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let business = self
                    .saved_ids(tab)
                    .get(self.saved_cursor)
                    .and_then(|id| self.business_by_id(id))
                    .cloned();
                match business {
                    Some(business) => self.open_details(&business),
                    None => {
                        self.status = Some("Not in the loaded area".to_string());
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.saved_ids(tab).get(self.saved_cursor).cloned() {
                    match tab {
                        SavedTab::Favorites => {
                            self.favorites.remove(&id);
                        }
                        SavedTab::Itinerary => {
                            self.itinerary.remove(&id);
                            self.status = Some("Removed from your itinerary".to_string());
                        }
                        SavedTab::Recent => {}
                    }
                    self.clamp_saved_cursor(tab);
                }
            }
            KeyCode::Char('c') => {
                match tab {
                    SavedTab::Recent => self.recent.clear(),
                    SavedTab::Itinerary => self.itinerary.clear(),
                    SavedTab::Favorites => {}
                }
                self.clamp_saved_cursor(tab);
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.pipeline.set_search(String::new());
                self.selected_index = 0;
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                let mut term = self.pipeline.search().to_string();
                term.pop();
                self.pipeline.set_search(term);
                self.selected_index = 0;
            }
            KeyCode::Char(c) => {
                let mut term = self.pipeline.search().to_string();
                term.push(c);
                self.pipeline.set_search(term);
                self.selected_index = 0;
            }
            _ => {}
        }
    }

    fn open_details(&mut self, business: &Business) {
        self.recent.record(business);
        self.state = AppState::Details(business.id.clone());
    }

    fn toggle_favorite(&mut self, business: &Business) {
        let now_favorite = self.favorites.toggle(business);
        self.status = Some(if now_favorite {
            format!("Added {} to favorites", business.name)
        } else {
            format!("Removed {} from favorites", business.name)
        });
    }

    fn add_to_itinerary(&mut self, business: &Business) {
        self.status = Some(if self.itinerary.add(business) {
            format!("Added {} to your itinerary", business.name)
        } else {
            format!("{} is already in your itinerary", business.name)
        });
    }

    /// Toggles the filter option under the filter cursor
    pub fn toggle_filter_option(&mut self) {
        let Some(option) = self.filter_options().get(self.filter_cursor).copied() else {
            return;
        };
        self.pipeline.toggle_option(option.definition, option.value);
        self.selected_index = 0;
        self.notify(DirectoryEvent::FiltersChanged(self.pipeline.criteria().clone()));
    }

    /// Ids listed on a saved-items tab, in display order
    pub fn saved_ids(&self, tab: SavedTab) -> Vec<String> {
        match tab {
            SavedTab::Favorites => self.favorites.items().iter().map(|e| e.id.clone()).collect(),
            SavedTab::Recent => self.recent.items().iter().map(|e| e.id.clone()).collect(),
            SavedTab::Itinerary => self.itinerary.items().iter().map(|e| e.id.clone()).collect(),
        }
    }

    /// Moves the selection up on the current page, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.current_page().items.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down on the current page, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.current_page().items.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn clamp_selection(&mut self) {
        let count = self.current_page().items.len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    fn clamp_saved_cursor(&mut self, tab: SavedTab) {
        let count = self.saved_ids(tab).len();
        if self.saved_cursor >= count {
            self.saved_cursor = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::{DEFAULT_BOUNDS, DEFAULT_CENTER};
    use crate::data::{Attribute, Category};
    use crate::events::EventBus;
    use crate::pipeline::FilterValue;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key_event(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn sample_businesses() -> Vec<Business> {
        let mut businesses = Vec::new();
        for i in 1..=12 {
            let mut winery = Business::new(format!("w{i}"), format!("Winery {i}"), Category::Wineries);
            winery.price_range = Some(if i % 2 == 0 { 2 } else { 3 });
            winery.location = Some(DEFAULT_CENTER);
            businesses.push(winery);
        }
        let mut grill = Business::new("r1", "Hauptstrasse Grill", Category::Restaurants);
        grill.cuisine = Some("german".to_string());
        grill.location = Some(Location {
            lat: 30.50,
            lng: -98.87,
        });
        businesses.push(grill);
        businesses
    }

    /// An app with listings loaded, in the directory view
    fn loaded_app() -> App {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: sample_businesses(),
            stale: false,
        });
        app
    }

    // ========================================================================
    // Loading and events
    // ========================================================================

    #[test]
    fn test_initial_state_is_loading() {
        let app = App::new(10, DEFAULT_BOUNDS);
        assert_eq!(app.state, AppState::Loading);
        assert!(app.businesses.is_empty());
        assert_eq!(app.pipeline.category(), CategoryFilter::All);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Loading);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_data_loaded_enters_directory_and_annotates() {
        let app = loaded_app();
        assert_eq!(app.state, AppState::Directory);
        assert_eq!(app.businesses.len(), 13);
        assert!(app.last_refresh.is_some());
        assert!(!app.stale);

        // Visibility follows the configured bounds
        assert!(app.business_by_id("w1").unwrap().visible);
        assert!(!app.business_by_id("r1").unwrap().visible);
    }

    #[test]
    fn test_smaller_reload_moves_back_into_page_range() {
        let wineries = |n: usize| -> Vec<Business> {
            (1..=n)
                .map(|i| Business::new(format!("w{i}"), format!("Winery {i}"), Category::Wineries))
                .collect()
        };
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: wineries(25),
            stale: false,
        });
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.pipeline.page(), 3);

        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: wineries(5),
            stale: false,
        });

        let page = app.current_page();
        assert!(page.is_in_range());
        assert_eq!(app.pipeline.page(), 1);
        assert_eq!(page.items.len(), 5);
        assert_eq!(app.selected_index, 1);

        // Shrinking to a still-multi-page set lands on the last page
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: wineries(25),
            stale: false,
        });
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: wineries(15),
            stale: false,
        });
        assert_eq!(app.pipeline.page(), 2);
        assert_eq!(app.current_page().items.len(), 5);
    }

    #[test]
    fn test_stale_data_sets_status() {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: sample_businesses(),
            stale: true,
        });
        assert!(app.stale);
        assert!(app.status.as_deref().unwrap().contains("cached"));
    }

    #[test]
    fn test_load_failure_leaves_loading_with_error() {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.handle_event(DirectoryEvent::LoadStarted);
        app.handle_event(DirectoryEvent::LoadFailed("API error: 503".to_string()));

        assert_eq!(app.state, AppState::Directory);
        assert_eq!(app.load_error.as_deref(), Some("API error: 503"));
        assert!(app.current_page().items.is_empty());
    }

    #[test]
    fn test_user_location_sets_distances() {
        let mut app = loaded_app();
        app.set_user_location(DEFAULT_CENTER);

        assert_eq!(app.business_by_id("w1").unwrap().distance, Some(0.0));
        assert!(app.business_by_id("r1").unwrap().distance.unwrap() > 10.0);
    }

    #[test]
    fn test_location_set_before_load_applies_to_loaded_data() {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.set_user_location(DEFAULT_CENTER);
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: sample_businesses(),
            stale: false,
        });
        assert!(app.businesses.iter().all(|b| b.distance.is_some()));
    }

    #[test]
    fn test_state_changes_go_through_event_channel() {
        let mut bus = EventBus::new();
        let mut app = App::new(10, DEFAULT_BOUNDS).with_events(bus.sender());

        app.set_category(CategoryFilter::Only(Category::Lodging));

        assert!(matches!(
            bus.try_recv(),
            Some(DirectoryEvent::CategoryChanged(CategoryFilter::Only(Category::Lodging)))
        ));
    }

    // ========================================================================
    // Directory navigation
    // ========================================================================

    #[test]
    fn test_navigation_wraps_within_page() {
        let mut app = loaded_app();
        assert_eq!(app.selected_index, 0);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_index, 9);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_paging_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.pipeline.page(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.current_page().items.len(), 3);

        // Already on the last page
        press(&mut app, KeyCode::Right);
        assert_eq!(app.pipeline.page(), 2);

        press(&mut app, KeyCode::Char('N'));
        assert_eq!(app.pipeline.page(), 1);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.pipeline.page(), 1);
    }

    #[test]
    fn test_tab_and_digits_change_category() {
        let mut app = loaded_app();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.pipeline.category(), CategoryFilter::Only(Category::Wineries));

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.pipeline.category(), CategoryFilter::All);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.pipeline.category(), CategoryFilter::Only(Category::Restaurants));
        assert_eq!(app.current_page().total_items, 1);

        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.pipeline.category(), CategoryFilter::All);

        // No eighth choice
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.pipeline.category(), CategoryFilter::All);
    }

    #[test]
    fn test_search_mode_filters_live() {
        let mut app = loaded_app();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        type_text(&mut app, "grill");
        assert_eq!(app.pipeline.search(), "grill");
        assert_eq!(app.current_page().total_items, 1);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.pipeline.search(), "gril");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.current_page().total_items, 1);
    }

    #[test]
    fn test_search_typing_does_not_trigger_shortcuts() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "q");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pipeline.search().is_empty());
    }

    #[test]
    fn test_filter_cursor_and_toggle() {
        let mut app = loaded_app();

        // "All" offers no filters
        assert!(app.filter_options().is_empty());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.pipeline.criteria().is_empty());

        app.set_category(CategoryFilter::Only(Category::Wineries));
        let options = app.filter_options();
        let price_two = options
            .iter()
            .position(|o| o.definition.attribute == Attribute::Price && o.value == "2")
            .expect("price option");

        for _ in 0..price_two {
            press(&mut app, KeyCode::Char(']'));
        }
        press(&mut app, KeyCode::Char(' '));

        assert!(app.pipeline.criteria().get(Attribute::Price).is_some());
        assert_eq!(app.current_page().total_items, 6);
        assert_eq!(app.status.as_deref(), Some("1 filter active"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.pipeline.criteria().is_empty());
        assert_eq!(app.current_page().total_items, 12);
        assert_eq!(app.status.as_deref(), Some("Filters cleared"));
    }

    #[test]
    fn test_filters_changed_event_clamps_selection() {
        let mut app = loaded_app();
        app.selected_index = 9;
        app.pipeline.set_category(CategoryFilter::Only(Category::Wineries));
        app.pipeline.set_filter(Attribute::Price, FilterValue::Exact("2".to_string()));
        app.pipeline.set_filter(Attribute::Features, FilterValue::any_of(["tours"]));

        app.handle_event(DirectoryEvent::FiltersChanged(app.pipeline.criteria().clone()));

        assert_eq!(app.status.as_deref(), Some("2 filters active"));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_filter_cursor_wraps_backwards() {
        let mut app = loaded_app();
        app.set_category(CategoryFilter::Only(Category::Lodging));
        let count = app.filter_options().len();

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.filter_cursor, count - 1);
    }

    // ========================================================================
    // Details and saved items
    // ========================================================================

    #[test]
    fn test_enter_opens_details_and_records_history() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::Details("w2".to_string()));
        assert_eq!(app.recent.items()[0].id, "w2");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Directory);
    }

    #[test]
    fn test_favorite_and_itinerary_keys() {
        let mut app = loaded_app();

        press(&mut app, KeyCode::Char('s'));
        assert!(app.favorites.is_favorite("w1"));
        assert!(app.status.as_deref().unwrap().contains("Added"));

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.itinerary.len(), 1);
        assert!(app.status.as_deref().unwrap().contains("already"));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.favorites.is_favorite("w1"));
    }

    #[test]
    fn test_saved_view_tabs_and_removal() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('a'));

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.state, AppState::Saved(SavedTab::Favorites));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state, AppState::Saved(SavedTab::Itinerary));
        assert_eq!(app.saved_ids(SavedTab::Itinerary), vec!["w1", "w2"]);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.saved_ids(SavedTab::Itinerary), vec!["w2"]);
        assert_eq!(app.itinerary.items()[0].order, 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Details("w2".to_string()));
    }

    #[test]
    fn test_saved_clear_and_back() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state, AppState::Saved(SavedTab::Recent));

        press(&mut app, KeyCode::Char('c'));
        assert!(app.recent.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Directory);
    }

    // ========================================================================
    // Help, refresh, startup
    // ========================================================================

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_index, 0);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_r_requests_refresh() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_startup_config_applies_after_load() {
        let mut app = App::new(5, DEFAULT_BOUNDS);
        app.apply_startup_config(&StartupConfig {
            category: Some(CategoryFilter::Only(Category::Wineries)),
            search: Some("winery".to_string()),
            page: 2,
            ..StartupConfig::default()
        });

        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: sample_businesses(),
            stale: false,
        });

        assert_eq!(app.pipeline.category(), CategoryFilter::Only(Category::Wineries));
        assert_eq!(app.pipeline.page(), 2);
        assert_eq!(app.current_page().items[0].id, "w6");
    }

    #[test]
    fn test_out_of_range_startup_page_is_ignored() {
        let mut app = App::new(10, DEFAULT_BOUNDS);
        app.apply_startup_config(&StartupConfig {
            page: 40,
            ..StartupConfig::default()
        });
        app.handle_event(DirectoryEvent::DataLoaded {
            businesses: sample_businesses(),
            stale: false,
        });
        assert_eq!(app.pipeline.page(), 1);
    }

    #[test]
    fn test_category_is_restored_from_store() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = LocalStore::with_dir(temp_dir.path());

        let mut first = App::new(10, DEFAULT_BOUNDS).with_store(Some(store.clone()));
        first.set_category(CategoryFilter::Only(Category::Cultural));
        first.favorites.toggle(&Business::new("c1", "Museum", Category::Cultural));

        let second = App::new(10, DEFAULT_BOUNDS).with_store(Some(store));
        assert_eq!(second.pipeline.category(), CategoryFilter::Only(Category::Cultural));
        assert!(second.favorites.is_favorite("c1"));
    }
}
