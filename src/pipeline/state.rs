//! Directory view state
//!
//! `PipelineState` holds what the user has chosen to look at: a category, a
//! search term, attribute filters and a page. It is owned by the
//! application and handed to the pipeline explicitly on every render.

use super::filters::{
    apply_attribute_filters, filter_by_category, filter_by_search_term, FilterCriteria,
    FilterValue,
};
use super::paginate::{paginate, Page};
use crate::data::{filters_for, Attribute, Business, CategoryFilter, FilterDefinition, FilterKind};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    category: CategoryFilter,
    search: String,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineState {
    /// Creates a state showing page 1 of everything
    pub fn new(page_size: usize) -> Self {
        Self {
            category: CategoryFilter::All,
            search: String::new(),
            criteria: FilterCriteria::new(),
            page: 1,
            page_size,
        }
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Switches category
    ///
    /// Goes back to page 1 and drops the filters the new category does not
    /// offer.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = 1;

        let offered = filters_for(category);
        self.criteria
            .retain(|attribute| offered.iter().any(|def| def.attribute == attribute));

        debug!(category = category.id(), filters = self.criteria.len(), "Category changed");
    }

    /// Replaces the search term and goes back to page 1
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Declares a filter on an attribute and goes back to page 1
    pub fn set_filter(&mut self, attribute: Attribute, value: FilterValue) {
        self.criteria.set(attribute, value);
        self.page = 1;
    }

    /// Drops the filter on an attribute and goes back to page 1
    pub fn clear_filter(&mut self, attribute: Attribute) {
        if self.criteria.remove(attribute).is_some() {
            self.page = 1;
        }
    }

    /// Flips one option of a category filter
    ///
    /// # Behavior
    /// - Checkbox filters add or remove the option from their set; an empty
    ///   set removes the filter entirely
    /// - Radio and select filters select the option, or deselect it if it
    ///   was already the selected one
    pub fn toggle_option(&mut self, definition: &FilterDefinition, option: &str) {
        let attribute = definition.attribute;
        let next = match (definition.kind, self.criteria.get(attribute)) {
            (FilterKind::Checkbox, Some(FilterValue::AnyOf(current))) => {
                let mut values = current.clone();
                if !values.remove(option) {
                    values.insert(option.to_string());
                }
                (!values.is_empty()).then_some(FilterValue::AnyOf(values))
            }
            (FilterKind::Checkbox, _) => Some(FilterValue::any_of([option])),
            (_, Some(current)) if current.selects(option) => None,
            (_, _) => Some(FilterValue::Exact(option.to_string())),
        };

        match next {
            Some(value) => self.set_filter(attribute, value),
            None => self.clear_filter(attribute),
        }
    }

    /// Clears the search term and every filter, keeping the category
    pub fn reset(&mut self) {
        self.search.clear();
        self.criteria.clear();
        self.page = 1;
    }

    /// Runs the record filters without paginating
    ///
    /// Category, then search term, then attribute filters. Relative order of
    /// the input is preserved.
    pub fn filtered(&self, businesses: &[Business]) -> Vec<Business> {
        let by_category = filter_by_category(businesses, self.category);
        let by_search = filter_by_search_term(&by_category, &self.search);
        apply_attribute_filters(&by_search, &self.criteria)
    }

    /// The page of results for the current state
    pub fn view(&self, businesses: &[Business]) -> Page<Business> {
        paginate(&self.filtered(businesses), self.page, self.page_size)
    }

    /// Moves to an explicit page, if it lies within `1..=total_pages`
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if (1..=total_pages).contains(&page) {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Advances one page unless already on the last
    pub fn next_page(&mut self, total_pages: usize) -> bool {
        self.go_to_page(self.page + 1, total_pages)
    }

    /// Goes back one page unless already on the first
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;

    fn wineries(n: usize) -> Vec<Business> {
        (1..=n)
            .map(|i| Business::new(format!("w{i}"), format!("Winery {i}"), Category::Wineries))
            .collect()
    }

    fn winery_filters() -> &'static [FilterDefinition] {
        filters_for(CategoryFilter::Only(Category::Wineries))
    }

    fn definition(attribute: Attribute) -> &'static FilterDefinition {
        winery_filters()
            .iter()
            .find(|d| d.attribute == attribute)
            .expect("winery filter")
    }

    #[test]
    fn test_new_state_shows_first_page_of_everything() {
        let state = PipelineState::new(10);
        assert_eq!(state.category(), CategoryFilter::All);
        assert_eq!(state.page(), 1);
        assert!(state.search().is_empty());
        assert!(state.criteria().is_empty());

        let page = state.view(&wineries(25));
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paging_is_clamped() {
        let mut state = PipelineState::new(10);
        let records = wineries(25);
        let total = state.view(&records).total_pages;

        assert!(!state.prev_page());
        assert!(state.next_page(total));
        assert!(state.next_page(total));
        assert!(!state.next_page(total));
        assert_eq!(state.page(), 3);
        assert_eq!(state.view(&records).items.len(), 5);

        assert!(state.prev_page());
        assert_eq!(state.page(), 2);
        assert!(!state.go_to_page(0, total));
        assert!(!state.go_to_page(4, total));
    }

    #[test]
    fn test_changes_reset_page() {
        let mut state = PipelineState::new(10);
        state.next_page(3);
        state.set_search("winery");
        assert_eq!(state.page(), 1);

        state.next_page(3);
        state.set_filter(Attribute::Price, FilterValue::Exact("2".into()));
        assert_eq!(state.page(), 1);

        state.next_page(3);
        state.set_category(CategoryFilter::Only(Category::Wineries));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_category_change_drops_inapplicable_filters() {
        let mut state = PipelineState::new(10);
        state.set_category(CategoryFilter::Only(Category::Wineries));
        state.set_filter(Attribute::Price, FilterValue::Exact("2".into()));
        state.set_filter(Attribute::WineTypes, FilterValue::any_of(["red"]));

        state.set_category(CategoryFilter::Only(Category::Restaurants));

        // Restaurants offer a price filter but no wine types
        assert!(state.criteria().get(Attribute::Price).is_some());
        assert!(state.criteria().get(Attribute::WineTypes).is_none());

        state.set_category(CategoryFilter::All);
        assert!(state.criteria().is_empty());
    }

    #[test]
    fn test_toggle_checkbox_option() {
        let mut state = PipelineState::new(10);
        let wine_types = definition(Attribute::WineTypes);

        state.toggle_option(wine_types, "red");
        state.toggle_option(wine_types, "white");
        assert_eq!(
            state.criteria().get(Attribute::WineTypes),
            Some(&FilterValue::any_of(["red", "white"]))
        );

        state.toggle_option(wine_types, "red");
        state.toggle_option(wine_types, "white");
        assert!(state.criteria().get(Attribute::WineTypes).is_none());
    }

    #[test]
    fn test_toggle_radio_option() {
        let mut state = PipelineState::new(10);
        let price = definition(Attribute::Price);

        state.toggle_option(price, "2");
        state.toggle_option(price, "3");
        assert_eq!(
            state.criteria().get(Attribute::Price),
            Some(&FilterValue::Exact("3".into()))
        );

        state.toggle_option(price, "3");
        assert!(state.criteria().get(Attribute::Price).is_none());
    }

    #[test]
    fn test_reset_keeps_category() {
        let mut state = PipelineState::new(10);
        state.set_category(CategoryFilter::Only(Category::Wineries));
        state.set_search("peach");
        state.set_filter(Attribute::Price, FilterValue::Exact("2".into()));

        state.reset();

        assert_eq!(state.category(), CategoryFilter::Only(Category::Wineries));
        assert!(state.search().is_empty());
        assert!(state.criteria().is_empty());
    }

    #[test]
    fn test_view_applies_every_stage() {
        let mut records = wineries(6);
        records[1].price_range = Some(2);
        records[4].price_range = Some(2);
        records.push(Business::new("r1", "Winery Grill", Category::Restaurants));

        let mut state = PipelineState::new(10);
        state.set_category(CategoryFilter::Only(Category::Wineries));
        state.set_search("winery");
        state.set_filter(Attribute::Price, FilterValue::Exact("2".into()));

        let page = state.view(&records);
        let ids: Vec<_> = page.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w5"]);
        assert_eq!(page.total_items, 2);
    }
}
