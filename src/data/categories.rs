//! Business categories and their filter definitions
//!
//! The directory knows a fixed set of categories. Some of them expose extra
//! filters (wine types, cuisine, amenities...) whose options are defined here
//! so that the UI and the filter pipeline agree on the values.

use super::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wineries,
    Restaurants,
    Shopping,
    Lodging,
    Outdoor,
    Cultural,
    /// Any category the API sends that this version does not know about
    #[serde(other)]
    Other,
}

impl Category {
    /// Returns the selectable categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Wineries,
            Category::Restaurants,
            Category::Shopping,
            Category::Lodging,
            Category::Outdoor,
            Category::Cultural,
        ]
    }

    /// Identifier used by the API and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Category::Wineries => "wineries",
            Category::Restaurants => "restaurants",
            Category::Shopping => "shopping",
            Category::Lodging => "lodging",
            Category::Outdoor => "outdoor",
            Category::Cultural => "cultural",
            Category::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Wineries => "Wineries",
            Category::Restaurants => "Restaurants",
            Category::Shopping => "Shopping",
            Category::Lodging => "Lodging",
            Category::Outdoor => "Outdoor",
            Category::Cultural => "Cultural",
            Category::Other => "Other",
        }
    }

    /// Marker color as an RGB triple
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Category::Wineries => (0x8E, 0x24, 0xAA),
            Category::Restaurants => (0xFF, 0x57, 0x22),
            Category::Shopping => (0x1E, 0x88, 0xE5),
            Category::Lodging => (0x43, 0xA0, 0x47),
            Category::Outdoor => (0xFB, 0x8C, 0x00),
            Category::Cultural => (0xE5, 0x39, 0x35),
            Category::Other => (0x9E, 0x9E, 0x9E),
        }
    }

    /// Parses a category identifier, case-insensitively
    ///
    /// Returns `None` for unknown identifiers and for "other", which is not
    /// selectable.
    pub fn from_id(s: &str) -> Option<Category> {
        let s = s.trim().to_lowercase();
        Category::all().iter().copied().find(|c| c.id() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The category selection of the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category restriction
    #[default]
    All,
    /// Only businesses of one category
    Only(Category),
}

impl CategoryFilter {
    /// Parses "all" or a category identifier
    pub fn parse(s: &str) -> Option<CategoryFilter> {
        if s.trim().eq_ignore_ascii_case("all") {
            Some(CategoryFilter::All)
        } else {
            Category::from_id(s).map(CategoryFilter::Only)
        }
    }

    /// Identifier of the selection ("all" or the category id)
    pub fn id(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.id(),
        }
    }

    /// Label for tabs and headers
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Every selection in tab order, starting with "All"
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::all().iter().copied().map(CategoryFilter::Only))
            .collect()
    }

    /// The selection after this one in tab order, wrapping around
    pub fn next(&self) -> CategoryFilter {
        let choices = Self::choices();
        let index = choices.iter().position(|c| c == self).unwrap_or(0);
        choices[(index + 1) % choices.len()]
    }

    /// The selection before this one in tab order, wrapping around
    pub fn previous(&self) -> CategoryFilter {
        let choices = Self::choices();
        let index = choices.iter().position(|c| c == self).unwrap_or(0);
        choices[(index + choices.len() - 1) % choices.len()]
    }
}

/// How the options of a filter are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Any number of options, matched with OR
    Checkbox,
    /// Exactly one option
    Radio,
    /// Exactly one option from a drop-down
    Select,
}

/// A filter offered for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDefinition {
    pub attribute: Attribute,
    pub label: &'static str,
    pub kind: FilterKind,
    /// `(value, label)` pairs
    pub options: &'static [(&'static str, &'static str)],
}

const PRICE_OPTIONS: &[(&str, &str)] = &[("1", "$"), ("2", "$$"), ("3", "$$$"), ("4", "$$$$")];

const PRICE_FILTER: FilterDefinition = FilterDefinition {
    attribute: Attribute::Price,
    label: "Price Range",
    kind: FilterKind::Radio,
    options: PRICE_OPTIONS,
};

const WINERY_FILTERS: &[FilterDefinition] = &[
    FilterDefinition {
        attribute: Attribute::WineTypes,
        label: "Wine Types",
        kind: FilterKind::Checkbox,
        options: &[
            ("red", "Red Wine"),
            ("white", "White Wine"),
            ("rose", "Rosé"),
            ("sparkling", "Sparkling"),
            ("dessert", "Dessert Wine"),
        ],
    },
    FilterDefinition {
        attribute: Attribute::Features,
        label: "Features",
        kind: FilterKind::Checkbox,
        options: &[
            ("tours", "Tours Available"),
            ("tastings", "Tastings"),
            ("food", "Food Service"),
            ("patio", "Outdoor Seating"),
            ("petFriendly", "Pet Friendly"),
        ],
    },
    PRICE_FILTER,
];

const RESTAURANT_FILTERS: &[FilterDefinition] = &[
    FilterDefinition {
        attribute: Attribute::Cuisine,
        label: "Cuisine Type",
        kind: FilterKind::Select,
        options: &[
            ("american", "American"),
            ("italian", "Italian"),
            ("mexican", "Mexican"),
            ("german", "German"),
            ("bbq", "BBQ"),
            ("steakhouse", "Steakhouse"),
            ("seafood", "Seafood"),
        ],
    },
    PRICE_FILTER,
    FilterDefinition {
        attribute: Attribute::Features,
        label: "Features",
        kind: FilterKind::Checkbox,
        options: &[
            ("outdoor", "Outdoor Seating"),
            ("delivery", "Delivery"),
            ("takeout", "Takeout"),
            ("reservations", "Reservations"),
            ("petFriendly", "Pet Friendly"),
        ],
    },
];

const LODGING_FILTERS: &[FilterDefinition] = &[
    FilterDefinition {
        attribute: Attribute::LodgingType,
        label: "Lodging Type",
        kind: FilterKind::Select,
        options: &[
            ("hotel", "Hotel"),
            ("bb", "Bed & Breakfast"),
            ("vacation", "Vacation Rental"),
            ("cabin", "Cabin"),
            ("resort", "Resort"),
        ],
    },
    PRICE_FILTER,
    FilterDefinition {
        attribute: Attribute::Amenities,
        label: "Amenities",
        kind: FilterKind::Checkbox,
        options: &[
            ("pool", "Swimming Pool"),
            ("wifi", "Free WiFi"),
            ("breakfast", "Breakfast Included"),
            ("parking", "Free Parking"),
            ("petFriendly", "Pet Friendly"),
        ],
    },
];

/// Returns the filters offered for a category selection
///
/// "All" and categories without specific filters get an empty slice.
pub fn filters_for(selection: CategoryFilter) -> &'static [FilterDefinition] {
    match selection {
        CategoryFilter::Only(Category::Wineries) => WINERY_FILTERS,
        CategoryFilter::Only(Category::Restaurants) => RESTAURANT_FILTERS,
        CategoryFilter::Only(Category::Lodging) => LODGING_FILTERS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_id() {
        assert_eq!(Category::from_id("wineries"), Some(Category::Wineries));
        assert_eq!(Category::from_id(" Lodging "), Some(Category::Lodging));
        assert_eq!(Category::from_id("other"), None);
        assert_eq!(Category::from_id("spa"), None);
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::parse("ALL"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("cultural"),
            Some(CategoryFilter::Only(Category::Cultural))
        );
        assert_eq!(CategoryFilter::parse("nope"), None);
    }

    #[test]
    fn test_category_filter_id_roundtrips_through_parse() {
        for choice in CategoryFilter::choices() {
            assert_eq!(CategoryFilter::parse(choice.id()), Some(choice));
        }
    }

    #[test]
    fn test_category_filter_cycles() {
        assert_eq!(
            CategoryFilter::All.next(),
            CategoryFilter::Only(Category::Wineries)
        );
        assert_eq!(
            CategoryFilter::Only(Category::Cultural).next(),
            CategoryFilter::All
        );
        assert_eq!(
            CategoryFilter::All.previous(),
            CategoryFilter::Only(Category::Cultural)
        );
    }

    #[test]
    fn test_filters_for_categories() {
        let wineries = filters_for(CategoryFilter::Only(Category::Wineries));
        let attributes: Vec<Attribute> = wineries.iter().map(|f| f.attribute).collect();
        assert_eq!(
            attributes,
            vec![Attribute::WineTypes, Attribute::Features, Attribute::Price]
        );

        let lodging = filters_for(CategoryFilter::Only(Category::Lodging));
        assert_eq!(lodging[0].kind, FilterKind::Select);
        assert!(lodging.iter().any(|f| f.attribute == Attribute::Amenities));

        assert!(filters_for(CategoryFilter::All).is_empty());
        assert!(filters_for(CategoryFilter::Only(Category::Shopping)).is_empty());
    }

    #[test]
    fn test_price_options_are_decimal_strings() {
        let values: Vec<&str> = PRICE_OPTIONS.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
    }
}
