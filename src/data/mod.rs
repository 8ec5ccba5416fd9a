//! Core data models for the business directory
//!
//! This module contains the business record as delivered by the listing API,
//! the fixed set of categories, geographic helpers and the HTTP client that
//! fetches listings for the visible map area.

pub mod categories;
pub mod geo;
pub mod listings;

pub use categories::{filters_for, Category, CategoryFilter, FilterDefinition, FilterKind};
pub use geo::{BoundingBox, Location};
pub use listings::{Fetched, ListingClient, ListingError, RequestOptions};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A local business as returned by the listing API
///
/// Records are read-only from the filter pipeline's point of view. The only
/// fields the application writes are the `distance` and `visible`
/// annotations, which depend on the user's location and the visible area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Unique, stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Business category
    pub category: Category,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// One-line summary for list views
    #[serde(default)]
    pub short_description: Option<String>,
    /// Price level from 1 ($) to 4 ($$$$)
    #[serde(default)]
    pub price_range: Option<u8>,
    /// Geographic position
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Average rating out of 5
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Restaurants only
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Wineries only
    #[serde(default)]
    pub wine_types: Option<Vec<String>>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    /// Lodging only
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    /// Lodging only
    #[serde(default)]
    pub lodging_type: Option<String>,
    /// Opening hours keyed by lowercase weekday, e.g. `"monday" -> "10am - 6pm"`
    #[serde(default)]
    pub hours: Option<BTreeMap<String, String>>,
    /// Distance from the user in miles, set once a user location is known
    #[serde(default)]
    pub distance: Option<f64>,
    /// Whether the business lies inside the currently visible area
    #[serde(default)]
    pub visible: bool,
}

impl Business {
    /// Creates a record with only the required fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: None,
            short_description: None,
            price_range: None,
            location: None,
            address: None,
            phone: None,
            website: None,
            image_url: None,
            rating: None,
            review_count: None,
            cuisine: None,
            wine_types: None,
            features: None,
            amenities: None,
            lodging_type: None,
            hours: None,
            distance: None,
            visible: false,
        }
    }

    /// Returns the value of a filterable attribute
    pub fn attribute(&self, attribute: Attribute) -> AttributeValue<'_> {
        fn scalar(value: Option<&String>) -> AttributeValue<'_> {
            value.map_or(AttributeValue::Missing, |v| AttributeValue::Scalar(v.clone()))
        }
        fn list(value: Option<&Vec<String>>) -> AttributeValue<'_> {
            value.map_or(AttributeValue::Missing, |v| AttributeValue::List(v.as_slice()))
        }

        match attribute {
            Attribute::Price => self
                .price_range
                .map_or(AttributeValue::Missing, |p| AttributeValue::Scalar(p.to_string())),
            Attribute::Cuisine => scalar(self.cuisine.as_ref()),
            Attribute::LodgingType => scalar(self.lodging_type.as_ref()),
            Attribute::WineTypes => list(self.wine_types.as_ref()),
            Attribute::Features => list(self.features.as_ref()),
            Attribute::Amenities => list(self.amenities.as_ref()),
        }
    }
}

/// Category-specific attributes that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    /// Price level, compared as its decimal string ("1".."4")
    Price,
    Cuisine,
    LodgingType,
    WineTypes,
    Features,
    Amenities,
}

impl Attribute {
    /// The attribute's name as used by the listing API
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Price => "price",
            Attribute::Cuisine => "cuisine",
            Attribute::LodgingType => "lodgingType",
            Attribute::WineTypes => "wineTypes",
            Attribute::Features => "features",
            Attribute::Amenities => "amenities",
        }
    }

    /// Whether the attribute holds a list of values on a record
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Attribute::WineTypes | Attribute::Features | Attribute::Amenities
        )
    }
}

/// The value a record holds for an [`Attribute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue<'a> {
    /// A single value
    Scalar(String),
    /// A list of values
    List(&'a [String]),
    /// The record does not carry this attribute
    Missing,
}
