//! Record filters
//!
//! Each filter is a pure function from a slice of businesses to the subset
//! that passes, in the original relative order. Absent fields never raise;
//! they simply do not match.

use crate::data::{Attribute, AttributeValue, Business, CategoryFilter};
use std::collections::{BTreeMap, BTreeSet};

/// The value an attribute filter matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// The record's value must equal this one
    Exact(String),
    /// The record must share at least one value with this set
    AnyOf(BTreeSet<String>),
}

impl FilterValue {
    /// Builds an `AnyOf` from any iterable of values
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Whether the given option value is selected by this filter
    pub fn selects(&self, option: &str) -> bool {
        match self {
            FilterValue::Exact(value) => value == option,
            FilterValue::AnyOf(values) => values.contains(option),
        }
    }

    /// Checks a record's attribute value against this filter
    ///
    /// A missing attribute never matches. A list attribute matches an exact
    /// value it contains; a scalar attribute matches a set containing it.
    pub fn matches(&self, value: &AttributeValue<'_>) -> bool {
        match (self, value) {
            (_, AttributeValue::Missing) => false,
            (FilterValue::Exact(wanted), AttributeValue::Scalar(actual)) => wanted == actual,
            (FilterValue::Exact(wanted), AttributeValue::List(actual)) => {
                actual.iter().any(|v| v == wanted)
            }
            (FilterValue::AnyOf(wanted), AttributeValue::Scalar(actual)) => wanted.contains(actual),
            (FilterValue::AnyOf(wanted), AttributeValue::List(actual)) => {
                actual.iter().any(|v| wanted.contains(v))
            }
        }
    }
}

/// The attribute filters currently in force
///
/// Filters combine with AND; values inside an `AnyOf` combine with OR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    filters: BTreeMap<Attribute, FilterValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, attribute: Attribute, value: FilterValue) -> Self {
        self.set(attribute, value);
        self
    }

    /// Declares a filter, replacing any previous one on the same attribute
    pub fn set(&mut self, attribute: Attribute, value: FilterValue) {
        self.filters.insert(attribute, value);
    }

    /// Drops the filter on an attribute, returning it if there was one
    pub fn remove(&mut self, attribute: Attribute) -> Option<FilterValue> {
        self.filters.remove(&attribute)
    }

    pub fn get(&self, attribute: Attribute) -> Option<&FilterValue> {
        self.filters.get(&attribute)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &FilterValue)> {
        self.filters.iter()
    }

    /// Keeps only the filters whose attribute satisfies `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(Attribute) -> bool) {
        self.filters.retain(|attribute, _| keep(*attribute));
    }

    /// Whether a single record passes every declared filter
    pub fn accepts(&self, business: &Business) -> bool {
        self.filters
            .iter()
            .all(|(attribute, value)| value.matches(&business.attribute(*attribute)))
    }
}

/// Keeps the businesses of the selected category
///
/// `CategoryFilter::All` returns every record.
pub fn filter_by_category(businesses: &[Business], category: CategoryFilter) -> Vec<Business> {
    match category {
        CategoryFilter::All => businesses.to_vec(),
        CategoryFilter::Only(wanted) => businesses
            .iter()
            .filter(|b| b.category == wanted)
            .cloned()
            .collect(),
    }
}

/// Keeps the businesses whose name, description or category contains `term`
///
/// Matching is case-insensitive. A blank term is no filter at all.
pub fn filter_by_search_term(businesses: &[Business], term: &str) -> Vec<Business> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return businesses.to_vec();
    }

    businesses
        .iter()
        .filter(|b| matches_search(b, &term))
        .cloned()
        .collect()
}

fn matches_search(business: &Business, lowered_term: &str) -> bool {
    business.name.to_lowercase().contains(lowered_term)
        || business
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(lowered_term))
        || business.category.id().contains(lowered_term)
}

/// Keeps the businesses that pass every attribute filter in `criteria`
pub fn apply_attribute_filters(businesses: &[Business], criteria: &FilterCriteria) -> Vec<Business> {
    if criteria.is_empty() {
        return businesses.to_vec();
    }

    businesses
        .iter()
        .filter(|b| criteria.accepts(b))
        .cloned()
        .collect()
}
