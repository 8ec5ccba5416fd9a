//! Listing filter pipeline
//!
//! Derives the ordered, paginated subset of businesses to display from the
//! full record set and the current [`PipelineState`]. Every stage is a pure
//! function; none of them reorders records.

mod filters;
mod paginate;
mod state;

pub use filters::{
    apply_attribute_filters, filter_by_category, filter_by_search_term, FilterCriteria,
    FilterValue,
};
pub use paginate::{paginate, total_pages, Page};
pub use state::PipelineState;
