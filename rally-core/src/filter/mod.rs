//! Pure matchers, the single-pass filter pipeline, and facet counts.

pub mod matchers;
pub mod pipeline;
pub mod state;

pub use matchers::{
    ResponseFilter, VisibilityFilter, matches_organizer, matches_period, matches_query,
    matches_response, matches_tags, matches_visibility,
};
pub use pipeline::{
    CriterionIdSets, FacetCounts, FacetDim, FilterContext, apply_filters, facet_counts,
};
pub use state::FilterState;
