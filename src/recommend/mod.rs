//! Recommendation stages: score candidates, search the HSL grid, memoize the
//! ranked sets, and reconcile a stored value with what was recommended.

pub mod cache;
pub mod mode;
pub mod rating;
pub mod score;
pub mod search;
