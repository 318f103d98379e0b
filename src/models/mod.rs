//! Data models for the branch site backend.
//!
//! Field names serialize in camelCase to match the site's front-end scripts.

mod feedback;
mod query;
mod rating;
mod review;
mod summary;

pub use feedback::*;
pub use query::*;
pub use rating::*;
pub use review::*;
pub use summary::*;
