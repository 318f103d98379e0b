//! Read models produced by the aggregation service.

use serde::{Deserialize, Serialize};

use super::Rating;

/// A review as the reviews page displays it, with its resolved rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDisplay {
    pub quote: String,
    pub author: String,
    pub rating: i64,
    /// Five-glyph star row for `rating`.
    pub stars: String,
    pub language: String,
    pub date_published: String,
}

/// Everything the reviews page needs in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub reviews: Vec<ReviewDisplay>,
    pub ratings: Vec<Rating>,
    pub average_rating: f64,
    pub rating_count: usize,
}
