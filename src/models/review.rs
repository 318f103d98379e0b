//! Customer reviews shown on the reviews page.

use serde::{Deserialize, Serialize};

use crate::validation::{present, FieldReport, RatingValue, Validate};

/// Locale assigned to reviews submitted without one.
pub const DEFAULT_LANGUAGE: &str = "en-IN";

/// A published review. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub username: String,
    pub comment: String,
    pub date_published: String,
    pub language: String,
    /// Correlation key shared with the reviewer's rating, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Request body for `POST /api/lic/reviews`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl CreateReviewRequest {
    /// Language to store, falling back to [`DEFAULT_LANGUAGE`].
    pub fn language_or_default(&self) -> String {
        present(self.language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }
}

impl Validate for CreateReviewRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        report.require("username", self.username.as_deref());
        report.require("comment", self.comment.as_deref());
        report
    }
}

/// Request body for `POST /reviews/submit-review`: a review plus its star rating.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithRatingRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingValue>,
    #[serde(default)]
    pub language: Option<String>,
}

impl ReviewWithRatingRequest {
    /// Split into the review half; the caller validates first.
    pub fn review_request(&self) -> CreateReviewRequest {
        CreateReviewRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            comment: self.comment.clone(),
            language: self.language.clone(),
        }
    }
}

impl Validate for ReviewWithRatingRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        report.require("username", self.username.as_deref());
        report.require("comment", self.comment.as_deref());
        report.require_rating("rating", self.rating.as_ref());
        report
    }
}
