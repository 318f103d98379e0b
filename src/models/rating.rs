//! Star ratings keyed by a derived user id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::validation::{present, FieldReport, RatingValue, Validate};

/// A reviewer's current star rating. One record per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: String,
    pub rating: i64,
    pub updated_at: String,
}

/// Derive the correlation key for a submitter.
///
/// The key is the hex SHA-256 of the trimmed identifier, so the same email
/// (or username, when no email was given) always lands on the same rating.
pub fn derive_user_id(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Pick the identifying field (email over username) and derive its key.
pub fn user_id_for(email: Option<&str>, username: Option<&str>) -> Option<String> {
    present(email).or(present(username)).map(derive_user_id)
}

/// Request body for `POST /api/lic/ratings`.
///
/// Callers either pass `userId` directly or the email/username it derives from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRatingRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingValue>,
}

impl UpsertRatingRequest {
    pub fn resolved_user_id(&self) -> Option<String> {
        present(self.user_id.as_deref())
            .map(str::to_string)
            .or_else(|| user_id_for(self.email.as_deref(), self.username.as_deref()))
    }
}

impl Validate for UpsertRatingRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        if self.resolved_user_id().is_none() {
            report.missing.push("userId".to_string());
        }
        report.require_rating("rating", self.rating.as_ref());
        report
    }
}
