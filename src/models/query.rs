//! Questions sent to the branch.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldReport, Validate};

/// A visitor question. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub query: String,
    pub created_at: String,
}

/// Request body for `POST /api/lic/submit-query`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl Validate for CreateQueryRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        report.require("name", self.name.as_deref());
        report.require("query", self.query.as_deref());
        report
    }
}
