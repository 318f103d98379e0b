//! Visitor feedback left through the contact forms.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldReport, Validate};

/// A feedback message. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub feedback: String,
    pub created_at: String,
}

/// Request body for `POST /api/lic/submit-feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Validate for CreateFeedbackRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        report.require("name", self.name.as_deref());
        report.require("feedback", self.feedback.as_deref());
        report
    }
}

/// Request body for the reviews page contact form, which carries a feedback
/// message, a question, or both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl Validate for ContactFormRequest {
    fn report(&self) -> FieldReport {
        let mut report = FieldReport::default();
        report.require("name", self.name.as_deref());
        if crate::validation::present(self.message.as_deref()).is_none()
            && crate::validation::present(self.query.as_deref()).is_none()
        {
            report.missing.push("message or query".to_string());
        }
        report
    }
}
