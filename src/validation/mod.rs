//! Request validation.
//!
//! Every submission body has an explicit schema; `Validate` reports which of
//! its required fields are missing or malformed.

use serde::Deserialize;

use crate::errors::AppError;

/// Lowest accepted star rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted star rating.
pub const MAX_RATING: i64 = 5;

/// Outcome of checking a request body against its schema.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldReport {
    pub missing: Vec<String>,
    pub invalid: Vec<String>,
}

impl FieldReport {
    /// Record `name` as missing when `value` is absent or blank.
    pub fn require(&mut self, name: &str, value: Option<&str>) {
        if present(value).is_none() {
            self.missing.push(name.to_string());
        }
    }

    /// Record a rating field as missing or invalid.
    pub fn require_rating(&mut self, name: &str, value: Option<&RatingValue>) {
        match value {
            None => self.missing.push(name.to_string()),
            Some(RatingValue::Text(s)) if s.trim().is_empty() => {
                self.missing.push(name.to_string())
            }
            Some(v) if v.stars().is_none() => self.invalid.push(name.to_string()),
            Some(_) => {}
        }
    }

    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(AppError::validation(self.missing, self.invalid))
        }
    }
}

/// Implemented by every request body that carries required fields.
pub trait Validate {
    fn report(&self) -> FieldReport;

    fn validate(&self) -> Result<(), AppError> {
        self.report().into_result()
    }
}

/// Trimmed view of an optional field, `None` when absent or blank.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trimmed value of a field that validation already proved present.
pub fn required(value: &Option<String>) -> &str {
    present(value.as_deref()).unwrap_or_default()
}

/// A rating as it arrives on the wire: a JSON number or a form string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(serde_json::Number),
    Text(String),
}

impl RatingValue {
    /// The integer star count, if it is a whole number within range.
    pub fn stars(&self) -> Option<i64> {
        let value = match self {
            RatingValue::Number(n) => match n.as_i64() {
                Some(i) => i,
                None => whole(n.as_f64()?)?,
            },
            RatingValue::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (MIN_RATING..=MAX_RATING).contains(&value).then_some(value)
    }
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}
