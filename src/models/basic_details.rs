//! Basic Details Models
//!
//! One record per user describing diagnosis, hospital admission and COVID
//! test status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::deserialize_some;

/// Whether a COVID test was taken. Serialized as "Yes" / "No".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CovidTestDone {
    Yes,
    No,
}

impl CovidTestDone {
    pub fn as_str(&self) -> &'static str {
        match self {
            CovidTestDone::Yes => "Yes",
            CovidTestDone::No => "No",
        }
    }
}

impl std::fmt::Display for CovidTestDone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CovidTestDone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(CovidTestDone::Yes),
            "No" => Ok(CovidTestDone::No),
            _ => Err(format!("Invalid covid_test_done value: {}", s)),
        }
    }
}

/// A user's basic details record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasicDetails {
    pub id: i64,
    /// Owning user id
    pub user: i64,
    pub date_of_diagnosis: Option<DateTime<Utc>>,
    pub admitted_in_hospital: Option<DateTime<Utc>>,
    pub covid_test_done: CovidTestDone,
    pub covid_test_type: Option<String>,
    pub covid_test_report: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /besicdetails/
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBasicDetailsRequest {
    pub user: i64,
    pub date_of_diagnosis: Option<DateTime<Utc>>,
    pub admitted_in_hospital: Option<DateTime<Utc>>,
    pub covid_test_done: CovidTestDone,
    #[validate(length(min = 1, max = 64))]
    pub covid_test_type: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub covid_test_report: Option<String>,
}

/// PUT /besicdetails/{user_id}/
///
/// Absent fields keep their stored value. `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBasicDetailsRequest {
    /// Must match the user in the path when present
    pub user: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date_of_diagnosis: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub admitted_in_hospital: Option<Option<DateTime<Utc>>>,
    /// Required column: `null` is rejected, absence keeps the stored value
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<CovidTestDone>)]
    pub covid_test_done: Option<Option<CovidTestDone>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub covid_test_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub covid_test_report: Option<Option<String>>,
}

fn text_field_len_ok(value: &Option<Option<String>>) -> bool {
    match value {
        Some(Some(text)) => (1..=64).contains(&text.chars().count()),
        _ => true,
    }
}

impl Validate for UpdateBasicDetailsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.covid_test_done == Some(None) {
            errors.add("covid_test_done", ValidationError::new("required"));
        }
        if !text_field_len_ok(&self.covid_test_type) {
            errors.add("covid_test_type", ValidationError::new("length"));
        }
        if !text_field_len_ok(&self.covid_test_report) {
            errors.add("covid_test_report", ValidationError::new("length"));
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateBasicDetailsRequest {
    /// Overwrite exactly the fields present in this request
    pub fn apply_to(&self, details: &mut BasicDetails) {
        if let Some(date) = self.date_of_diagnosis {
            details.date_of_diagnosis = date;
        }
        if let Some(date) = self.admitted_in_hospital {
            details.admitted_in_hospital = date;
        }
        if let Some(Some(done)) = self.covid_test_done {
            details.covid_test_done = done;
        }
        if let Some(test_type) = &self.covid_test_type {
            details.covid_test_type = test_type.clone();
        }
        if let Some(report) = &self.covid_test_report {
            details.covid_test_report = report.clone();
        }
    }
}
