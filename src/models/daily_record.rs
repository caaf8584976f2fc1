//! Daily Record Models
//!
//! Named metrics (the lookup table) and the per-user timestamped values
//! recorded against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A metric label such as "Temperature"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyRecordName {
    pub id: i64,
    pub recordname: String,
}

/// POST /recordnames/
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRecordNameRequest {
    #[validate(length(min = 1, max = 100))]
    pub recordname: String,
}

/// One measured value of a named metric for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyRecordValue {
    pub id: i64,
    /// Owning user id
    pub user: i64,
    /// Id of the DailyRecordName this value measures
    pub recordname: i64,
    pub value: f64,
    pub datetime: DateTime<Utc>,
}

/// POST /dailyrecords/
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDailyRecordRequest {
    pub user: i64,
    #[validate(range(min = 1))]
    pub recordname: i64,
    pub value: f64,
    /// Defaults to the time of creation
    pub datetime: Option<DateTime<Utc>>,
}

/// PUT /dailyrecords/{record_id}/
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDailyRecordRequest {
    /// Must match the record's owner when present
    pub user: Option<i64>,
    #[validate(range(min = 1))]
    pub recordname: Option<i64>,
    pub value: Option<f64>,
    pub datetime: Option<DateTime<Utc>>,
}

impl UpdateDailyRecordRequest {
    pub fn apply_to(&self, record: &mut DailyRecordValue) {
        if let Some(recordname) = self.recordname {
            record.recordname = recordname;
        }
        if let Some(value) = self.value {
            record.value = value;
        }
        if let Some(datetime) = self.datetime {
            record.datetime = datetime;
        }
    }
}
