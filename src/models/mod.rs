// Data models and DTOs
// Stored records, API request/response models.

use serde::{Deserialize, Deserializer};

pub mod basic_details;
pub mod daily_record;
pub mod user;

pub use basic_details::{
    BasicDetails, CovidTestDone, CreateBasicDetailsRequest, UpdateBasicDetailsRequest,
};
pub use daily_record::{
    CreateDailyRecordRequest, CreateRecordNameRequest, DailyRecordName, DailyRecordValue,
    UpdateDailyRecordRequest,
};
pub use user::{LoginRequest, NewUser, RegisterRequest, TokenResponse, User, UserCredentials};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Pair with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
