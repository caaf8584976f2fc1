//! Repository traits for data access.
//!
//! Handlers talk to storage only through these traits so that the Postgres
//! backend and the in-memory backend are interchangeable. Method names are
//! prefixed per resource because every backend implements all of them.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    BasicDetails, CreateBasicDetailsRequest, CreateDailyRecordRequest, DailyRecordName,
    DailyRecordValue, NewUser, UpdateBasicDetailsRequest, UpdateDailyRecordRequest, User,
    UserCredentials,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account. Duplicate usernames are a conflict.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;
}

#[async_trait]
pub trait BasicDetailsRepository: Send + Sync {
    /// Insert the user's record. A second record for the same user is a
    /// conflict.
    async fn create_basic_details(&self, dto: CreateBasicDetailsRequest) -> Result<BasicDetails>;

    async fn find_basic_details(&self, user_id: i64) -> Result<Option<BasicDetails>>;

    /// Apply a partial update. `None` when the user has no record.
    async fn update_basic_details(
        &self,
        user_id: i64,
        dto: &UpdateBasicDetailsRequest,
    ) -> Result<Option<BasicDetails>>;

    /// `true` if a record was removed
    async fn delete_basic_details(&self, user_id: i64) -> Result<bool>;

    async fn count_basic_details(&self) -> Result<i64>;
}

#[async_trait]
pub trait RecordNameRepository: Send + Sync {
    /// Insert a metric label. Duplicate labels are a conflict.
    async fn create_record_name(&self, recordname: &str) -> Result<DailyRecordName>;

    async fn find_record_name(&self, id: i64) -> Result<Option<DailyRecordName>>;

    /// All labels ordered by id
    async fn list_record_names(&self) -> Result<Vec<DailyRecordName>>;
}

#[async_trait]
pub trait DailyRecordRepository: Send + Sync {
    async fn create_daily_record(&self, dto: CreateDailyRecordRequest) -> Result<DailyRecordValue>;

    async fn find_daily_record(&self, id: i64) -> Result<Option<DailyRecordValue>>;

    /// A user's records ordered by `datetime`, then `id`
    async fn list_daily_records(&self, user_id: i64) -> Result<Vec<DailyRecordValue>>;

    /// Apply a partial update. `None` when the record does not exist.
    async fn update_daily_record(
        &self,
        id: i64,
        dto: &UpdateDailyRecordRequest,
    ) -> Result<Option<DailyRecordValue>>;

    /// `true` if the record was removed
    async fn delete_daily_record(&self, id: i64) -> Result<bool>;

    /// Remove every record of a user, returning how many were removed
    async fn delete_daily_records_for_user(&self, user_id: i64) -> Result<u64>;

    async fn count_daily_records(&self) -> Result<i64>;
}

/// Everything the HTTP layer needs from a storage backend
#[async_trait]
pub trait Store:
    UserRepository + BasicDetailsRepository + RecordNameRepository + DailyRecordRepository
{
    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> Result<()>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
