//! In-memory storage backend.
//!
//! Mirrors the constraints of the Postgres schema (unique usernames, one
//! basic details record per user, unique record names, foreign keys) so the
//! HTTP layer behaves the same on either backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::repository::{
    BasicDetailsRepository, DailyRecordRepository, RecordNameRepository, Store, UserRepository,
};
use crate::error::{ApiError, ErrorCode, Result};
use crate::models::{
    BasicDetails, CreateBasicDetailsRequest, CreateDailyRecordRequest, DailyRecordName,
    DailyRecordValue, NewUser, UpdateBasicDetailsRequest, UpdateDailyRecordRequest, User,
    UserCredentials,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, (User, String)>,
    basic_details: BTreeMap<i64, BasicDetails>,
    record_names: BTreeMap<i64, DailyRecordName>,
    daily_records: BTreeMap<i64, DailyRecordValue>,
    next_user_id: i64,
    next_basic_details_id: i64,
    next_record_name_id: i64,
    next_daily_record_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn missing_reference(resource: &str, field: &str) -> ApiError {
    ApiError::with_details(
        ErrorCode::InvalidInput,
        format!("{} references a missing row", resource),
        format!("{} does not exist", field),
    )
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|(u, _)| u.username == user.username) {
            return Err(ApiError::already_exists("User"));
        }

        let id = next_id(&mut tables.next_user_id);
        let created = User {
            id,
            username: user.username,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|(user, _)| user.username == username)
            .map(|(user, hash)| UserCredentials {
                id: user.id,
                username: user.username.clone(),
                password_hash: hash.clone(),
                role: user.role,
            }))
    }
}

#[async_trait]
impl BasicDetailsRepository for MemoryStore {
    async fn create_basic_details(&self, dto: CreateBasicDetailsRequest) -> Result<BasicDetails> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&dto.user) {
            return Err(missing_reference("Basic details", "user"));
        }
        if tables.basic_details.values().any(|d| d.user == dto.user) {
            return Err(ApiError::already_exists("Basic details"));
        }

        let id = next_id(&mut tables.next_basic_details_id);
        let now = Utc::now();
        let details = BasicDetails {
            id,
            user: dto.user,
            date_of_diagnosis: dto.date_of_diagnosis,
            admitted_in_hospital: dto.admitted_in_hospital,
            covid_test_done: dto.covid_test_done,
            covid_test_type: dto.covid_test_type,
            covid_test_report: dto.covid_test_report,
            created_at: now,
            updated_at: now,
        };
        tables.basic_details.insert(id, details.clone());
        Ok(details)
    }

    async fn find_basic_details(&self, user_id: i64) -> Result<Option<BasicDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .basic_details
            .values()
            .find(|d| d.user == user_id)
            .cloned())
    }

    async fn update_basic_details(
        &self,
        user_id: i64,
        dto: &UpdateBasicDetailsRequest,
    ) -> Result<Option<BasicDetails>> {
        let mut tables = self.tables.write().await;
        let Some(details) = tables.basic_details.values_mut().find(|d| d.user == user_id) else {
            return Ok(None);
        };

        dto.apply_to(details);
        details.updated_at = Utc::now();
        Ok(Some(details.clone()))
    }

    async fn delete_basic_details(&self, user_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.basic_details.len();
        tables.basic_details.retain(|_, d| d.user != user_id);
        Ok(tables.basic_details.len() < before)
    }

    async fn count_basic_details(&self) -> Result<i64> {
        Ok(self.tables.read().await.basic_details.len() as i64)
    }
}

#[async_trait]
impl RecordNameRepository for MemoryStore {
    async fn create_record_name(&self, recordname: &str) -> Result<DailyRecordName> {
        let mut tables = self.tables.write().await;
        if tables.record_names.values().any(|n| n.recordname == recordname) {
            return Err(ApiError::already_exists("Record name"));
        }

        let id = next_id(&mut tables.next_record_name_id);
        let name = DailyRecordName {
            id,
            recordname: recordname.to_string(),
        };
        tables.record_names.insert(id, name.clone());
        Ok(name)
    }

    async fn find_record_name(&self, id: i64) -> Result<Option<DailyRecordName>> {
        Ok(self.tables.read().await.record_names.get(&id).cloned())
    }

    async fn list_record_names(&self) -> Result<Vec<DailyRecordName>> {
        Ok(self.tables.read().await.record_names.values().cloned().collect())
    }
}

#[async_trait]
impl DailyRecordRepository for MemoryStore {
    async fn create_daily_record(&self, dto: CreateDailyRecordRequest) -> Result<DailyRecordValue> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&dto.user) {
            return Err(missing_reference("Daily record", "user"));
        }
        if !tables.record_names.contains_key(&dto.recordname) {
            return Err(missing_reference("Daily record", "recordname"));
        }

        let id = next_id(&mut tables.next_daily_record_id);
        let record = DailyRecordValue {
            id,
            user: dto.user,
            recordname: dto.recordname,
            value: dto.value,
            datetime: dto.datetime.unwrap_or_else(Utc::now),
        };
        tables.daily_records.insert(id, record.clone());
        Ok(record)
    }

    async fn find_daily_record(&self, id: i64) -> Result<Option<DailyRecordValue>> {
        Ok(self.tables.read().await.daily_records.get(&id).cloned())
    }

    async fn list_daily_records(&self, user_id: i64) -> Result<Vec<DailyRecordValue>> {
        let tables = self.tables.read().await;
        let mut records: Vec<DailyRecordValue> = tables
            .daily_records
            .values()
            .filter(|r| r.user == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.datetime.cmp(&b.datetime).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn update_daily_record(
        &self,
        id: i64,
        dto: &UpdateDailyRecordRequest,
    ) -> Result<Option<DailyRecordValue>> {
        let mut tables = self.tables.write().await;
        if let Some(recordname) = dto.recordname {
            if !tables.record_names.contains_key(&recordname) {
                return Err(missing_reference("Daily record", "recordname"));
            }
        }

        let Some(record) = tables.daily_records.get_mut(&id) else {
            return Ok(None);
        };
        dto.apply_to(record);
        Ok(Some(record.clone()))
    }

    async fn delete_daily_record(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.daily_records.remove(&id).is_some())
    }

    async fn delete_daily_records_for_user(&self, user_id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.daily_records.len();
        tables.daily_records.retain(|_, r| r.user != user_id);
        Ok((before - tables.daily_records.len()) as u64)
    }

    async fn count_daily_records(&self) -> Result<i64> {
        Ok(self.tables.read().await.daily_records.len() as i64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
