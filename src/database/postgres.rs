//! Postgres storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::repository::{
    BasicDetailsRepository, DailyRecordRepository, RecordNameRepository, Store, UserRepository,
};
use crate::auth::Role;
use crate::error::{ApiError, Result};
use crate::models::{
    BasicDetails, CovidTestDone, CreateBasicDetailsRequest, CreateDailyRecordRequest,
    DailyRecordName, DailyRecordValue, NewUser, UpdateBasicDetailsRequest,
    UpdateDailyRecordRequest, User, UserCredentials,
};

const BASIC_DETAILS_COLUMNS: &str = "id, user_id, date_of_diagnosis, admitted_in_hospital, \
     covid_test_done, covid_test_type, covid_test_report, created_at, updated_at";

const DAILY_RECORD_COLUMNS: &str = "id, user_id, recordname_id, value, datetime";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ApiError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            username: row.username,
            role: Role::from_str(&row.role).map_err(ApiError::Internal)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

#[derive(Debug, FromRow)]
struct BasicDetailsRow {
    id: i64,
    user_id: i64,
    date_of_diagnosis: Option<DateTime<Utc>>,
    admitted_in_hospital: Option<DateTime<Utc>>,
    covid_test_done: String,
    covid_test_type: Option<String>,
    covid_test_report: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BasicDetailsRow> for BasicDetails {
    type Error = ApiError;

    fn try_from(row: BasicDetailsRow) -> Result<Self> {
        Ok(BasicDetails {
            id: row.id,
            user: row.user_id,
            date_of_diagnosis: row.date_of_diagnosis,
            admitted_in_hospital: row.admitted_in_hospital,
            covid_test_done: row
                .covid_test_done
                .parse::<CovidTestDone>()
                .map_err(ApiError::Internal)?,
            covid_test_type: row.covid_test_type,
            covid_test_report: row.covid_test_report,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct DailyRecordRow {
    id: i64,
    user_id: i64,
    recordname_id: i64,
    value: f64,
    datetime: DateTime<Utc>,
}

impl From<DailyRecordRow> for DailyRecordValue {
    fn from(row: DailyRecordRow) -> Self {
        DailyRecordValue {
            id: row.id,
            user: row.user_id,
            recordname: row.recordname_id,
            value: row.value,
            datetime: row.datetime,
        }
    }
}

#[derive(Debug, FromRow)]
struct RecordNameRow {
    id: i64,
    recordname: String,
}

impl From<RecordNameRow> for DailyRecordName {
    fn from(row: RecordNameRow) -> Self {
        DailyRecordName {
            id: row.id,
            recordname: row.recordname,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, username, role, created_at",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "User"))?;

        row.try_into()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(UserCredentials {
                id: r.id,
                username: r.username,
                password_hash: r.password_hash,
                role: Role::from_str(&r.role).map_err(ApiError::Internal)?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl BasicDetailsRepository for PgStore {
    async fn create_basic_details(&self, dto: CreateBasicDetailsRequest) -> Result<BasicDetails> {
        let row = sqlx::query_as::<_, BasicDetailsRow>(&format!(
            "INSERT INTO basic_details
                (user_id, date_of_diagnosis, admitted_in_hospital,
                 covid_test_done, covid_test_type, covid_test_report)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            BASIC_DETAILS_COLUMNS
        ))
        .bind(dto.user)
        .bind(dto.date_of_diagnosis)
        .bind(dto.admitted_in_hospital)
        .bind(dto.covid_test_done.as_str())
        .bind(&dto.covid_test_type)
        .bind(&dto.covid_test_report)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Basic details"))?;

        row.try_into()
    }

    async fn find_basic_details(&self, user_id: i64) -> Result<Option<BasicDetails>> {
        sqlx::query_as::<_, BasicDetailsRow>(&format!(
            "SELECT {} FROM basic_details WHERE user_id = $1",
            BASIC_DETAILS_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(BasicDetails::try_from)
        .transpose()
    }

    async fn update_basic_details(
        &self,
        user_id: i64,
        dto: &UpdateBasicDetailsRequest,
    ) -> Result<Option<BasicDetails>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, BasicDetailsRow>(&format!(
            "SELECT {} FROM basic_details WHERE user_id = $1 FOR UPDATE",
            BASIC_DETAILS_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let mut details = BasicDetails::try_from(current)?;
        dto.apply_to(&mut details);

        let row = sqlx::query_as::<_, BasicDetailsRow>(&format!(
            "UPDATE basic_details
             SET date_of_diagnosis = $2, admitted_in_hospital = $3, covid_test_done = $4,
                 covid_test_type = $5, covid_test_report = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            BASIC_DETAILS_COLUMNS
        ))
        .bind(details.id)
        .bind(details.date_of_diagnosis)
        .bind(details.admitted_in_hospital)
        .bind(details.covid_test_done.as_str())
        .bind(&details.covid_test_type)
        .bind(&details.covid_test_report)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into().map(Some)
    }

    async fn delete_basic_details(&self, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM basic_details WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_basic_details(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM basic_details")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RecordNameRepository for PgStore {
    async fn create_record_name(&self, recordname: &str) -> Result<DailyRecordName> {
        let row = sqlx::query_as::<_, RecordNameRow>(
            "INSERT INTO daily_record_names (recordname) VALUES ($1) RETURNING id, recordname",
        )
        .bind(recordname)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Record name"))?;

        Ok(row.into())
    }

    async fn find_record_name(&self, id: i64) -> Result<Option<DailyRecordName>> {
        let row = sqlx::query_as::<_, RecordNameRow>(
            "SELECT id, recordname FROM daily_record_names WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_record_names(&self) -> Result<Vec<DailyRecordName>> {
        let rows = sqlx::query_as::<_, RecordNameRow>(
            "SELECT id, recordname FROM daily_record_names ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl DailyRecordRepository for PgStore {
    async fn create_daily_record(&self, dto: CreateDailyRecordRequest) -> Result<DailyRecordValue> {
        let row = sqlx::query_as::<_, DailyRecordRow>(&format!(
            "INSERT INTO daily_record_values (user_id, recordname_id, value, datetime)
             VALUES ($1, $2, $3, COALESCE($4, NOW()))
             RETURNING {}",
            DAILY_RECORD_COLUMNS
        ))
        .bind(dto.user)
        .bind(dto.recordname)
        .bind(dto.value)
        .bind(dto.datetime)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Daily record"))?;

        Ok(row.into())
    }

    async fn find_daily_record(&self, id: i64) -> Result<Option<DailyRecordValue>> {
        let row = sqlx::query_as::<_, DailyRecordRow>(&format!(
            "SELECT {} FROM daily_record_values WHERE id = $1",
            DAILY_RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_daily_records(&self, user_id: i64) -> Result<Vec<DailyRecordValue>> {
        let rows = sqlx::query_as::<_, DailyRecordRow>(&format!(
            "SELECT {} FROM daily_record_values WHERE user_id = $1 ORDER BY datetime, id",
            DAILY_RECORD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_daily_record(
        &self,
        id: i64,
        dto: &UpdateDailyRecordRequest,
    ) -> Result<Option<DailyRecordValue>> {
        let row = sqlx::query_as::<_, DailyRecordRow>(&format!(
            "UPDATE daily_record_values
             SET recordname_id = COALESCE($2, recordname_id),
                 value = COALESCE($3, value),
                 datetime = COALESCE($4, datetime)
             WHERE id = $1
             RETURNING {}",
            DAILY_RECORD_COLUMNS
        ))
        .bind(id)
        .bind(dto.recordname)
        .bind(dto.value)
        .bind(dto.datetime)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Daily record"))?;

        Ok(row.map(Into::into))
    }

    async fn delete_daily_record(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM daily_record_values WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_daily_records_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM daily_record_values WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_daily_records(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_record_values")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
