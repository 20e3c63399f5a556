//! SurrealDB implementation of [`FairRepository`].
//!
//! Fair deletion cascades to all fair-scoped tables inside a single
//! transaction, so a fair can never be observed half-deleted. The
//! UNIQUE index on `invite_code` backs invite-code resolution
//! (exactly one fair per code).

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::fair::{CreateFair, Fair, UpdateFair};
use fairground_core::repository::{FairRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct FairRow {
    name: String,
    description: Option<String>,
    is_live: bool,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    invite_code: String,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct FairRowWithId {
    record_id: String,
    name: String,
    description: Option<String>,
    is_live: bool,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    invite_code: String,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl FairRow {
    fn into_fair(self, id: Uuid) -> Result<Fair, DbError> {
        Ok(Fair {
            id,
            name: self.name,
            description: self.description,
            is_live: self.is_live,
            start_time: self.start_time,
            end_time: self.end_time,
            invite_code: self.invite_code,
            created_at: self.created_at,
            created_by: parse_uuid(&self.created_by, "creator")?,
            updated_at: self.updated_at,
            updated_by: parse_uuid(&self.updated_by, "updater")?,
        })
    }
}

impl FairRowWithId {
    fn try_into_fair(self) -> Result<Fair, DbError> {
        let id = parse_uuid(&self.record_id, "fair")?;
        FairRow {
            name: self.name,
            description: self.description,
            is_live: self.is_live,
            start_time: self.start_time,
            end_time: self.end_time,
            invite_code: self.invite_code,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_fair(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Fair repository.
#[derive(Clone)]
pub struct SurrealFairRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFairRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FairRepository for SurrealFairRepository<C> {
    async fn create(&self, input: CreateFair) -> FairgroundResult<Fair> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('fair', $id) SET \
                 name = $name, \
                 description = $description, \
                 start_time = $start_time, \
                 end_time = $end_time, \
                 invite_code = $invite_code, \
                 created_by = $created_by, \
                 updated_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("start_time", input.start_time))
            .bind(("end_time", input.end_time))
            .bind(("invite_code", input.invite_code))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(|e| DbError::from_write(e, "fair invite code"))?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "fair invite code"))?;

        let rows: Vec<FairRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair".into(),
            id: id_str,
        })?;

        Ok(row.into_fair(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FairgroundResult<Fair> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('fair', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair".into(),
            id: id_str,
        })?;

        Ok(row.into_fair(id)?)
    }

    async fn get_by_invite_code(&self, invite_code: &str) -> FairgroundResult<Fair> {
        let code_owned = invite_code.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM fair \
                 WHERE invite_code = $invite_code",
            )
            .bind(("invite_code", code_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair".into(),
            id: format!("invite_code={code_owned}"),
        })?;

        Ok(row.try_into_fair()?)
    }

    async fn update(&self, id: Uuid, input: UpdateFair, updated_by: Uuid) -> FairgroundResult<Fair> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.is_live.is_some() {
            sets.push("is_live = $is_live");
        }
        if input.start_time.is_some() {
            sets.push("start_time = $start_time");
        }
        if input.end_time.is_some() {
            sets.push("end_time = $end_time");
        }
        if input.invite_code.is_some() {
            sets.push("invite_code = $invite_code");
        }
        sets.push("updated_by = $updated_by");
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('fair', $id) SET {}", sets.join(", "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("updated_by", updated_by.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(is_live) = input.is_live {
            builder = builder.bind(("is_live", is_live));
        }
        if let Some(start_time) = input.start_time {
            builder = builder.bind(("start_time", start_time));
        }
        if let Some(end_time) = input.end_time {
            builder = builder.bind(("end_time", end_time));
        }
        if let Some(invite_code) = input.invite_code {
            builder = builder.bind(("invite_code", invite_code));
        }

        let result = builder
            .await
            .map_err(|e| DbError::from_write(e, "fair invite code"))?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "fair invite code"))?;

        let rows: Vec<FairRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair".into(),
            id: id_str,
        })?;

        Ok(row.into_fair(id)?)
    }

    async fn delete_cascade(&self, id: Uuid) -> FairgroundResult<()> {
        let id_str = id.to_string();
        debug!(fair_id = %id_str, "Cascade-deleting fair");

        // Everything under the fair goes with the fair row itself, in
        // one transaction.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE fair_booth WHERE fair_id = $fair_id; \
                 DELETE fair_job WHERE fair_id = $fair_id; \
                 DELETE enrollment WHERE fair_id = $fair_id; \
                 DELETE type::record('fair', $fair_id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("fair_id", id_str))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> FairgroundResult<PaginatedResult<Fair>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM fair GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM fair \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_fair())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
