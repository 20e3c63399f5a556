//! SurrealDB implementation of [`FairJobRepository`] — fair-scoped
//! job copies with a lifecycle independent of their source job.

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::enrollment::{CreateFairJob, FairJob, UpdateFairJob};
use fairground_core::repository::FairJobRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct FairJobRow {
    fair_id: String,
    company_id: String,
    source_job_id: Option<String>,
    title: String,
    description: Option<String>,
    location: Option<String>,
    employment_type: Option<String>,
    apply_url: Option<String>,
    copied_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct FairJobRowWithId {
    record_id: String,
    fair_id: String,
    company_id: String,
    source_job_id: Option<String>,
    title: String,
    description: Option<String>,
    location: Option<String>,
    employment_type: Option<String>,
    apply_url: Option<String>,
    copied_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl FairJobRow {
    fn into_fair_job(self, id: Uuid) -> Result<FairJob, DbError> {
        Ok(FairJob {
            id,
            fair_id: parse_uuid(&self.fair_id, "fair")?,
            company_id: parse_uuid(&self.company_id, "company")?,
            source_job_id: self
                .source_job_id
                .as_deref()
                .map(|s| parse_uuid(s, "source job"))
                .transpose()?,
            title: self.title,
            description: self.description,
            location: self.location,
            employment_type: self.employment_type,
            apply_url: self.apply_url,
            copied_at: self.copied_at,
        })
    }
}

impl FairJobRowWithId {
    fn try_into_fair_job(self) -> Result<FairJob, DbError> {
        let id = parse_uuid(&self.record_id, "fair job")?;
        FairJobRow {
            fair_id: self.fair_id,
            company_id: self.company_id,
            source_job_id: self.source_job_id,
            title: self.title,
            description: self.description,
            location: self.location,
            employment_type: self.employment_type,
            apply_url: self.apply_url,
            copied_at: self.copied_at,
        }
        .into_fair_job(id)
    }
}

/// SurrealDB implementation of the fair-scoped Job repository.
#[derive(Clone)]
pub struct SurrealFairJobRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFairJobRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FairJobRepository for SurrealFairJobRepository<C> {
    async fn create(&self, input: CreateFairJob) -> FairgroundResult<FairJob> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('fair_job', $id) SET \
                 fair_id = $fair_id, \
                 company_id = $company_id, \
                 source_job_id = $source_job_id, \
                 title = $title, \
                 description = $description, \
                 location = $location, \
                 employment_type = $employment_type, \
                 apply_url = $apply_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("fair_id", input.fair_id.to_string()))
            .bind(("company_id", input.company_id.to_string()))
            .bind(("source_job_id", input.source_job_id.map(|s| s.to_string())))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("location", input.location))
            .bind(("employment_type", input.employment_type))
            .bind(("apply_url", input.apply_url))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FairJobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair job".into(),
            id: id_str,
        })?;

        Ok(row.into_fair_job(id)?)
    }

    async fn get_by_id(&self, fair_id: Uuid, job_id: Uuid) -> FairgroundResult<FairJob> {
        let id_str = job_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('fair_job', $id) \
                 WHERE fair_id = $fair_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairJobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair job".into(),
            id: id_str,
        })?;

        Ok(row.into_fair_job(job_id)?)
    }

    async fn list_by_fair(&self, fair_id: Uuid) -> FairgroundResult<Vec<FairJob>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM fair_job \
                 WHERE fair_id = $fair_id \
                 ORDER BY copied_at ASC",
            )
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairJobRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_fair_job())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
        input: UpdateFairJob,
    ) -> FairgroundResult<FairJob> {
        let id_str = job_id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.employment_type.is_some() {
            sets.push("employment_type = $employment_type");
        }
        if input.apply_url.is_some() {
            sets.push("apply_url = $apply_url");
        }
        if sets.is_empty() {
            // Nothing to change.
            return self.get_by_id(fair_id, job_id).await;
        }

        let query = format!(
            "UPDATE type::record('fair_job', $id) SET {} \
             WHERE fair_id = $fair_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("fair_id", fair_id.to_string()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(employment_type) = input.employment_type {
            builder = builder.bind(("employment_type", employment_type));
        }
        if let Some(apply_url) = input.apply_url {
            builder = builder.bind(("apply_url", apply_url));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FairJobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair job".into(),
            id: id_str,
        })?;

        Ok(row.into_fair_job(job_id)?)
    }

    async fn delete(&self, fair_id: Uuid, job_id: Uuid) -> FairgroundResult<()> {
        self.db
            .query(
                "DELETE type::record('fair_job', $id) \
                 WHERE fair_id = $fair_id",
            )
            .bind(("id", job_id.to_string()))
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
