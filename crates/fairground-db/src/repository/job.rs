//! SurrealDB implementation of [`JobRepository`] — global job postings.

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::job::{CreateJob, Job, UpdateJob};
use fairground_core::repository::JobRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct JobRow {
    company_id: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    employment_type: Option<String>,
    apply_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct JobRowWithId {
    record_id: String,
    company_id: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    employment_type: Option<String>,
    apply_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_job(self, id: Uuid) -> Result<Job, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Migration(format!("invalid company UUID: {e}")))?;
        Ok(Job {
            id,
            company_id,
            title: self.title,
            description: self.description,
            location: self.location,
            employment_type: self.employment_type,
            apply_url: self.apply_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl JobRowWithId {
    fn try_into_job(self) -> Result<Job, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        JobRow {
            company_id: self.company_id,
            title: self.title,
            description: self.description,
            location: self.location,
            employment_type: self.employment_type,
            apply_url: self.apply_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_job(id)
    }
}

/// SurrealDB implementation of the global Job repository.
#[derive(Clone)]
pub struct SurrealJobRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealJobRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> JobRepository for SurrealJobRepository<C> {
    async fn create(&self, input: CreateJob) -> FairgroundResult<Job> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('job', $id) SET \
                 company_id = $company_id, \
                 title = $title, \
                 description = $description, \
                 location = $location, \
                 employment_type = $employment_type, \
                 apply_url = $apply_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", input.company_id.to_string()))
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

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FairgroundResult<Job> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('job', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn list_by_company(&self, company_id: Uuid) -> FairgroundResult<Vec<Job>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM job \
                 WHERE company_id = $company_id \
                 ORDER BY created_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_job())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(&self, id: Uuid, input: UpdateJob) -> FairgroundResult<Job> {
        let id_str = id.to_string();

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
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('job', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

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

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn delete(&self, id: Uuid) -> FairgroundResult<()> {
        self.db
            .query("DELETE type::record('job', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
