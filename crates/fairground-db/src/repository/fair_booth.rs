//! SurrealDB implementation of [`FairBoothRepository`] — the
//! fair-scoped booth snapshots.
//!
//! Creation happens inside the enrollment transaction (see the
//! enrollment repository); this repository only reads and edits the
//! copies, never the global booth.

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::enrollment::{FairBooth, UpdateFairBooth};
use fairground_core::repository::FairBoothRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct FairBoothRow {
    fair_id: String,
    company_id: String,
    company_name: String,
    industry: Option<String>,
    company_size: Option<String>,
    location: Option<String>,
    description: Option<String>,
    logo_url: Option<String>,
    website: Option<String>,
    careers_page: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
    hiring_for: Vec<String>,
    enrolled_by: String,
    enrolled_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct FairBoothRowWithId {
    record_id: String,
    fair_id: String,
    company_id: String,
    company_name: String,
    industry: Option<String>,
    company_size: Option<String>,
    location: Option<String>,
    description: Option<String>,
    logo_url: Option<String>,
    website: Option<String>,
    careers_page: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
    hiring_for: Vec<String>,
    enrolled_by: String,
    enrolled_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl FairBoothRow {
    fn into_fair_booth(self, id: Uuid) -> Result<FairBooth, DbError> {
        Ok(FairBooth {
            id,
            fair_id: parse_uuid(&self.fair_id, "fair")?,
            company_id: parse_uuid(&self.company_id, "company")?,
            company_name: self.company_name,
            industry: self.industry,
            company_size: self.company_size,
            location: self.location,
            description: self.description,
            logo_url: self.logo_url,
            website: self.website,
            careers_page: self.careers_page,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            hiring_for: self.hiring_for,
            enrolled_at: self.enrolled_at,
            enrolled_by: parse_uuid(&self.enrolled_by, "enrolling user")?,
            updated_at: self.updated_at,
        })
    }
}

impl FairBoothRowWithId {
    fn try_into_fair_booth(self) -> Result<FairBooth, DbError> {
        let id = parse_uuid(&self.record_id, "fair booth")?;
        FairBoothRow {
            fair_id: self.fair_id,
            company_id: self.company_id,
            company_name: self.company_name,
            industry: self.industry,
            company_size: self.company_size,
            location: self.location,
            description: self.description,
            logo_url: self.logo_url,
            website: self.website,
            careers_page: self.careers_page,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            hiring_for: self.hiring_for,
            enrolled_by: self.enrolled_by,
            enrolled_at: self.enrolled_at,
            updated_at: self.updated_at,
        }
        .into_fair_booth(id)
    }
}

/// SurrealDB implementation of the fair-scoped Booth repository.
#[derive(Clone)]
pub struct SurrealFairBoothRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFairBoothRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FairBoothRepository for SurrealFairBoothRepository<C> {
    async fn get_by_id(&self, fair_id: Uuid, booth_id: Uuid) -> FairgroundResult<FairBooth> {
        let id_str = booth_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('fair_booth', $id) \
                 WHERE fair_id = $fair_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairBoothRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair booth".into(),
            id: id_str,
        })?;

        Ok(row.into_fair_booth(booth_id)?)
    }

    async fn list_by_fair(&self, fair_id: Uuid) -> FairgroundResult<Vec<FairBooth>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM fair_booth \
                 WHERE fair_id = $fair_id \
                 ORDER BY company_name ASC",
            )
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FairBoothRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_fair_booth())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(
        &self,
        fair_id: Uuid,
        booth_id: Uuid,
        input: UpdateFairBooth,
    ) -> FairgroundResult<FairBooth> {
        let id_str = booth_id.to_string();

        let mut sets = Vec::new();
        if input.company_name.is_some() {
            sets.push("company_name = $company_name");
        }
        if input.industry.is_some() {
            sets.push("industry = $industry");
        }
        if input.company_size.is_some() {
            sets.push("company_size = $company_size");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.logo_url.is_some() {
            sets.push("logo_url = $logo_url");
        }
        if input.website.is_some() {
            sets.push("website = $website");
        }
        if input.careers_page.is_some() {
            sets.push("careers_page = $careers_page");
        }
        if input.contact_name.is_some() {
            sets.push("contact_name = $contact_name");
        }
        if input.contact_email.is_some() {
            sets.push("contact_email = $contact_email");
        }
        if input.hiring_for.is_some() {
            sets.push("hiring_for = $hiring_for");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('fair_booth', $id) SET {} \
             WHERE fair_id = $fair_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("fair_id", fair_id.to_string()));

        if let Some(company_name) = input.company_name {
            builder = builder.bind(("company_name", company_name));
        }
        if let Some(industry) = input.industry {
            builder = builder.bind(("industry", industry));
        }
        if let Some(company_size) = input.company_size {
            builder = builder.bind(("company_size", company_size));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(logo_url) = input.logo_url {
            builder = builder.bind(("logo_url", logo_url));
        }
        if let Some(website) = input.website {
            builder = builder.bind(("website", website));
        }
        if let Some(careers_page) = input.careers_page {
            builder = builder.bind(("careers_page", careers_page));
        }
        if let Some(contact_name) = input.contact_name {
            builder = builder.bind(("contact_name", contact_name));
        }
        if let Some(contact_email) = input.contact_email {
            builder = builder.bind(("contact_email", contact_email));
        }
        if let Some(hiring_for) = input.hiring_for {
            builder = builder.bind(("hiring_for", hiring_for));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FairBoothRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "fair booth".into(),
            id: id_str,
        })?;

        Ok(row.into_fair_booth(booth_id)?)
    }
}
