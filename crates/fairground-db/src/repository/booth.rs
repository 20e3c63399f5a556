//! SurrealDB implementation of [`BoothRepository`] — the global,
//! fair-independent booth profiles.

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::booth::{Booth, CreateBooth, UpdateBooth};
use fairground_core::repository::BoothRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BoothRow {
    company_id: String,
    company_name: Option<String>,
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
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoothRow {
    fn into_booth(self, id: Uuid) -> Result<Booth, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Migration(format!("invalid company UUID: {e}")))?;
        Ok(Booth {
            id,
            company_id,
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
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the global Booth repository.
#[derive(Clone)]
pub struct SurrealBoothRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBoothRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BoothRepository for SurrealBoothRepository<C> {
    async fn create(&self, input: CreateBooth) -> FairgroundResult<Booth> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('booth', $id) SET \
                 company_id = $company_id, \
                 company_name = $company_name, \
                 industry = $industry, \
                 company_size = $company_size, \
                 location = $location, \
                 description = $description, \
                 logo_url = $logo_url, \
                 website = $website, \
                 careers_page = $careers_page, \
                 contact_name = $contact_name, \
                 contact_email = $contact_email, \
                 hiring_for = $hiring_for",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", input.company_id.to_string()))
            .bind(("company_name", input.company_name))
            .bind(("industry", input.industry))
            .bind(("company_size", input.company_size))
            .bind(("location", input.location))
            .bind(("description", input.description))
            .bind(("logo_url", input.logo_url))
            .bind(("website", input.website))
            .bind(("careers_page", input.careers_page))
            .bind(("contact_name", input.contact_name))
            .bind(("contact_email", input.contact_email))
            .bind(("hiring_for", input.hiring_for))
            .await
            .map_err(|e| DbError::from_write(e, "booth"))?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "booth"))?;

        let rows: Vec<BoothRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booth".into(),
            id: id_str,
        })?;

        Ok(row.into_booth(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FairgroundResult<Booth> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('booth', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BoothRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booth".into(),
            id: id_str,
        })?;

        Ok(row.into_booth(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateBooth) -> FairgroundResult<Booth> {
        let id_str = id.to_string();

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

        let query = format!("UPDATE type::record('booth', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

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

        let rows: Vec<BoothRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booth".into(),
            id: id_str,
        })?;

        Ok(row.into_booth(id)?)
    }
}
