//! SurrealDB implementation of [`CompanyRepository`].

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::company::{Company, CreateCompany, UpdateCompany};
use fairground_core::repository::{CompanyRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CompanyRow {
    company_name: String,
    owner_id: String,
    representative_ids: Vec<String>,
    booth_id: Option<String>,
    invite_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CompanyRowWithId {
    record_id: String,
    company_name: String,
    owner_id: String,
    representative_ids: Vec<String>,
    booth_id: Option<String>,
    invite_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl CompanyRow {
    fn into_company(self, id: Uuid) -> Result<Company, DbError> {
        let owner_id = parse_uuid(&self.owner_id, "owner")?;
        let representative_ids = self
            .representative_ids
            .iter()
            .map(|r| parse_uuid(r, "representative"))
            .collect::<Result<Vec<_>, DbError>>()?;
        let booth_id = self
            .booth_id
            .as_deref()
            .map(|b| parse_uuid(b, "booth"))
            .transpose()?;
        Ok(Company {
            id,
            company_name: self.company_name,
            owner_id,
            representative_ids,
            booth_id,
            invite_code: self.invite_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CompanyRowWithId {
    fn try_into_company(self) -> Result<Company, DbError> {
        let id = parse_uuid(&self.record_id, "company")?;
        CompanyRow {
            company_name: self.company_name,
            owner_id: self.owner_id,
            representative_ids: self.representative_ids,
            booth_id: self.booth_id,
            invite_code: self.invite_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_company(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create(&self, input: CreateCompany) -> FairgroundResult<Company> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('company', $id) SET \
                 company_name = $company_name, \
                 owner_id = $owner_id, \
                 representative_ids = [], \
                 invite_code = $invite_code",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_name", input.company_name))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("invite_code", input.invite_code))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FairgroundResult<Company> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('company', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateCompany) -> FairgroundResult<Company> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.company_name.is_some() {
            sets.push("company_name = $company_name");
        }
        if input.booth_id.is_some() {
            sets.push("booth_id = $booth_id");
        }
        if input.invite_code.is_some() {
            sets.push("invite_code = $invite_code");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('company', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(company_name) = input.company_name {
            builder = builder.bind(("company_name", company_name));
        }
        if let Some(booth_id) = input.booth_id {
            builder = builder.bind(("booth_id", booth_id.map(|b| b.to_string())));
        }
        if let Some(invite_code) = input.invite_code {
            builder = builder.bind(("invite_code", invite_code));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id)?)
    }

    async fn delete(&self, id: Uuid) -> FairgroundResult<()> {
        self.db
            .query("DELETE type::record('company', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> FairgroundResult<PaginatedResult<Company>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM company GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_company())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn add_representative(&self, company_id: Uuid, user_id: Uuid) -> FairgroundResult<()> {
        // array::union keeps the operation idempotent.
        self.db
            .query(
                "UPDATE type::record('company', $id) SET \
                 representative_ids = array::union(representative_ids, [$user_id]), \
                 updated_at = time::now()",
            )
            .bind(("id", company_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_representative(&self, company_id: Uuid, user_id: Uuid) -> FairgroundResult<()> {
        self.db
            .query(
                "UPDATE type::record('company', $id) SET \
                 representative_ids -= $user_id, \
                 updated_at = time::now()",
            )
            .bind(("id", company_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
