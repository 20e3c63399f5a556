//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use fairground_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    role: String,
    name: String,
    email: String,
    company_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "Administrator" => Ok(UserRole::Administrator),
        "CompanyOwner" => Ok(UserRole::CompanyOwner),
        "Representative" => Ok(UserRole::Representative),
        "Student" => Ok(UserRole::Student),
        other => Err(DbError::Migration(format!("unknown user role: {other}"))),
    }
}

fn role_to_string(role: UserRole) -> &'static str {
    match role {
        UserRole::Administrator => "Administrator",
        UserRole::CompanyOwner => "CompanyOwner",
        UserRole::Representative => "Representative",
        UserRole::Student => "Student",
    }
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let company_id = self
            .company_id
            .map(|c| {
                Uuid::parse_str(&c)
                    .map_err(|e| DbError::Migration(format!("invalid company UUID: {e}")))
            })
            .transpose()?;
        Ok(User {
            id,
            role: parse_role(&self.role)?,
            name: self.name,
            email: self.email,
            company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> FairgroundResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 role = $role, \
                 name = $name, \
                 email = $email, \
                 company_id = $company_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("role", role_to_string(input.role)))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("company_id", input.company_id.map(|c| c.to_string())))
            .await
            .map_err(|e| DbError::from_write(e, "user"))?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "user"))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FairgroundResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> FairgroundResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.company_id.is_some() {
            sets.push("company_id = $company_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(role) = input.role {
            builder = builder.bind(("role", role_to_string(role)));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(company_id) = input.company_id {
            builder = builder.bind(("company_id", company_id.map(|c| c.to_string())));
        }

        let result = builder.await.map_err(|e| DbError::from_write(e, "user"))?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "user"))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }
}
