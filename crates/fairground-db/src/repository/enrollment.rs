//! SurrealDB implementation of [`EnrollmentRepository`].
//!
//! Enrollment is the anchor of the fair-scoped keyspace: creating one
//! also forks the company's booth snapshot and job copies, and
//! removing one sweeps them away. Both directions run as a single
//! transaction, and the UNIQUE `(fair_id, company_id)` index rejects
//! a concurrent duplicate enrollment at commit time.

use chrono::{DateTime, Utc};
use fairground_core::error::FairgroundResult;
use fairground_core::models::enrollment::{
    CreateEnrollment, CreateFairBooth, CreateFairJob, Enrollment, EnrollmentMethod,
};
use fairground_core::repository::EnrollmentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct EnrollmentRowWithId {
    record_id: String,
    fair_id: String,
    company_id: String,
    company_name: String,
    method: String,
    booth_id: Option<String>,
    enrolled_by: String,
    enrolled_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

fn parse_method(s: &str) -> Result<EnrollmentMethod, DbError> {
    match s {
        "Admin" => Ok(EnrollmentMethod::Admin),
        "InviteCode" => Ok(EnrollmentMethod::InviteCode),
        "Migration" => Ok(EnrollmentMethod::Migration),
        other => Err(DbError::Migration(format!(
            "unknown enrollment method: {other}"
        ))),
    }
}

fn method_to_string(method: EnrollmentMethod) -> &'static str {
    match method {
        EnrollmentMethod::Admin => "Admin",
        EnrollmentMethod::InviteCode => "InviteCode",
        EnrollmentMethod::Migration => "Migration",
    }
}

impl EnrollmentRowWithId {
    fn try_into_enrollment(self) -> Result<Enrollment, DbError> {
        Ok(Enrollment {
            id: parse_uuid(&self.record_id, "enrollment")?,
            fair_id: parse_uuid(&self.fair_id, "fair")?,
            company_id: parse_uuid(&self.company_id, "company")?,
            company_name: self.company_name,
            method: parse_method(&self.method)?,
            booth_id: self
                .booth_id
                .as_deref()
                .map(|b| parse_uuid(b, "booth"))
                .transpose()?,
            enrolled_at: self.enrolled_at,
            enrolled_by: parse_uuid(&self.enrolled_by, "enrolling user")?,
        })
    }
}

/// SurrealDB implementation of the Enrollment repository.
#[derive(Clone)]
pub struct SurrealEnrollmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEnrollmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EnrollmentRepository for SurrealEnrollmentRepository<C> {
    async fn enroll_with_snapshot(
        &self,
        enrollment: CreateEnrollment,
        booth: CreateFairBooth,
        jobs: Vec<CreateFairJob>,
    ) -> FairgroundResult<Enrollment> {
        let enrollment_id = Uuid::new_v4();
        let fair_id_str = enrollment.fair_id.to_string();
        let company_id_str = enrollment.company_id.to_string();
        debug!(
            fair_id = %fair_id_str,
            company_id = %company_id_str,
            jobs = jobs.len(),
            "Creating enrollment with booth and job snapshots"
        );

        let mut statements = vec![
            "BEGIN TRANSACTION".to_string(),
            "CREATE type::record('fair_booth', $booth_id) SET \
             fair_id = $fair_id, \
             company_id = $company_id, \
             company_name = $b_company_name, \
             industry = $b_industry, \
             company_size = $b_company_size, \
             location = $b_location, \
             description = $b_description, \
             logo_url = $b_logo_url, \
             website = $b_website, \
             careers_page = $b_careers_page, \
             contact_name = $b_contact_name, \
             contact_email = $b_contact_email, \
             hiring_for = $b_hiring_for, \
             enrolled_by = $enrolled_by"
                .to_string(),
            "CREATE type::record('enrollment', $enrollment_id) SET \
             fair_id = $fair_id, \
             company_id = $company_id, \
             company_name = $e_company_name, \
             method = $e_method, \
             booth_id = $booth_id, \
             enrolled_by = $enrolled_by"
                .to_string(),
        ];
        for i in 0..jobs.len() {
            statements.push(format!(
                "CREATE type::record('fair_job', $j{i}_id) SET \
                 fair_id = $fair_id, \
                 company_id = $company_id, \
                 source_job_id = $j{i}_source_job_id, \
                 title = $j{i}_title, \
                 description = $j{i}_description, \
                 location = $j{i}_location, \
                 employment_type = $j{i}_employment_type, \
                 apply_url = $j{i}_apply_url"
            ));
        }
        statements.push("COMMIT TRANSACTION".to_string());
        let query = format!("{};", statements.join("; "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("enrollment_id", enrollment_id.to_string()))
            .bind(("fair_id", fair_id_str))
            .bind(("company_id", company_id_str.clone()))
            .bind(("booth_id", booth.id.to_string()))
            .bind(("enrolled_by", enrollment.enrolled_by.to_string()))
            .bind(("e_company_name", enrollment.company_name))
            .bind(("e_method", method_to_string(enrollment.method)))
            .bind(("b_company_name", booth.company_name))
            .bind(("b_industry", booth.industry))
            .bind(("b_company_size", booth.company_size))
            .bind(("b_location", booth.location))
            .bind(("b_description", booth.description))
            .bind(("b_logo_url", booth.logo_url))
            .bind(("b_website", booth.website))
            .bind(("b_careers_page", booth.careers_page))
            .bind(("b_contact_name", booth.contact_name))
            .bind(("b_contact_email", booth.contact_email))
            .bind(("b_hiring_for", booth.hiring_for));

        for (i, job) in jobs.into_iter().enumerate() {
            builder = builder
                .bind((format!("j{i}_id"), Uuid::new_v4().to_string()))
                .bind((
                    format!("j{i}_source_job_id"),
                    job.source_job_id.map(|s| s.to_string()),
                ))
                .bind((format!("j{i}_title"), job.title))
                .bind((format!("j{i}_description"), job.description))
                .bind((format!("j{i}_location"), job.location))
                .bind((format!("j{i}_employment_type"), job.employment_type))
                .bind((format!("j{i}_apply_url"), job.apply_url));
        }

        builder
            .await
            .map_err(|e| DbError::from_write(e, "enrollment"))?
            .check()
            .map_err(|e| DbError::from_write(e, "enrollment"))?;

        // Read the committed row back so the caller gets the
        // store-assigned enrollment timestamp.
        self.get(enrollment.fair_id, enrollment.company_id).await
    }

    async fn get(&self, fair_id: Uuid, company_id: Uuid) -> FairgroundResult<Enrollment> {
        let company_id_str = company_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM enrollment \
                 WHERE fair_id = $fair_id AND company_id = $company_id",
            )
            .bind(("fair_id", fair_id.to_string()))
            .bind(("company_id", company_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "enrollment".into(),
            id: format!("fair={fair_id},company={company_id_str}"),
        })?;

        Ok(row.try_into_enrollment()?)
    }

    async fn list_by_fair(&self, fair_id: Uuid) -> FairgroundResult<Vec<Enrollment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM enrollment \
                 WHERE fair_id = $fair_id \
                 ORDER BY enrolled_at ASC",
            )
            .bind(("fair_id", fair_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_enrollment())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_company(&self, company_id: Uuid) -> FairgroundResult<Vec<Enrollment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM enrollment \
                 WHERE company_id = $company_id \
                 ORDER BY enrolled_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_enrollment())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete_cascade(&self, fair_id: Uuid, company_id: Uuid) -> FairgroundResult<()> {
        let fair_id_str = fair_id.to_string();
        let company_id_str = company_id.to_string();
        debug!(
            fair_id = %fair_id_str,
            company_id = %company_id_str,
            "Removing enrollment with booth and job snapshots"
        );

        // Keyed by company rather than booth id, so an enrollment that
        // never had a booth still cleans up without a special case.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE enrollment WHERE fair_id = $fair_id \
                     AND company_id = $company_id; \
                 DELETE fair_booth WHERE fair_id = $fair_id \
                     AND company_id = $company_id; \
                 DELETE fair_job WHERE fair_id = $fair_id \
                     AND company_id = $company_id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("fair_id", fair_id_str))
            .bind(("company_id", company_id_str))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
