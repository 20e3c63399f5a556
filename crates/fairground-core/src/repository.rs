//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Fair-scoped repositories take
//! the owning `fair_id` so every read and write stays inside one
//! fair's keyspace. Operations that must be atomic across tables
//! (enrollment plus its snapshots, cascade deletes) are single trait
//! methods so implementations can commit them in one transaction.

use uuid::Uuid;

use crate::error::FairgroundResult;
use crate::models::{
    booth::{Booth, CreateBooth, UpdateBooth},
    company::{Company, CreateCompany, UpdateCompany},
    enrollment::{
        CreateEnrollment, CreateFairBooth, CreateFairJob, Enrollment, FairBooth, FairJob,
        UpdateFairBooth, UpdateFairJob,
    },
    fair::{CreateFair, Fair, UpdateFair},
    job::{CreateJob, Job, UpdateJob},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Global collections
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = FairgroundResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FairgroundResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = FairgroundResult<User>> + Send;
}

pub trait CompanyRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCompany,
    ) -> impl Future<Output = FairgroundResult<Company>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FairgroundResult<Company>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCompany,
    ) -> impl Future<Output = FairgroundResult<Company>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FairgroundResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = FairgroundResult<PaginatedResult<Company>>> + Send;

    /// Add a user to the company's representative set (idempotent).
    fn add_representative(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<()>> + Send;

    /// Remove a user from the company's representative set.
    fn remove_representative(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<()>> + Send;
}

pub trait BoothRepository: Send + Sync {
    fn create(&self, input: CreateBooth) -> impl Future<Output = FairgroundResult<Booth>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FairgroundResult<Booth>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateBooth,
    ) -> impl Future<Output = FairgroundResult<Booth>> + Send;
}

pub trait JobRepository: Send + Sync {
    fn create(&self, input: CreateJob) -> impl Future<Output = FairgroundResult<Job>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FairgroundResult<Job>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Vec<Job>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateJob,
    ) -> impl Future<Output = FairgroundResult<Job>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FairgroundResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Fairs
// ---------------------------------------------------------------------------

pub trait FairRepository: Send + Sync {
    fn create(&self, input: CreateFair) -> impl Future<Output = FairgroundResult<Fair>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FairgroundResult<Fair>> + Send;
    /// Invite-code lookup used for self-enrollment. The code column is
    /// UNIQUE-indexed, so at most one fair can match.
    fn get_by_invite_code(
        &self,
        invite_code: &str,
    ) -> impl Future<Output = FairgroundResult<Fair>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateFair,
        updated_by: Uuid,
    ) -> impl Future<Output = FairgroundResult<Fair>> + Send;
    /// Delete the fair and everything under it: fair-scoped booths,
    /// jobs, and enrollments go in the same transaction as the fair
    /// row itself.
    fn delete_cascade(&self, id: Uuid) -> impl Future<Output = FairgroundResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = FairgroundResult<PaginatedResult<Fair>>> + Send;
}

// ---------------------------------------------------------------------------
// Fair-scoped collections
// ---------------------------------------------------------------------------

pub trait EnrollmentRepository: Send + Sync {
    /// Create the enrollment, its fair-scoped booth, and all job
    /// copies in one transaction. The UNIQUE `(fair_id, company_id)`
    /// index rejects a concurrent duplicate.
    fn enroll_with_snapshot(
        &self,
        enrollment: CreateEnrollment,
        booth: CreateFairBooth,
        jobs: Vec<CreateFairJob>,
    ) -> impl Future<Output = FairgroundResult<Enrollment>> + Send;

    fn get(
        &self,
        fair_id: Uuid,
        company_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Enrollment>> + Send;

    fn list_by_fair(
        &self,
        fair_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Vec<Enrollment>>> + Send;

    /// All enrollments for a company across every fair — the
    /// cross-fair lookup backing "which fairs is my company in".
    fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Vec<Enrollment>>> + Send;

    /// Delete the enrollment, the company's fair-scoped booth (if
    /// any), and every fair-scoped job of the company under this fair
    /// in one transaction. Tolerates an enrollment that never had a
    /// booth.
    fn delete_cascade(
        &self,
        fair_id: Uuid,
        company_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<()>> + Send;
}

pub trait FairBoothRepository: Send + Sync {
    fn get_by_id(
        &self,
        fair_id: Uuid,
        booth_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<FairBooth>> + Send;
    fn list_by_fair(
        &self,
        fair_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Vec<FairBooth>>> + Send;
    /// Edit the fair-scoped copy. Never touches the global booth.
    fn update(
        &self,
        fair_id: Uuid,
        booth_id: Uuid,
        input: UpdateFairBooth,
    ) -> impl Future<Output = FairgroundResult<FairBooth>> + Send;
}

pub trait FairJobRepository: Send + Sync {
    fn create(
        &self,
        input: CreateFairJob,
    ) -> impl Future<Output = FairgroundResult<FairJob>> + Send;
    fn get_by_id(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<FairJob>> + Send;
    fn list_by_fair(
        &self,
        fair_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<Vec<FairJob>>> + Send;
    fn update(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
        input: UpdateFairJob,
    ) -> impl Future<Output = FairgroundResult<FairJob>> + Send;
    fn delete(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
    ) -> impl Future<Output = FairgroundResult<()>> + Send;
}
