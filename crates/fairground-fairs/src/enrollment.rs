//! Enrollment orchestration — enroll, leave, remove, and the
//! cross-fair enrollment listings.
//!
//! Per `(fair, company)` pair the state machine is simply
//! Unenrolled → Enrolled → Unenrolled. Enrolling forks the company's
//! booth profile and job postings into the fair's scope in one
//! transaction; unenrolling sweeps all of it away in one transaction.

use fairground_core::error::{FairgroundError, FairgroundResult};
use fairground_core::models::enrollment::{
    CreateEnrollment, CreateFairBooth, CreateFairJob, Enrollment, EnrollmentMethod,
};
use fairground_core::models::fair::Fair;
use fairground_core::repository::{
    BoothRepository, CompanyRepository, EnrollmentRepository, FairRepository, JobRepository,
    UserRepository,
};
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::AccessGate;
use crate::snapshot::build_company_snapshot;

/// Input for the enroll flow.
#[derive(Debug, Clone)]
pub struct EnrollInput {
    /// Target fair. Ignored when `invite_code` is given.
    pub fair_id: Option<Uuid>,
    /// Self-enrollment invite code; resolves the fair when present.
    pub invite_code: Option<String>,
    /// Target company. Defaults to the caller's own company.
    pub company_id: Option<Uuid>,
    pub requested_by: Uuid,
}

/// Successful enroll result.
#[derive(Debug, Clone)]
pub struct EnrollOutput {
    pub fair_id: Uuid,
    /// The freshly created fair-scoped booth.
    pub booth_id: Uuid,
}

/// A fair a company is enrolled in, paired with the enrollment record.
#[derive(Debug, Clone)]
pub struct EnrolledFair {
    pub fair: Fair,
    pub enrollment: Enrollment,
}

/// Enrollment orchestration service.
///
/// Generic over repository implementations so the orchestration layer
/// has no dependency on the database crate.
pub struct EnrollmentService<U, C, B, J, F, E>
where
    U: UserRepository + Clone,
    C: CompanyRepository + Clone,
    B: BoothRepository,
    J: JobRepository,
    F: FairRepository,
    E: EnrollmentRepository,
{
    gate: AccessGate<U, C>,
    users: U,
    companies: C,
    booths: B,
    jobs: J,
    fairs: F,
    enrollments: E,
}

impl<U, C, B, J, F, E> EnrollmentService<U, C, B, J, F, E>
where
    U: UserRepository + Clone,
    C: CompanyRepository + Clone,
    B: BoothRepository,
    J: JobRepository,
    F: FairRepository,
    E: EnrollmentRepository,
{
    pub fn new(users: U, companies: C, booths: B, jobs: J, fairs: F, enrollments: E) -> Self {
        Self {
            gate: AccessGate::new(users.clone(), companies.clone()),
            users,
            companies,
            booths,
            jobs,
            fairs,
            enrollments,
        }
    }

    /// Enroll a company into a fair.
    pub async fn enroll(&self, input: EnrollInput) -> FairgroundResult<EnrollOutput> {
        // 1. Resolve the target fair — invite code wins over a fair id.
        let (fair, via_invite_code) = match &input.invite_code {
            Some(code) => {
                let fair = self
                    .fairs
                    .get_by_invite_code(code)
                    .await
                    .map_err(|err| match err {
                        FairgroundError::NotFound { .. } => FairgroundError::Validation {
                            message: "Invalid invite code".into(),
                        },
                        other => other,
                    })?;
                (fair, true)
            }
            None => {
                let fair_id = input.fair_id.ok_or_else(|| FairgroundError::Validation {
                    message: "fair id or invite code required".into(),
                })?;
                (self.fairs.get_by_id(fair_id).await?, false)
            }
        };

        // 2. Resolve the target company — explicit, or the caller's own.
        let company_id = match input.company_id {
            Some(company_id) => company_id,
            None => {
                let caller = self.users.get_by_id(input.requested_by).await?;
                caller.company_id.ok_or_else(|| FairgroundError::Validation {
                    message: "no company associated with this account".into(),
                })?
            }
        };

        // 3. Authorize before touching anything.
        self.gate
            .require_admin_or_company_access(input.requested_by, company_id)
            .await?;

        // 4. One enrollment per (fair, company). The UNIQUE index
        //    backstops this check under concurrent enrolls.
        match self.enrollments.get(fair.id, company_id).await {
            Ok(_) => {
                return Err(FairgroundError::AlreadyExists {
                    entity: "enrollment".into(),
                });
            }
            Err(FairgroundError::NotFound { .. }) => {}
            Err(other) => return Err(other),
        }

        // 5. Snapshot the company profile and its job postings.
        let snapshot = build_company_snapshot(&self.companies, &self.booths, company_id).await?;
        let source_jobs = self.jobs.list_by_company(company_id).await?;

        let booth_id = Uuid::new_v4();
        let booth = CreateFairBooth {
            id: booth_id,
            fair_id: fair.id,
            company_id,
            company_name: snapshot.company_name.clone(),
            industry: snapshot.industry,
            company_size: snapshot.company_size,
            location: snapshot.location,
            description: snapshot.description,
            logo_url: snapshot.logo_url,
            website: snapshot.website,
            careers_page: snapshot.careers_page,
            contact_name: snapshot.contact_name,
            contact_email: snapshot.contact_email,
            hiring_for: snapshot.hiring_for,
            enrolled_by: input.requested_by,
        };

        let method = if via_invite_code {
            EnrollmentMethod::InviteCode
        } else {
            EnrollmentMethod::Admin
        };
        let enrollment = CreateEnrollment {
            fair_id: fair.id,
            company_id,
            company_name: snapshot.company_name,
            method,
            booth_id: Some(booth_id),
            enrolled_by: input.requested_by,
        };

        let job_copies: Vec<CreateFairJob> = source_jobs
            .into_iter()
            .map(|job| CreateFairJob {
                fair_id: fair.id,
                company_id,
                source_job_id: Some(job.id),
                title: job.title,
                description: job.description,
                location: job.location,
                employment_type: job.employment_type,
                apply_url: job.apply_url,
            })
            .collect();
        let job_count = job_copies.len();

        // 6. Booth, enrollment, and job copies commit together.
        self.enrollments
            .enroll_with_snapshot(enrollment, booth, job_copies)
            .await?;

        info!(
            fair_id = %fair.id,
            company_id = %company_id,
            booth_id = %booth_id,
            jobs = job_count,
            invite_code = via_invite_code,
            "Company enrolled in fair"
        );

        Ok(EnrollOutput {
            fair_id: fair.id,
            booth_id,
        })
    }

    /// Self-service "leave fair": the caller's own company is
    /// unenrolled from the fair.
    pub async fn leave(&self, fair_id: Uuid, requested_by: Uuid) -> FairgroundResult<()> {
        let caller = self.users.get_by_id(requested_by).await?;
        let company_id = caller
            .company_id
            .ok_or_else(|| FairgroundError::Validation {
                message: "no company associated with this account".into(),
            })?;

        self.gate
            .verify_company_access(requested_by, company_id)
            .await?;

        self.unenroll(fair_id, company_id).await
    }

    /// Admin-initiated removal of a company's enrollment.
    pub async fn remove(
        &self,
        fair_id: Uuid,
        company_id: Uuid,
        requested_by: Uuid,
    ) -> FairgroundResult<()> {
        self.gate.verify_admin(requested_by).await?;
        self.unenroll(fair_id, company_id).await
    }

    /// Shared unenroll path: load the enrollment (404 when absent),
    /// then cascade-delete it with its booth and job copies.
    async fn unenroll(&self, fair_id: Uuid, company_id: Uuid) -> FairgroundResult<()> {
        let enrollment = self.enrollments.get(fair_id, company_id).await?;

        self.enrollments.delete_cascade(fair_id, company_id).await?;

        info!(
            fair_id = %fair_id,
            company_id = %company_id,
            booth_id = ?enrollment.booth_id,
            "Company unenrolled from fair"
        );

        Ok(())
    }

    /// Admin-only listing of a fair's enrollments.
    pub async fn list_for_fair(
        &self,
        fair_id: Uuid,
        requested_by: Uuid,
    ) -> FairgroundResult<Vec<Enrollment>> {
        self.gate.verify_admin(requested_by).await?;
        // Resolve the fair first so a bogus id reads as 404, not an
        // empty list.
        self.fairs.get_by_id(fair_id).await?;
        self.enrollments.list_by_fair(fair_id).await
    }

    /// Which fairs is this company enrolled in? Admin or company
    /// members only. The per-fair loads are independent and run
    /// concurrently; enrollments pointing at a deleted fair are
    /// skipped.
    pub async fn fairs_for_company(
        &self,
        company_id: Uuid,
        requested_by: Uuid,
    ) -> FairgroundResult<Vec<EnrolledFair>> {
        self.gate
            .require_admin_or_company_access(requested_by, company_id)
            .await?;

        let enrollments = self.enrollments.list_by_company(company_id).await?;

        let fair_loads = join_all(
            enrollments
                .iter()
                .map(|enrollment| self.fairs.get_by_id(enrollment.fair_id)),
        )
        .await;

        let mut result = Vec::with_capacity(enrollments.len());
        for (enrollment, load) in enrollments.into_iter().zip(fair_loads) {
            match load {
                Ok(fair) => result.push(EnrolledFair { fair, enrollment }),
                Err(FairgroundError::NotFound { .. }) => {
                    warn!(
                        fair_id = %enrollment.fair_id,
                        company_id = %company_id,
                        "Skipping enrollment whose fair no longer exists"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        Ok(result)
    }
}
