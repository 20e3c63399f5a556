//! Fair lifecycle management — fair CRUD, invite-code rotation, the
//! manual live toggle, and the liveness-gated fair-scoped booth/job
//! surface.

use chrono::{DateTime, Utc};
use fairground_core::error::{FairgroundError, FairgroundResult};
use fairground_core::models::enrollment::{
    CreateFairJob, FairBooth, FairJob, UpdateFairBooth, UpdateFairJob,
};
use fairground_core::models::fair::{CreateFair, Fair, UpdateFair};
use fairground_core::repository::{
    CompanyRepository, FairBoothRepository, FairJobRepository, FairRepository, PaginatedResult,
    Pagination, UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::AccessGate;
use crate::invite::generate_invite_code;
use crate::status::{FairStatus, evaluate};

/// How many invite codes to try before giving up on a UNIQUE-index
/// collision. At 36^8 possibilities a second collision in a row
/// already means something is wrong with the store.
const INVITE_CODE_ATTEMPTS: usize = 3;

/// Input for fair creation. The invite code is generated here, never
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct CreateFairRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Partial fair update. Invite codes rotate through
/// [`FairService::refresh_invite_code`] only.
#[derive(Debug, Clone, Default)]
pub struct UpdateFairRequest {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub is_live: Option<bool>,
    pub start_time: Option<Option<DateTime<Utc>>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
}

/// Input for adding a job directly to a fair (post-enrollment).
#[derive(Debug, Clone)]
pub struct NewFairJob {
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub apply_url: Option<String>,
}

/// Fair lifecycle service.
///
/// Generic over repository implementations so the service layer has
/// no dependency on the database crate.
pub struct FairService<U, C, F, FB, FJ>
where
    U: UserRepository + Clone,
    C: CompanyRepository + Clone,
    F: FairRepository,
    FB: FairBoothRepository,
    FJ: FairJobRepository,
{
    gate: AccessGate<U, C>,
    fairs: F,
    fair_booths: FB,
    fair_jobs: FJ,
}

impl<U, C, F, FB, FJ> FairService<U, C, F, FB, FJ>
where
    U: UserRepository + Clone,
    C: CompanyRepository + Clone,
    F: FairRepository,
    FB: FairBoothRepository,
    FJ: FairJobRepository,
{
    pub fn new(users: U, companies: C, fairs: F, fair_booths: FB, fair_jobs: FJ) -> Self {
        Self {
            gate: AccessGate::new(users, companies),
            fairs,
            fair_booths,
            fair_jobs,
        }
    }

    // -------------------------------------------------------------------
    // Fair CRUD
    // -------------------------------------------------------------------

    /// Create a fair (administrators only). Generates the invite code,
    /// retrying when the store rejects a collision.
    pub async fn create_fair(
        &self,
        request: CreateFairRequest,
        requested_by: Uuid,
    ) -> FairgroundResult<Fair> {
        self.gate.verify_admin(requested_by).await?;

        if request.name.trim().is_empty() {
            return Err(FairgroundError::Validation {
                message: "fair name must not be empty".into(),
            });
        }
        validate_schedule(request.start_time, request.end_time)?;

        let mut last_err = None;
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let input = CreateFair {
                name: request.name.clone(),
                description: request.description.clone(),
                start_time: request.start_time,
                end_time: request.end_time,
                invite_code: generate_invite_code(),
                created_by: requested_by,
            };
            match self.fairs.create(input).await {
                Ok(fair) => {
                    info!(fair_id = %fair.id, name = %fair.name, "Fair created");
                    return Ok(fair);
                }
                Err(err @ FairgroundError::AlreadyExists { .. }) => {
                    warn!("Invite code collision on fair creation, regenerating");
                    last_err = Some(err);
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err
            .unwrap_or_else(|| FairgroundError::Internal("invite code generation failed".into())))
    }

    /// Public fair read.
    pub async fn get_fair(&self, fair_id: Uuid) -> FairgroundResult<Fair> {
        self.fairs.get_by_id(fair_id).await
    }

    /// Public fair listing.
    pub async fn list_fairs(
        &self,
        pagination: Pagination,
    ) -> FairgroundResult<PaginatedResult<Fair>> {
        self.fairs.list(pagination).await
    }

    /// Update a fair's mutable fields (administrators only).
    pub async fn update_fair(
        &self,
        fair_id: Uuid,
        request: UpdateFairRequest,
        requested_by: Uuid,
    ) -> FairgroundResult<Fair> {
        self.gate.verify_admin(requested_by).await?;

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(FairgroundError::Validation {
                    message: "fair name must not be empty".into(),
                });
            }
        }
        if let (Some(Some(start)), Some(Some(end))) = (request.start_time, request.end_time) {
            validate_schedule(Some(start), Some(end))?;
        }

        self.fairs
            .update(
                fair_id,
                UpdateFair {
                    name: request.name,
                    description: request.description,
                    is_live: request.is_live,
                    start_time: request.start_time,
                    end_time: request.end_time,
                    invite_code: None,
                },
                requested_by,
            )
            .await
    }

    /// Delete a fair and everything enrolled under it
    /// (administrators only).
    pub async fn delete_fair(&self, fair_id: Uuid, requested_by: Uuid) -> FairgroundResult<()> {
        self.gate.verify_admin(requested_by).await?;
        // 404 for a fair that never existed, before the sweep.
        let fair = self.fairs.get_by_id(fair_id).await?;

        self.fairs.delete_cascade(fair_id).await?;
        info!(fair_id = %fair_id, name = %fair.name, "Fair deleted with all fair-scoped data");
        Ok(())
    }

    /// Flip the manual live flag, independent of any schedule
    /// (administrators only).
    pub async fn toggle_live(&self, fair_id: Uuid, requested_by: Uuid) -> FairgroundResult<Fair> {
        self.gate.verify_admin(requested_by).await?;
        let fair = self.fairs.get_by_id(fair_id).await?;

        let updated = self
            .fairs
            .update(
                fair_id,
                UpdateFair {
                    is_live: Some(!fair.is_live),
                    ..Default::default()
                },
                requested_by,
            )
            .await?;

        info!(fair_id = %fair_id, is_live = updated.is_live, "Fair live flag toggled");
        Ok(updated)
    }

    /// Rotate the fair's invite code (administrators only). The old
    /// code stops resolving as soon as the update commits.
    pub async fn refresh_invite_code(
        &self,
        fair_id: Uuid,
        requested_by: Uuid,
    ) -> FairgroundResult<Fair> {
        self.gate.verify_admin(requested_by).await?;

        let mut last_err = None;
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let update = UpdateFair {
                invite_code: Some(generate_invite_code()),
                ..Default::default()
            };
            match self.fairs.update(fair_id, update, requested_by).await {
                Ok(fair) => {
                    info!(fair_id = %fair_id, "Fair invite code rotated");
                    return Ok(fair);
                }
                Err(err @ FairgroundError::AlreadyExists { .. }) => {
                    warn!("Invite code collision on rotation, regenerating");
                    last_err = Some(err);
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err
            .unwrap_or_else(|| FairgroundError::Internal("invite code generation failed".into())))
    }

    /// Public liveness status for a fair.
    pub async fn status(&self, fair_id: Uuid) -> FairgroundResult<FairStatus> {
        let fair = self.fairs.get_by_id(fair_id).await?;
        Ok(evaluate(&fair, Utc::now()))
    }

    // -------------------------------------------------------------------
    // Fair-scoped booths
    // -------------------------------------------------------------------

    /// List a fair's booths. Administrators always see them;
    /// everyone else only while the fair is live.
    pub async fn list_booths(
        &self,
        fair_id: Uuid,
        caller: Option<Uuid>,
    ) -> FairgroundResult<Vec<FairBooth>> {
        self.ensure_fair_visible(fair_id, caller).await?;
        self.fair_booths.list_by_fair(fair_id).await
    }

    /// Read a single fair-scoped booth, liveness-gated like the listing.
    pub async fn get_booth(
        &self,
        fair_id: Uuid,
        booth_id: Uuid,
        caller: Option<Uuid>,
    ) -> FairgroundResult<FairBooth> {
        self.ensure_fair_visible(fair_id, caller).await?;
        self.fair_booths.get_by_id(fair_id, booth_id).await
    }

    /// Edit a fair-scoped booth copy. Admin or member of the booth's
    /// company. Never touches the global booth or other fairs' copies.
    pub async fn update_booth(
        &self,
        fair_id: Uuid,
        booth_id: Uuid,
        input: UpdateFairBooth,
        requested_by: Uuid,
    ) -> FairgroundResult<FairBooth> {
        let booth = self.fair_booths.get_by_id(fair_id, booth_id).await?;
        self.gate
            .require_admin_or_company_access(requested_by, booth.company_id)
            .await?;

        self.fair_booths.update(fair_id, booth_id, input).await
    }

    // -------------------------------------------------------------------
    // Fair-scoped jobs
    // -------------------------------------------------------------------

    /// List a fair's jobs, liveness-gated like the booth listing.
    pub async fn list_jobs(
        &self,
        fair_id: Uuid,
        caller: Option<Uuid>,
    ) -> FairgroundResult<Vec<FairJob>> {
        self.ensure_fair_visible(fair_id, caller).await?;
        self.fair_jobs.list_by_fair(fair_id).await
    }

    /// Read a single fair-scoped job, liveness-gated.
    pub async fn get_job(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
        caller: Option<Uuid>,
    ) -> FairgroundResult<FairJob> {
        self.ensure_fair_visible(fair_id, caller).await?;
        self.fair_jobs.get_by_id(fair_id, job_id).await
    }

    /// Add a job directly to a fair after enrollment. Admin or member
    /// of the posting company.
    pub async fn create_job(
        &self,
        fair_id: Uuid,
        request: NewFairJob,
        requested_by: Uuid,
    ) -> FairgroundResult<FairJob> {
        self.fairs.get_by_id(fair_id).await?;
        self.gate
            .require_admin_or_company_access(requested_by, request.company_id)
            .await?;

        self.fair_jobs
            .create(CreateFairJob {
                fair_id,
                company_id: request.company_id,
                // Added by hand, not copied from a global posting.
                source_job_id: None,
                title: request.title,
                description: request.description,
                location: request.location,
                employment_type: request.employment_type,
                apply_url: request.apply_url,
            })
            .await
    }

    /// Edit a fair-scoped job. Admin or member of the posting company.
    pub async fn update_job(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
        input: UpdateFairJob,
        requested_by: Uuid,
    ) -> FairgroundResult<FairJob> {
        let job = self.fair_jobs.get_by_id(fair_id, job_id).await?;
        self.gate
            .require_admin_or_company_access(requested_by, job.company_id)
            .await?;

        self.fair_jobs.update(fair_id, job_id, input).await
    }

    /// Remove a fair-scoped job. Admin or member of the posting company.
    pub async fn delete_job(
        &self,
        fair_id: Uuid,
        job_id: Uuid,
        requested_by: Uuid,
    ) -> FairgroundResult<()> {
        let job = self.fair_jobs.get_by_id(fair_id, job_id).await?;
        self.gate
            .require_admin_or_company_access(requested_by, job.company_id)
            .await?;

        self.fair_jobs.delete(fair_id, job_id).await
    }

    /// Load the fair and apply the visibility gate: administrators
    /// bypass liveness entirely, everyone else (including anonymous
    /// callers) only gets through while the fair is live.
    async fn ensure_fair_visible(
        &self,
        fair_id: Uuid,
        caller: Option<Uuid>,
    ) -> FairgroundResult<Fair> {
        let fair = self.fairs.get_by_id(fair_id).await?;

        if self.gate.is_admin(caller).await? {
            return Ok(fair);
        }

        let status = evaluate(&fair, Utc::now());
        if status.is_live {
            Ok(fair)
        } else {
            Err(FairgroundError::AuthorizationDenied {
                reason: "fair is not live".into(),
            })
        }
    }
}

fn validate_schedule(
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
) -> FairgroundResult<()> {
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start > end {
            return Err(FairgroundError::Validation {
                message: "start time must not be after end time".into(),
            });
        }
    }
    Ok(())
}
