//! Enrollment domain models — the record that a company participates
//! in a fair, plus the fair-scoped booth/job snapshots forked at
//! enrollment time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an enrollment came to exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnrollmentMethod {
    /// Enrolled by an administrator, or by a company member without an
    /// invite code.
    Admin,
    /// Self-enrolled through the fair's invite code.
    InviteCode,
    /// Imported from a previous system. Stored data only; no operation
    /// here produces it.
    Migration,
}

/// At most one per `(fair_id, company_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub fair_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub method: EnrollmentMethod,
    /// The fair-scoped booth created alongside this enrollment.
    pub booth_id: Option<Uuid>,
    pub enrolled_at: DateTime<Utc>,
    pub enrolled_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollment {
    pub fair_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub method: EnrollmentMethod,
    pub booth_id: Option<Uuid>,
    pub enrolled_by: Uuid,
}

/// Fair-scoped booth: a point-in-time copy of the company's profile,
/// forked once at enrollment. Edits to this copy never propagate back
/// to the global booth or to other fairs' copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairBooth {
    pub id: Uuid,
    pub fair_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub careers_page: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub hiring_for: Vec<String>,
    pub enrolled_at: DateTime<Utc>,
    pub enrolled_by: Uuid,
    /// Set on the first post-enrollment edit of the copy.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFairBooth {
    pub id: Uuid,
    pub fair_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub careers_page: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub hiring_for: Vec<String>,
    pub enrolled_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateFairBooth {
    pub company_name: Option<String>,
    pub industry: Option<Option<String>>,
    pub company_size: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub careers_page: Option<Option<String>>,
    pub contact_name: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub hiring_for: Option<Vec<String>>,
}

/// Fair-scoped job: a copy of a global job made at enrollment time,
/// with an independent lifecycle afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairJob {
    pub id: Uuid,
    pub fair_id: Uuid,
    pub company_id: Uuid,
    /// The global job this copy was taken from.
    pub source_job_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub apply_url: Option<String>,
    pub copied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFairJob {
    pub fair_id: Uuid,
    pub company_id: Uuid,
    pub source_job_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub apply_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateFairJob {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub employment_type: Option<Option<String>>,
    pub apply_url: Option<Option<String>>,
}
