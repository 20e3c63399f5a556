//! Access control gate — resolves whether a caller is a platform
//! administrator or an authorized member (owner/representative) of a
//! given company.
//!
//! Generic over repository implementations so the gate has no
//! dependency on the database crate.

use fairground_core::error::{FairgroundError, FairgroundResult};
use fairground_core::models::user::UserRole;
use fairground_core::repository::{CompanyRepository, UserRepository};
use uuid::Uuid;

/// An expected check outcome (the caller simply isn't allowed, or a
/// referenced record is gone) as opposed to a store failure that must
/// surface to the caller.
fn is_check_failure(err: &FairgroundError) -> bool {
    matches!(
        err,
        FairgroundError::NotFound { .. } | FairgroundError::AuthorizationDenied { .. }
    )
}

/// Access control gate over the user and company collections.
pub struct AccessGate<U: UserRepository, C: CompanyRepository> {
    users: U,
    companies: C,
}

impl<U: UserRepository, C: CompanyRepository> AccessGate<U, C> {
    pub fn new(users: U, companies: C) -> Self {
        Self { users, companies }
    }

    /// Require the caller to be a platform administrator.
    pub async fn verify_admin(&self, user_id: Uuid) -> FairgroundResult<()> {
        let user = self.users.get_by_id(user_id).await?;
        match user.role {
            UserRole::Administrator => Ok(()),
            UserRole::CompanyOwner | UserRole::Representative | UserRole::Student => {
                Err(FairgroundError::AuthorizationDenied {
                    reason: "administrator role required".into(),
                })
            }
        }
    }

    /// Require the caller to be the company's owner or one of its
    /// representatives.
    pub async fn verify_company_access(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> FairgroundResult<()> {
        let company = self.companies.get_by_id(company_id).await?;
        if company.is_member(user_id) {
            Ok(())
        } else {
            Err(FairgroundError::AuthorizationDenied {
                reason: "not an owner or representative of this company".into(),
            })
        }
    }

    /// Composite rule used by mutating booth/job/enrollment paths:
    /// allow when the admin check passes OR the company check passes;
    /// deny only when both fail. Both checks always get their turn —
    /// a failed admin check never masks a valid company check — and a
    /// store error from either check propagates as-is.
    pub async fn require_admin_or_company_access(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> FairgroundResult<()> {
        match self.verify_admin(user_id).await {
            Ok(()) => Ok(()),
            Err(err) if is_check_failure(&err) => {
                match self.verify_company_access(user_id, company_id).await {
                    Ok(()) => Ok(()),
                    Err(err) if is_check_failure(&err) => {
                        Err(FairgroundError::AuthorizationDenied {
                            reason: "administrator or company access required".into(),
                        })
                    }
                    Err(other) => Err(other),
                }
            }
            Err(other) => Err(other),
        }
    }

    /// Whether the (possibly anonymous) caller is an administrator.
    /// Used by read paths that soften to a liveness check instead of
    /// denying outright.
    pub async fn is_admin(&self, user_id: Option<Uuid>) -> FairgroundResult<bool> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };
        match self.verify_admin(user_id).await {
            Ok(()) => Ok(true),
            Err(err) if is_check_failure(&err) => Ok(false),
            Err(other) => Err(other),
        }
    }
}
