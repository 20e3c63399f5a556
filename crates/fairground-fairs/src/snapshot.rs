//! Company snapshot builder.
//!
//! Projects a company's canonical record plus its optional global
//! booth into the flat structure that gets forked into a fair at
//! enrollment time. Booth fields win over company fields; the company
//! record is the fallback for the display name. Pure read — nothing
//! is written here.

use fairground_core::error::{FairgroundError, FairgroundResult};
use fairground_core::repository::{BoothRepository, CompanyRepository};
use tracing::warn;
use uuid::Uuid;

/// Point-in-time projection of a company's profile. Every optional
/// field is carried explicitly so the fair-scoped copy always has a
/// value for every column.
#[derive(Debug, Clone)]
pub struct CompanySnapshot {
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
}

/// Build the snapshot for a company.
///
/// Fails with NotFound when the company itself is absent. A
/// `booth_id` pointing at a missing booth is tolerated: the snapshot
/// falls back to company-only fields.
pub async fn build_company_snapshot<C, B>(
    companies: &C,
    booths: &B,
    company_id: Uuid,
) -> FairgroundResult<CompanySnapshot>
where
    C: CompanyRepository,
    B: BoothRepository,
{
    let company = companies.get_by_id(company_id).await?;

    let booth = match company.booth_id {
        Some(booth_id) => match booths.get_by_id(booth_id).await {
            Ok(booth) => Some(booth),
            Err(FairgroundError::NotFound { .. }) => {
                warn!(
                    company_id = %company_id,
                    booth_id = %booth_id,
                    "Company references a missing booth; snapshotting company fields only"
                );
                None
            }
            Err(other) => return Err(other),
        },
        None => None,
    };

    let mut snapshot = CompanySnapshot {
        company_id,
        company_name: company.company_name,
        industry: None,
        company_size: None,
        location: None,
        description: None,
        logo_url: None,
        website: None,
        careers_page: None,
        contact_name: None,
        contact_email: None,
        hiring_for: Vec::new(),
    };

    if let Some(booth) = booth {
        if let Some(name) = booth.company_name {
            snapshot.company_name = name;
        }
        snapshot.industry = booth.industry;
        snapshot.company_size = booth.company_size;
        snapshot.location = booth.location;
        snapshot.description = booth.description;
        snapshot.logo_url = booth.logo_url;
        snapshot.website = booth.website;
        snapshot.careers_page = booth.careers_page;
        snapshot.contact_name = booth.contact_name;
        snapshot.contact_email = booth.contact_email;
        snapshot.hiring_for = booth.hiring_for;
    }

    Ok(snapshot)
}
