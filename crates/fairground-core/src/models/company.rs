//! Company domain model — the canonical employer record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    /// Exactly one owner; representatives may also act for the company.
    pub owner_id: Uuid,
    pub representative_ids: Vec<Uuid>,
    /// The company's single global booth profile, if one has been set up.
    pub booth_id: Option<Uuid>,
    /// Code representatives use to join the company. Independent of fair
    /// invite codes.
    pub invite_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Whether the given user may act on this company's behalf.
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id || self.representative_ids.contains(&user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub company_name: String,
    pub owner_id: Uuid,
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCompany {
    pub company_name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub booth_id: Option<Option<Uuid>>,
    /// Same set/clear/no-change semantics as `booth_id`.
    pub invite_code: Option<Option<String>>,
}
