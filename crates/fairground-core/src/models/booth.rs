//! Global booth domain model — a company's fair-independent profile.
//!
//! This is the template that gets forked into a fair-scoped copy at
//! enrollment time; it is never shown inside a fair directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booth {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Display name override; falls back to the company record when unset.
    pub company_name: Option<String>,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooth {
    pub company_id: Uuid,
    pub company_name: Option<String>,
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

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBooth {
    pub company_name: Option<Option<String>>,
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
