//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant: a stable, breeder or dealer that owns horse records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Public contact email.
    pub email: Option<String>,
    /// Public phone number.
    pub phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
}

/// A named contact person published by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrganizationContact {
    /// Contact identifier.
    pub id: Uuid,
    /// The owning organization.
    pub organization_id: Uuid,
    /// Full name.
    pub name: String,
    /// Role within the organization (e.g. "Sales manager").
    pub role: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
}

/// An organization together with its published contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// The organization.
    pub organization: Organization,
    /// Its contacts.
    pub contacts: Vec<OrganizationContact>,
}
