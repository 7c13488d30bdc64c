//! Horse entity model and its attribute groups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A horse record owned by an organization.
///
/// Identity and morphology fields are always visible to share-link viewers;
/// every other group is exposed only when the link authorizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    /// Unique horse identifier.
    pub id: Uuid,
    /// The owning organization.
    pub organization_id: Uuid,
    /// Registered or stable name.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Age in years.
    pub age: Option<i32>,
    /// Coat color.
    pub color: Option<String>,
    /// Gender (mare, gelding, stallion).
    pub gender: Option<String>,
    /// Height at the withers, in centimetres.
    pub height: Option<f64>,
    /// Free-text description.
    pub description: Option<String>,
    /// Ancestry.
    pub pedigree: Pedigree,
    /// Veterinary and care record.
    pub health: HealthInfo,
    /// Training status.
    pub training: TrainingInfo,
    /// Competition results, most recent first.
    pub competitions: Vec<Competition>,
    /// Photos.
    pub images: Vec<MediaItem>,
    /// Videos.
    pub videos: Vec<MediaItem>,
    /// Asking price, if the horse is for sale.
    pub price: Option<PriceInfo>,
    /// X-ray studies.
    pub xrays: Vec<Xray>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Ancestry of a horse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pedigree {
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub sire_sire: Option<String>,
    pub sire_dam: Option<String>,
    pub dam_sire: Option<String>,
    pub dam_dam: Option<String>,
    pub breeder: Option<String>,
    pub studbook_number: Option<String>,
}

/// Veterinary and care record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthInfo {
    pub last_vaccination: Option<NaiveDate>,
    pub last_deworming: Option<NaiveDate>,
    pub last_farrier: Option<NaiveDate>,
    pub notes: Option<String>,
    pub known_conditions: Vec<String>,
}

/// Training status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingInfo {
    pub discipline: Option<String>,
    pub level: Option<String>,
    pub trainer: Option<String>,
    pub notes: Option<String>,
}

/// A single competition result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Competition {
    pub event: String,
    pub date: NaiveDate,
    pub discipline: Option<String>,
    pub placement: Option<i32>,
    pub score: Option<f64>,
}

/// A photo or video entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MediaItem {
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
}

/// Asking price in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub amount: i64,
    pub currency: String,
    pub negotiable: bool,
}

/// An X-ray study attached to a horse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xray {
    /// Entry identifier.
    pub id: Uuid,
    /// Short title, e.g. "Front left fetlock".
    pub title: String,
    /// Anatomical region.
    pub body_part: Option<String>,
    /// Date the study was taken.
    pub taken_on: Option<NaiveDate>,
    /// Veterinarian notes.
    pub notes: Option<String>,
    /// Where the image lives.
    pub asset: XrayAsset,
}

/// Location of an X-ray image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XrayAsset {
    /// Private object-store path; only ever exposed through a signed URL.
    Upload { path: String },
    /// Publicly reachable URL hosted elsewhere.
    External { url: String },
}

impl Horse {
    /// Object-store paths of every uploaded asset owned by this record.
    pub fn upload_paths(&self) -> Vec<String> {
        self.xrays
            .iter()
            .filter_map(|x| match &x.asset {
                XrayAsset::Upload { path } => Some(path.clone()),
                XrayAsset::External { .. } => None,
            })
            .collect()
    }
}
