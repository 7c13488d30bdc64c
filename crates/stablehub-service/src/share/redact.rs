//! Field-level redaction of horse records for share-link viewers.
//!
//! A [`RedactedHorse`] starts from the identity and morphology fields and
//! gains one attribute group per authorized [`SharedField`]. Groups that
//! were not authorized are absent from the serialized output, not `null`.

use std::time::Duration;

use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use stablehub_core::traits::BlobStore;
use stablehub_entity::horse::{
    Competition, HealthInfo, Horse, MediaItem, Pedigree, PriceInfo, TrainingInfo, Xray, XrayAsset,
};
use stablehub_entity::share::{SharedField, SharedFieldSet};

/// The viewer-facing projection of a horse record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedactedHorse {
    pub id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    /// Outer `None` means not shared; `Some(None)` means shared but empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedigree: Option<Pedigree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitions: Option<Vec<Competition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<MediaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<MediaItem>>,
    /// Outer `None` means not shared; `Some(None)` means not for sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<PriceInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xrays: Option<Vec<SharedXray>>,
}

/// An X-ray entry as shown to viewers.
///
/// `file_url` is a time-limited signed URL for uploads and the original URL
/// for external assets. It is omitted when signing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedXray {
    pub id: Uuid,
    pub title: String,
    pub body_part: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Builds a [`RedactedHorse`] one authorized category at a time.
#[derive(Debug)]
pub struct RedactionBuilder<'a> {
    horse: &'a Horse,
    out: RedactedHorse,
    with_xrays: bool,
}

impl<'a> RedactionBuilder<'a> {
    /// Start from the always-visible identity and morphology fields.
    pub fn new(horse: &'a Horse) -> Self {
        let out = RedactedHorse {
            id: horse.id,
            name: horse.name.clone(),
            breed: horse.breed.clone(),
            age: horse.age,
            color: horse.color.clone(),
            gender: horse.gender.clone(),
            height: horse.height,
            description: None,
            pedigree: None,
            health: None,
            training: None,
            competitions: None,
            images: None,
            videos: None,
            price: None,
            xrays: None,
        };
        Self {
            horse,
            out,
            with_xrays: false,
        }
    }

    /// Copy one attribute group verbatim.
    pub fn include(mut self, field: SharedField) -> Self {
        let horse = self.horse;
        match field {
            SharedField::BasicInfo => {}
            SharedField::Description => self.out.description = Some(horse.description.clone()),
            SharedField::Pedigree => self.out.pedigree = Some(horse.pedigree.clone()),
            SharedField::Health => self.out.health = Some(horse.health.clone()),
            SharedField::Training => self.out.training = Some(horse.training.clone()),
            SharedField::Competitions => self.out.competitions = Some(horse.competitions.clone()),
            SharedField::Images => self.out.images = Some(horse.images.clone()),
            SharedField::Videos => self.out.videos = Some(horse.videos.clone()),
            SharedField::Price => self.out.price = Some(horse.price.clone()),
            SharedField::Xrays => self.with_xrays = true,
        }
        self
    }

    /// Include every category in `fields`.
    pub fn include_all(self, fields: &SharedFieldSet) -> Self {
        fields.iter().fold(self, |builder, field| builder.include(field))
    }

    /// Finish the projection, converting X-ray uploads to signed URLs valid
    /// for `ttl`. A failed signature drops only that entry's URL.
    pub async fn finish(mut self, blobs: &dyn BlobStore, ttl: Duration) -> RedactedHorse {
        if self.with_xrays {
            let horse_id = self.horse.id;
            let xrays = join_all(
                self.horse
                    .xrays
                    .iter()
                    .map(|xray| share_xray(horse_id, xray, blobs, ttl)),
            )
            .await;
            self.out.xrays = Some(xrays);
        }
        self.out
    }
}

async fn share_xray(
    horse_id: Uuid,
    xray: &Xray,
    blobs: &dyn BlobStore,
    ttl: Duration,
) -> SharedXray {
    let file_url = match &xray.asset {
        XrayAsset::External { url } => Some(url.clone()),
        XrayAsset::Upload { path } => match blobs.create_signed_url(path, ttl).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    horse_id = %horse_id,
                    xray_id = %xray.id,
                    error = %e,
                    "Failed to sign x-ray asset, omitting its URL"
                );
                None
            }
        },
    };

    SharedXray {
        id: xray.id,
        title: xray.title.clone(),
        body_part: xray.body_part.clone(),
        taken_on: xray.taken_on,
        notes: xray.notes.clone(),
        file_url,
    }
}
