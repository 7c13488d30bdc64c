//! Horse repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_entity::horse::{
    Competition, HealthInfo, Horse, MediaItem, Pedigree, PriceInfo, TrainingInfo, Xray, XrayAsset,
};

use crate::store::HorseStore;

/// Repository assembling horse records from `horses` and its child tables.
#[derive(Debug, Clone)]
pub struct HorseRepository {
    pool: PgPool,
}

impl HorseRepository {
    /// Create a new horse repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn competitions(&self, horse_id: Uuid) -> AppResult<Vec<Competition>> {
        sqlx::query_as::<_, Competition>(
            "SELECT event, date, discipline, placement, score FROM horse_competitions \
             WHERE horse_id = $1 ORDER BY date DESC, id",
        )
        .bind(horse_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load competitions", e))
    }

    async fn media(&self, horse_id: Uuid) -> AppResult<Vec<MediaRow>> {
        sqlx::query_as::<_, MediaRow>(
            "SELECT kind, url, caption, sort_order FROM horse_media \
             WHERE horse_id = $1 ORDER BY sort_order, id",
        )
        .bind(horse_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load media", e))
    }

    async fn xrays(&self, horse_id: Uuid) -> AppResult<Vec<XrayRow>> {
        sqlx::query_as::<_, XrayRow>(
            "SELECT id, title, body_part, taken_on, notes, asset_kind, asset_location \
             FROM horse_xrays WHERE horse_id = $1 ORDER BY taken_on DESC NULLS LAST, id",
        )
        .bind(horse_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load x-rays", e))
    }
}

#[async_trait]
impl HorseStore for HorseRepository {
    async fn find_in_organization(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
    ) -> AppResult<Option<Horse>> {
        let row = sqlx::query_as::<_, HorseRow>(
            "SELECT * FROM horses WHERE id = $1 AND organization_id = $2",
        )
        .bind(horse_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find horse", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (competitions, media, xrays) = tokio::try_join!(
            self.competitions(horse_id),
            self.media(horse_id),
            self.xrays(horse_id)
        )?;

        let mut images = Vec::new();
        let mut videos = Vec::new();
        for item in media {
            let (kind, item) = item.split();
            match kind.as_str() {
                "image" => images.push(item),
                "video" => videos.push(item),
                other => {
                    return Err(AppError::database(format!("Unknown media kind '{other}'")));
                }
            }
        }

        let xrays = xrays
            .into_iter()
            .map(Xray::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(row.into_horse(competitions, images, videos, xrays)))
    }
}

#[derive(Debug, FromRow)]
struct HorseRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    breed: Option<String>,
    age: Option<i32>,
    color: Option<String>,
    gender: Option<String>,
    height: Option<f64>,
    description: Option<String>,
    pedigree: Json<Pedigree>,
    health: Json<HealthInfo>,
    training: Json<TrainingInfo>,
    price_amount: Option<i64>,
    price_currency: Option<String>,
    price_negotiable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HorseRow {
    fn into_horse(
        self,
        competitions: Vec<Competition>,
        images: Vec<MediaItem>,
        videos: Vec<MediaItem>,
        xrays: Vec<Xray>,
    ) -> Horse {
        let price = match (self.price_amount, self.price_currency) {
            (Some(amount), Some(currency)) => Some(PriceInfo {
                amount,
                currency,
                negotiable: self.price_negotiable,
            }),
            _ => None,
        };

        Horse {
            id: self.id,
            organization_id: self.organization_id,
            name: self.name,
            breed: self.breed,
            age: self.age,
            color: self.color,
            gender: self.gender,
            height: self.height,
            description: self.description,
            pedigree: self.pedigree.0,
            health: self.health.0,
            training: self.training.0,
            competitions,
            images,
            videos,
            price,
            xrays,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MediaRow {
    kind: String,
    url: String,
    caption: Option<String>,
    sort_order: i32,
}

impl MediaRow {
    fn split(self) -> (String, MediaItem) {
        (
            self.kind,
            MediaItem {
                url: self.url,
                caption: self.caption,
                sort_order: self.sort_order,
            },
        )
    }
}

#[derive(Debug, FromRow)]
struct XrayRow {
    id: Uuid,
    title: String,
    body_part: Option<String>,
    taken_on: Option<NaiveDate>,
    notes: Option<String>,
    asset_kind: String,
    asset_location: String,
}

impl TryFrom<XrayRow> for Xray {
    type Error = AppError;

    fn try_from(row: XrayRow) -> Result<Self, Self::Error> {
        let asset = match row.asset_kind.as_str() {
            "upload" => XrayAsset::Upload {
                path: row.asset_location,
            },
            "external" => XrayAsset::External {
                url: row.asset_location,
            },
            other => {
                return Err(AppError::database(format!(
                    "Unknown x-ray asset kind '{other}'"
                )));
            }
        };

        Ok(Xray {
            id: row.id,
            title: row.title,
            body_part: row.body_part,
            taken_on: row.taken_on,
            notes: row.notes,
            asset,
        })
    }
}
