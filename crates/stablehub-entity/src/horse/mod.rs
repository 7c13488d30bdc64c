//! Horse domain entities.

pub mod model;

pub use model::{
    Competition, HealthInfo, Horse, MediaItem, Pedigree, PriceInfo, TrainingInfo, Xray, XrayAsset,
};
