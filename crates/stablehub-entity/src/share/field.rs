//! Field categories a share link may expose.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A category of horse attributes that an owner can authorize for viewers.
///
/// `BasicInfo` (name, breed, age, color, gender, height) is always exposed
/// whether or not it is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedField {
    /// Identity and morphology.
    BasicInfo,
    /// Free-text description.
    Description,
    /// Sire, dam and ancestry.
    Pedigree,
    /// Vaccination, deworming, farrier and condition notes.
    Health,
    /// Discipline, level and trainer.
    Training,
    /// Competition results.
    Competitions,
    /// Photo gallery.
    Images,
    /// Video gallery.
    Videos,
    /// Asking price.
    Price,
    /// X-ray studies.
    Xrays,
}

impl SharedField {
    /// Every category, in canonical order.
    pub const ALL: [SharedField; 10] = [
        Self::BasicInfo,
        Self::Description,
        Self::Pedigree,
        Self::Health,
        Self::Training,
        Self::Competitions,
        Self::Images,
        Self::Videos,
        Self::Price,
        Self::Xrays,
    ];

    /// Return the wire/database name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::Description => "description",
            Self::Pedigree => "pedigree",
            Self::Health => "health",
            Self::Training => "training",
            Self::Competitions => "competitions",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Price => "price",
            Self::Xrays => "xrays",
        }
    }
}

impl fmt::Display for SharedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or submitted category name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shared field: {0}")]
pub struct UnknownSharedField(pub String);

impl FromStr for SharedField {
    type Err = UnknownSharedField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownSharedField(s.to_string()))
    }
}

/// An ordered, duplicate-free set of shared categories.
///
/// Ordering is canonical so that redacted output is deterministic for a
/// given set regardless of the order the owner selected categories in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedFieldSet(BTreeSet<SharedField>);

impl SharedFieldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether the category is authorized. `BasicInfo` is always authorized.
    pub fn contains(&self, field: SharedField) -> bool {
        field == SharedField::BasicInfo || self.0.contains(&field)
    }

    /// Add a category.
    pub fn insert(&mut self, field: SharedField) {
        self.0.insert(field);
    }

    /// Iterate the explicitly listed categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = SharedField> + '_ {
        self.0.iter().copied()
    }

    /// Number of explicitly listed categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category was explicitly listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names for storage in a `TEXT[]` column.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl FromIterator<SharedField> for SharedFieldSet {
    fn from_iter<I: IntoIterator<Item = SharedField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<String>> for SharedFieldSet {
    type Error = UnknownSharedField;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        names.iter().map(|n| n.parse::<SharedField>()).collect()
    }
}
