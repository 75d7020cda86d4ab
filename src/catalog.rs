//! Collectible value catalog
//!
//! Maps an object's tag to its payout value and retrieval weight. Lookup is an
//! ordered, case-insensitive substring match: the first matching pattern wins.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value reported for tags that match no entry
pub const UNMATCHED: CatalogValue = CatalogValue {
    value: 0,
    weight: 1.0,
};

/// Errors raised while loading catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog entry {index} has an empty pattern")]
    EmptyPattern { index: usize },
    #[error("catalog entry {index} ({pattern}) has non-positive weight {weight}")]
    InvalidWeight {
        index: usize,
        pattern: String,
        weight: f32,
    },
}

/// Result of a catalog lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogValue {
    pub value: u32,
    pub weight: f32,
}

impl CatalogValue {
    /// A value of zero disqualifies a catch
    pub fn is_collectible(&self) -> bool {
        self.value > 0
    }
}

/// One row of the catalog table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub pattern: String,
    pub value: u32,
    pub weight: f32,
}

impl CatalogEntry {
    pub fn new(pattern: impl Into<String>, value: u32, weight: f32) -> Self {
        Self {
            pattern: pattern.into(),
            value,
            weight,
        }
    }
}

/// Ordered pattern table
#[derive(Debug, Clone)]
pub struct ValueCatalog {
    entries: Vec<CatalogEntry>,
    /// Lowercased patterns, parallel to `entries`
    needles: Vec<String>,
}

impl Default for ValueCatalog {
    fn default() -> Self {
        Self::indexed(vec![
            CatalogEntry::new("Stone", 10, 8.0),
            CatalogEntry::new("GoldNugget-1", 100, 9.0),
            CatalogEntry::new("GoldNugget-2", 200, 4.0),
            CatalogEntry::new("GoldNugget-3", 500, 2.0),
            CatalogEntry::new("MoneyBag", 150, 5.0),
        ])
    }
}

impl ValueCatalog {
    /// Build a catalog from ordered entries
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.pattern.trim().is_empty() {
                return Err(CatalogError::EmptyPattern { index });
            }
            if !(entry.weight > 0.0 && entry.weight.is_finite()) {
                return Err(CatalogError::InvalidWeight {
                    index,
                    pattern: entry.pattern.clone(),
                    weight: entry.weight,
                });
            }
        }
        Ok(Self::indexed(entries))
    }

    fn indexed(entries: Vec<CatalogEntry>) -> Self {
        let needles = entries.iter().map(|e| e.pattern.to_lowercase()).collect();
        Self { entries, needles }
    }

    /// Parse a JSON array of `{ "pattern", "value", "weight" }` objects
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Read and parse a JSON catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Resolve a tag to its value and weight
    pub fn lookup(&self, tag: &str) -> CatalogValue {
        let tag = tag.to_lowercase();
        self.needles
            .iter()
            .zip(&self.entries)
            .find(|(needle, _)| tag.contains(needle.as_str()))
            .map(|(_, entry)| CatalogValue {
                value: entry.value,
                weight: entry.weight,
            })
            .unwrap_or(UNMATCHED)
    }
}
