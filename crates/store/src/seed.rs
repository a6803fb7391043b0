//! Seed data: the fixed collections the store starts from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use robodepot_fleet::Robot;
use robodepot_inventory::InventoryItem;
use robodepot_tasks::Task;

const BUILTIN_SEED: &str = include_str!("../data/seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Initial contents of the three collections, in display order.
///
/// Shape matches the dashboard's mock data files (camelCase JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub robots: Vec<Robot>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl Seed {
    /// The mock warehouse bundled with the crate.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(BUILTIN_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, SeedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_parses() {
        let seed = Seed::builtin().unwrap();
        assert_eq!(seed.robots.len(), 8);
        assert_eq!(seed.tasks.len(), 8);
        assert_eq!(seed.inventory.len(), 10);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let seed = Seed::from_json(r#"{"robots": []}"#).unwrap();
        assert!(seed.tasks.is_empty());
        assert!(seed.inventory.is_empty());
    }

    #[test]
    fn malformed_records_are_reported() {
        let err = Seed::from_json(
            r#"{"robots":[{"id":"R1","name":"A","status":"asleep","batteryLevel":1,"location":"Z"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Seed::from_path("/definitely/not/here/seed.json").unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/seed.json"));
    }

    #[test]
    fn json_export_reloads_to_same_seed() {
        let seed = Seed::builtin().unwrap();
        let again = Seed::from_json(&seed.to_json_pretty().unwrap()).unwrap();
        assert_eq!(seed, again);
    }
}
