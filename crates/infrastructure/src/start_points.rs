//! Start-point directory loader

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use domain::StartPointDirectory;
use serde::Deserialize;
use tracing::info;

use crate::error::InfrastructureError;

/// One manifest entry: a link and an optional group header
#[derive(Debug, Deserialize)]
pub struct StartPointEntry {
    /// Map or info link
    pub link: String,
    /// Group header; ungrouped entries share a default header
    #[serde(default)]
    pub group: Option<String>,
}

/// Load the grouped start-point directory from its JSON manifest
pub fn load_start_points(path: &Path) -> Result<StartPointDirectory, InfrastructureError> {
    let bytes = fs::read(path).map_err(|e| InfrastructureError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let manifest: BTreeMap<String, StartPointEntry> =
        serde_json::from_slice(&bytes).map_err(|e| InfrastructureError::Serialization {
            path: path.display().to_string(),
            source: e,
        })?;

    let directory = StartPointDirectory::new(
        manifest.into_iter().map(|(name, entry)| (name, entry.link, entry.group)),
    );
    info!(start_points = directory.len(), "Start point directory loaded");
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_grouped_and_ungrouped_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("start_points.json");
        fs::write(
            &path,
            r#"{
                "Fountain": {"link": "https://maps/fountain", "group": "City"},
                "Velodrome": {"link": "https://maps/velo"}
            }"#,
        )
        .unwrap();

        let directory = load_start_points(&path).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get(0).unwrap().name, "Fountain");
        assert_eq!(directory.get(0).unwrap().group, "City");
        assert_eq!(directory.get(1).unwrap().group, "Other");
    }

    #[test]
    fn malformed_manifest_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("start_points.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_start_points(&path),
            Err(InfrastructureError::Serialization { .. })
        ));
    }
}
