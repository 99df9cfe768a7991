//! Store loading operations.

use std::fs;
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::snapshot::{CURRENT_SCHEMA_VERSION, StoreSnapshot};

/// Schema version is checked before the full payload is parsed, so a
/// future format fails with a version error instead of a parse error.
#[derive(serde::Deserialize)]
struct VersionProbe {
    schema_version: u32,
}

/// Load a store snapshot from a .trs file.
pub fn load_store(path: &Path) -> Result<StoreSnapshot> {
    let bytes = fs::read(path).map_err(|e| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_store_bytes(&bytes, path)
}

fn parse_store_bytes(bytes: &[u8], path: &Path) -> Result<StoreSnapshot> {
    let probe: VersionProbe =
        serde_json::from_slice(bytes).map_err(|e| StoreError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if probe.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: probe.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let snapshot: StoreSnapshot =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialization { source: e })?;

    tracing::info!("Loaded template store from {}", path.display());
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::io::save::save_store;

    use super::*;

    #[test]
    fn load_round_trips_a_saved_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.trs");

        let mut snapshot = StoreSnapshot::empty();
        snapshot.next_template_id = 7;
        save_store(&mut snapshot, &path).unwrap();

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded.next_template_id, 7);
        assert_eq!(loaded.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn load_rejects_non_json_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.trs");
        fs::write(&path, b"NOT_A_STORE_FILE").unwrap();

        let result = load_store(&path);
        assert!(matches!(result, Err(StoreError::InvalidFormat { .. })));
    }

    #[test]
    fn load_rejects_future_schema_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.trs");
        fs::write(
            &path,
            br#"{"schema_version": 999, "saved_at": "2026-01-01T00:00:00Z",
                "next_template_id": 1, "next_submission_id": 1, "templates": []}"#,
        )
        .unwrap();

        let result = load_store(&path);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 999, .. })
        ));
    }
}
