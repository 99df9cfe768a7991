//! Store saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::snapshot::StoreSnapshot;

/// Save a store snapshot to a .trs file.
///
/// Uses atomic write (temp file + rename) to prevent data corruption
/// on crash or power loss.
pub fn save_store(snapshot: &mut StoreSnapshot, path: &Path) -> Result<()> {
    // Update the last saved timestamp
    snapshot.touch();

    let bytes = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| StoreError::Serialization { source: e })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = path.with_extension("trs.tmp");

    // Create parent directory if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!("Saved template store to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn save_writes_json_with_schema_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.trs");

        let mut snapshot = StoreSnapshot::empty();
        save_store(&mut snapshot, &path).unwrap();

        assert!(path.exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"schema_version\": 1"));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.trs");

        let mut snapshot = StoreSnapshot::empty();
        save_store(&mut snapshot, &path).unwrap();
        assert!(path.exists());
    }
}
