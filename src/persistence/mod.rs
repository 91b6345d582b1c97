//! Save/load persistence for JSON documents
//!
//! Features:
//! - Pretty-printed JSON envelope
//! - Atomic replace (tmp → target rename)
//! - Parent directory creation on first save

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistError;

/// Read and decode a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Encode and write a JSON document, replacing any previous file atomically
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("robolearn-persist-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_write_then_read() {
        let path = scratch("nested/doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("score".to_string(), 420u64);

        write_json(&path, &doc).unwrap();
        let back: BTreeMap<String, u64> = read_json(&path).unwrap();
        assert_eq!(back, doc);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_json::<BTreeMap<String, u64>>(&scratch("absent.json")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_garbage_is_json_error() {
        let path = scratch("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = read_json::<BTreeMap<String, u64>>(&path).unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
        assert!(!err.is_missing());
    }
}
