//! On-disk index file handling
//!
//! The index is a single JSON object at the library root mapping decimal
//! id strings to book metadata. File attachments are deliberately not
//! stored here: they are re-derived from the per-book `files/` directories
//! on open, so a second persisted structure can never drift from disk.

use crate::error::{LibraryError, Result};
use ebookshelf_core::{BookDetails, BookId};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const INDEX_FILE_NAME: &str = "index.json";

/// Reads the index file into an id -> details mapping.
pub fn read_index(path: &Path) -> Result<HashMap<BookId, BookDetails>> {
    let contents = fs::read_to_string(path)?;
    let raw: BTreeMap<String, BookDetails> =
        serde_json::from_str(&contents).map_err(|e| LibraryError::MalformedIndex {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut index = HashMap::with_capacity(raw.len());
    for (key, details) in raw {
        let id = BookId::from_string(&key).map_err(|e| LibraryError::MalformedIndex {
            path: path.to_path_buf(),
            reason: format!("invalid book id key {:?}: {}", key, e),
        })?;
        index.insert(id, details);
    }
    Ok(index)
}

/// Serializes the given entries and replaces the index file in full.
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so a crash mid-write cannot leave a truncated index behind.
pub fn write_index(path: &Path, entries: &BTreeMap<String, &BookDetails>) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).map_err(|e| LibraryError::MalformedIndex {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let dir = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "index path has no parent directory",
        )
    })?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(json.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dune() -> BookDetails {
        BookDetails::new("Dune", vec!["Herbert".into()], 1965, vec!["scifi".into()])
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INDEX_FILE_NAME);

        let details = dune();
        let mut entries = BTreeMap::new();
        entries.insert("1".to_string(), &details);
        write_index(&path, &entries).expect("Should write index");

        let loaded = read_index(&path).expect("Should read index");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&BookId::new(1)], details);
    }

    #[test]
    fn test_write_empty_index() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INDEX_FILE_NAME);

        write_index(&path, &BTreeMap::new()).expect("Should write index");

        let contents = fs::read_to_string(&path).expect("Should read file");
        assert_eq!(contents.trim(), "{}");
    }

    #[test]
    fn test_read_invalid_json_is_malformed() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INDEX_FILE_NAME);
        fs::write(&path, "not json at all").expect("Should write file");

        let result = read_index(&path);
        assert!(matches!(result, Err(LibraryError::MalformedIndex { .. })));
    }

    #[test]
    fn test_read_non_numeric_key_is_malformed() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INDEX_FILE_NAME);
        fs::write(
            &path,
            r#"{"abc":{"Title":"T","Authors":[],"Year":2000,"Tags":[]}}"#,
        )
        .expect("Should write file");

        let result = read_index(&path);
        assert!(matches!(result, Err(LibraryError::MalformedIndex { .. })));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = read_index(&dir.path().join(INDEX_FILE_NAME));
        assert!(matches!(result, Err(LibraryError::Io(_))));
    }

    #[test]
    fn test_index_uses_pascal_case_fields() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INDEX_FILE_NAME);

        let details = dune();
        let mut entries = BTreeMap::new();
        entries.insert("1".to_string(), &details);
        write_index(&path, &entries).expect("Should write index");

        let contents = fs::read_to_string(&path).expect("Should read file");
        let value: serde_json::Value =
            serde_json::from_str(&contents).expect("Should parse index");
        assert_eq!(value["1"]["Title"], "Dune");
        assert_eq!(value["1"]["Authors"][0], "Herbert");
        assert_eq!(value["1"]["Year"], 1965);
        assert_eq!(value["1"]["Tags"][0], "scifi");
    }
}
