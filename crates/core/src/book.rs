//! Book and book-metadata domain models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

/// Unique identifier for a book within a library.
///
/// Identifiers are assigned by the library engine, start at 1, and are
/// strictly increasing for the lifetime of a library directory. They are
/// never reused, even when an add operation fails partway through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    /// Wraps a raw identifier value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parses a BookId from its decimal string form, the key format used
    /// by the on-disk index file.
    pub fn from_string(s: &str) -> Result<Self, ParseIntError> {
        Ok(Self(s.parse()?))
    }

    /// Returns the identifier as a decimal string.
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }

    /// Returns the raw identifier value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive metadata for a book, excluding its identifier and files.
///
/// Two BookDetails are equal iff title, year, and the author and tag
/// sequences (order-sensitive) are equal. Field names serialize in
/// PascalCase to match the index file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookDetails {
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    pub tags: Vec<String>,
}

impl BookDetails {
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        year: i32,
        tags: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            year,
            tags,
        }
    }
}

/// A single catalogued library entry.
///
/// A Book owns its BookDetails by composition and carries a mapping from
/// attachment name to the path of that attachment relative to the library
/// base directory. The identifier is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub details: BookDetails,
    /// Attached files, keyed by file name. Values are paths relative to
    /// the library base directory.
    pub files: HashMap<String, PathBuf>,
    /// Optional cover image path.
    pub cover_image: Option<PathBuf>,
}

impl Book {
    /// Creates a book with no attachments.
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            details,
            files: HashMap::new(),
            cover_image: None,
        }
    }

    /// Returns the relative path of a named attachment, if present.
    pub fn file_path(&self, name: &str) -> Option<&Path> {
        self.files.get(name).map(PathBuf::as_path)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(title: &str) -> BookDetails {
        BookDetails::new(title, vec!["mr writer".into()], 2016, vec!["fiction".into()])
    }

    #[test]
    fn test_book_id_display_and_parse() {
        let id = BookId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(BookId::from_string("42").unwrap(), id);
    }

    #[test]
    fn test_book_id_parse_rejects_garbage() {
        assert!(BookId::from_string("not-a-number").is_err());
        assert!(BookId::from_string("-1").is_err());
    }

    #[test]
    fn test_book_id_ordering() {
        assert!(BookId::new(1) < BookId::new(2));
    }

    #[test]
    fn test_details_equality() {
        assert_eq!(details("Book1"), details("Book1"));
        assert_ne!(details("Book1"), details("Book2"));
    }

    #[test]
    fn test_details_equality_is_order_sensitive() {
        let a = BookDetails::new("T", vec!["x".into(), "y".into()], 2000, vec![]);
        let b = BookDetails::new("T", vec!["y".into(), "x".into()], 2000, vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_details_serialize_pascal_case() {
        let d = BookDetails::new("Dune", vec!["Herbert".into()], 1965, vec!["scifi".into()]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Title": "Dune",
                "Authors": ["Herbert"],
                "Year": 1965,
                "Tags": ["scifi"],
            })
        );
    }

    #[test]
    fn test_new_book_has_no_files() {
        let book = Book::new(BookId::new(1), details("Book1"));
        assert!(book.files.is_empty());
        assert!(book.cover_image.is_none());
        assert!(!book.has_file("anything.pdf"));
    }
}
