//! File-backed library engine

use crate::error::{LibraryError, Result};
use crate::index;
use ebookshelf_core::{Book, BookDetails, BookId};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// A library where book metadata and attachments are persisted to the
/// local file system.
///
/// On-disk layout, rooted at the base directory:
///
/// ```text
/// <base>/index.json          id (decimal string) -> BookDetails
/// <base>/<id>/files/<name>   raw attachment content
/// ```
///
/// The engine holds the whole index in memory and rewrites the index file
/// in full after every successful add. It performs no internal locking;
/// callers handling concurrent requests must serialize mutating operations
/// behind a single mutex.
pub struct FileLibrary {
    /// Base directory where the library contents are stored
    base_dir: PathBuf,

    /// All books currently in the library, keyed by id
    index: HashMap<BookId, Book>,

    /// Largest id assigned so far. Monotonic; never rolled back, so a
    /// failed add leaves a gap in the sequence rather than risking reuse.
    max_id: u64,
}

impl FileLibrary {
    /// Opens a library in the given directory, creating the directory if
    /// it does not exist.
    ///
    /// When an index file is present the library is loaded from it, and
    /// each book's attachments are re-derived by listing its `files/`
    /// directory. Any read or list failure is fatal: a library that cannot
    /// be loaded consistently is not opened at all.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        info!("Opening library in {}", base_dir.display());
        fs::create_dir_all(&base_dir)?;

        let mut lib = Self {
            base_dir,
            index: HashMap::new(),
            max_id: 0,
        };

        let index_path = lib.index_path();
        if !index_path.exists() {
            info!("No existing index found, creating empty library");
            return Ok(lib);
        }

        info!("Found existing index file, loading...");
        lib.load_index(&index_path)?;
        info!("Loaded library with {} books", lib.index.len());
        Ok(lib)
    }

    /// Adds a new book with the given metadata and attachments.
    ///
    /// Assigns the next identifier, creates the book's directory structure,
    /// writes every attachment, and rewrites the index file before
    /// returning. A failure partway through aborts the add; files already
    /// written are left on disk and the consumed id is not reused.
    pub fn add(&mut self, details: BookDetails, files: &HashMap<String, Vec<u8>>) -> Result<Book> {
        self.max_id += 1;
        let id = BookId::new(self.max_id);
        let mut book = Book::new(id, details);

        fs::create_dir_all(self.files_dir(id))?;

        for (name, data) in files {
            debug!("Adding file for book id={}, file={}", id, name);
            let rel = self.write_book_file(id, name, data)?;
            book.files.insert(name.clone(), rel);
        }

        self.index.insert(id, book.clone());
        self.save_index_to_disk()?;
        Ok(book)
    }

    /// Attaches a file to an existing book, overwriting any attachment
    /// with the same name.
    ///
    /// The name must be a bare file name; names carrying path separators
    /// or dot components are rejected with `InvalidFileName`. The
    /// in-memory mapping is updated only after a successful write. The
    /// index file is not rewritten: attachments are not part of the index
    /// and are re-derived from disk on the next open.
    pub fn add_file_to_book(&mut self, id: BookId, name: &str, data: &[u8]) -> Result<()> {
        if !self.index.contains_key(&id) {
            return Err(LibraryError::BookNotFound(id));
        }

        let rel = self.write_book_file(id, name, data)?;
        if let Some(book) = self.index.get_mut(&id) {
            book.files.insert(name.to_string(), rel);
        }
        Ok(())
    }

    /// Detaches a named file from a book and removes it from disk.
    ///
    /// The in-memory mapping entry is removed even when the disk removal
    /// fails, and the disk error is still returned. Until the next open
    /// (which re-derives mappings from disk) the in-memory view may then
    /// claim the file is gone while it still exists on disk.
    pub fn delete_file_from_book(&mut self, file_name: &str, id: BookId) -> Result<()> {
        let book = self
            .index
            .get(&id)
            .ok_or(LibraryError::BookNotFound(id))?;
        if !book.has_file(file_name) {
            return Err(LibraryError::FileNotFound {
                book: id,
                name: file_name.to_string(),
            });
        }

        let path = self.book_file_path(id, file_name);
        let removed = fs::remove_file(&path);
        if let Some(book) = self.index.get_mut(&id) {
            book.files.remove(file_name);
        }
        removed?;
        Ok(())
    }

    /// Gets a single book by id. Never touches disk.
    pub fn get_book_by_id(&self, id: BookId) -> Result<&Book> {
        self.index.get(&id).ok_or(LibraryError::BookNotFound(id))
    }

    /// Returns every book in the library, in unspecified order.
    pub fn get_all(&self) -> Vec<&Book> {
        self.index.values().collect()
    }

    /// Rewrites the index file in full from the in-memory index.
    pub fn save_index_to_disk(&self) -> Result<()> {
        let entries: BTreeMap<String, &BookDetails> = self
            .index
            .values()
            .map(|book| (book.id.as_string(), &book.details))
            .collect();
        index::write_index(&self.index_path(), &entries)
    }

    /// Base directory where the library contents are stored. Attachment
    /// paths in a book's file mapping are relative to this directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn load_index(&mut self, index_path: &Path) -> Result<()> {
        let details_by_id = index::read_index(index_path)?;

        let mut index = HashMap::with_capacity(details_by_id.len());
        let mut max_id = 0;
        for (id, details) in details_by_id {
            let mut book = Book::new(id, details);
            self.load_files_for_book(&mut book)?;
            max_id = max_id.max(id.value());
            index.insert(id, book);
        }

        self.index = index;
        self.max_id = max_id;
        Ok(())
    }

    fn load_files_for_book(&self, book: &mut Book) -> Result<()> {
        let files_dir = self.files_dir(book.id);
        for entry in fs::read_dir(&files_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let rel = Self::relative_file_path(book.id, &file_name);
            book.files.insert(file_name, rel);
        }
        Ok(())
    }

    fn write_book_file(&self, id: BookId, name: &str, data: &[u8]) -> Result<PathBuf> {
        validate_file_name(name)?;
        fs::write(self.book_file_path(id, name), data)?;
        Ok(Self::relative_file_path(id, name))
    }

    fn index_path(&self) -> PathBuf {
        self.base_dir.join(index::INDEX_FILE_NAME)
    }

    fn book_dir(&self, id: BookId) -> PathBuf {
        self.base_dir.join(id.as_string())
    }

    fn files_dir(&self, id: BookId) -> PathBuf {
        self.book_dir(id).join("files")
    }

    fn book_file_path(&self, id: BookId, name: &str) -> PathBuf {
        self.files_dir(id).join(name)
    }

    fn relative_file_path(id: BookId, name: &str) -> PathBuf {
        PathBuf::from(id.as_string()).join("files").join(name)
    }
}

/// Attachment names must be bare file names: anything with a path
/// separator or a `.`/`..` component would resolve outside the book's
/// `files/` directory and leave the mapping out of step with disk.
fn validate_file_name(name: &str) -> Result<()> {
    let has_separator = name.chars().any(|c| matches!(c, '/' | '\\'));
    if name.is_empty() || name == "." || name == ".." || has_separator {
        return Err(LibraryError::InvalidFileName(name.to_string()));
    }
    Ok(())
}
