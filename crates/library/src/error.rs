use ebookshelf_core::BookId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Book not found: id={0}")]
    BookNotFound(BookId),

    #[error("No file named {name} for book with id={book}")]
    FileNotFound { book: BookId, name: String },

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Malformed index at {path}: {reason}")]
    MalformedIndex { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
