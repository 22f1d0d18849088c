//! ebookshelf library engine
//!
//! The file-backed engine owning book metadata, identity assignment, the
//! on-disk index, and the per-book attachment directories. Callers (the
//! web adapter and the CLI) drive it through the operations on
//! [`FileLibrary`]; the engine persists synchronously before returning and
//! keeps no caches beyond the in-memory index it rebuilds from disk on open.

pub mod error;
mod index;
mod library;

pub use error::{LibraryError, Result};
pub use index::INDEX_FILE_NAME;
pub use library::FileLibrary;
