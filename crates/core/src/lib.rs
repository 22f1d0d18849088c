//! ebookshelf domain types
//!
//! Shared data model for the library engine and its callers: book
//! identifiers, descriptive metadata, and the catalogued book entry itself.

pub mod book;

pub use book::{Book, BookDetails, BookId};
