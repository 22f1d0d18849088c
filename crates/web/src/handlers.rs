//! Request handlers translating HTTP calls into engine operations.

use crate::SharedLibrary;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ebookshelf_core::{Book, BookDetails, BookId};
use ebookshelf_library::{FileLibrary, LibraryError};
use std::collections::HashMap;
use std::sync::MutexGuard;

type HandlerError = (StatusCode, String);

fn lock(library: &SharedLibrary) -> Result<MutexGuard<'_, FileLibrary>, HandlerError> {
    library.lock().map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "library lock poisoned".to_string(),
        )
    })
}

fn engine_error(err: LibraryError) -> HandlerError {
    let status = match err {
        LibraryError::BookNotFound(_) | LibraryError::FileNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        LibraryError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("Engine error: {}", err);
    }
    (status, err.to_string())
}

pub async fn list_books(
    State(library): State<SharedLibrary>,
) -> Result<Json<Vec<Book>>, HandlerError> {
    let library = lock(&library)?;
    let mut books: Vec<Book> = library.get_all().into_iter().cloned().collect();
    // The engine's iteration order is unspecified; sort for stable output.
    books.sort_by_key(|book| book.id);
    Ok(Json(books))
}

pub async fn get_book(
    State(library): State<SharedLibrary>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, HandlerError> {
    let library = lock(&library)?;
    let book = library
        .get_book_by_id(BookId::new(id))
        .map_err(engine_error)?;
    Ok(Json(book.clone()))
}

pub async fn add_book(
    State(library): State<SharedLibrary>,
    Json(details): Json<BookDetails>,
) -> Result<(StatusCode, Json<Book>), HandlerError> {
    let mut library = lock(&library)?;
    let book = library
        .add(details, &HashMap::new())
        .map_err(engine_error)?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn attach_file(
    State(library): State<SharedLibrary>,
    Path((id, name)): Path<(u64, String)>,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let mut library = lock(&library)?;
    library
        .add_file_to_book(BookId::new(id), &name, &body)
        .map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn detach_file(
    State(library): State<SharedLibrary>,
    Path((id, name)): Path<(u64, String)>,
) -> Result<StatusCode, HandlerError> {
    let mut library = lock(&library)?;
    library
        .delete_file_from_book(&name, BookId::new(id))
        .map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_file(
    State(library): State<SharedLibrary>,
    Path((id, name)): Path<(u64, String)>,
) -> Result<Vec<u8>, HandlerError> {
    // Resolve the on-disk path under the lock, read without it.
    let path = {
        let library = lock(&library)?;
        let book = library
            .get_book_by_id(BookId::new(id))
            .map_err(engine_error)?;
        let rel = book.file_path(&name).ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("no file named {} for book with id={}", name, id),
            )
        })?;
        library.base_dir().join(rel)
    };

    tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            (StatusCode::NOT_FOUND, format!("file {} is missing", name))
        } else {
            log::error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })
}
