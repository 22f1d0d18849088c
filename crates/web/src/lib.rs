//! ebookshelf web adapter
//!
//! Thin HTTP layer over the library engine. Handlers translate requests
//! into engine calls and engine errors into status codes; no library logic
//! lives here. The engine is not internally synchronized, so all access
//! goes through a single mutex.

mod handlers;

use axum::routing::get;
use axum::Router;
use ebookshelf_library::FileLibrary;
use std::sync::{Arc, Mutex};

/// Shared handle to the library engine. Every request, reading or
/// mutating, serializes behind this mutex.
pub type SharedLibrary = Arc<Mutex<FileLibrary>>;

/// Builds the service router over a shared library handle.
pub fn router(library: SharedLibrary) -> Router {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::add_book),
        )
        .route("/books/:id", get(handlers::get_book))
        .route(
            "/books/:id/files/:name",
            get(handlers::download_file)
                .put(handlers::attach_file)
                .delete(handlers::detach_file),
        )
        .with_state(library)
}

/// Serves the library web service on the given address until the process
/// exits.
pub async fn serve(addr: &str, library: SharedLibrary) -> std::io::Result<()> {
    log::info!("Starting web service on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(library)).await
}
