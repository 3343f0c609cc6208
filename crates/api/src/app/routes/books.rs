use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_catalog::Book;

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_book).get(list_books))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// The author must exist; the stored author is embedded in the new book.
pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<Book>, JsonRejection>,
) -> axum::response::Response {
    let book = match common::payload(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.validator.create_book(book))
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.books, &id)
}

/// Replaces the book as given. The author is not looked up again.
pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<Book>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(book) => common::replace(&*services.catalog.books, &id, book),
        Err(resp) => resp,
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.books, &id)
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.books, &common::criteria(query, &body))
}
