use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_catalog::Author;

use bookstore_infra::EntityStore;

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_author).get(list_authors))
        .route("/:id", get(get_author).put(update_author).delete(delete_author))
}

pub async fn create_author(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<Author>, JsonRejection>,
) -> axum::response::Response {
    let author = match common::payload(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.catalog.authors.create(author))
}

pub async fn get_author(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.authors, &id)
}

pub async fn update_author(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<Author>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(author) => common::replace(&*services.catalog.authors, &id, author),
        Err(resp) => resp,
    }
}

pub async fn delete_author(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.authors, &id)
}

pub async fn list_authors(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.authors, &common::criteria(query, &body))
}
