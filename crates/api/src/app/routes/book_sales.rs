use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_infra::EntityStore;
use bookstore_sales::BookSale;

use crate::app::routes::common;
use crate::app::services::AppServices;

/// Book sales are recorded, read and removed; never edited.
pub fn router() -> Router {
    Router::new()
        .route("/", post(record_sale).get(list_sales))
        .route("/:id", get(get_sale).delete(delete_sale))
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<BookSale>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(sale) => common::respond(StatusCode::CREATED, services.catalog.book_sales.create(sale)),
        Err(resp) => resp,
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.book_sales, &id)
}

pub async fn delete_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.book_sales, &id)
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.book_sales, &common::criteria(query, &body))
}
