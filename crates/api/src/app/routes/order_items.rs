use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_sales::OrderItem;

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order_item).get(list_order_items))
        .route("/:id", get(get_order_item).put(update_order_item).delete(delete_order_item))
}

pub async fn create_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<OrderItem>, JsonRejection>,
) -> axum::response::Response {
    let order_item = match common::payload(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.validator.create_order_item(order_item))
}

pub async fn get_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.order_items, &id)
}

pub async fn update_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<OrderItem>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(order_item) => common::replace(&*services.catalog.order_items, &id, order_item),
        Err(resp) => resp,
    }
}

pub async fn delete_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.order_items, &id)
}

pub async fn list_order_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.order_items, &common::criteria(query, &body))
}
