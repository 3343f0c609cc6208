use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_sales::Order;

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
}

/// Creates one order item per line, then the order.
///
/// A rejected order can still leave order items behind: items created before
/// a missing book, or all of them when the customer is missing.
pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<Order>, JsonRejection>,
) -> axum::response::Response {
    let order = match common::payload(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.validator.create_order(order))
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.orders, &id)
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<Order>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(order) => common::replace(&*services.catalog.orders, &id, order),
        Err(resp) => resp,
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.orders, &id)
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.orders, &common::criteria(query, &body))
}
