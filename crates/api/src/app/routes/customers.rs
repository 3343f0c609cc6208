use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bookstore_parties::Customer;

use bookstore_infra::EntityStore;

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> axum::response::Response {
    let customer = match common::payload(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.catalog.customers.create(customer))
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::get_one(&*services.catalog.customers, &id)
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> axum::response::Response {
    match common::payload(payload) {
        Ok(customer) => common::replace(&*services.catalog.customers, &id, customer),
        Err(resp) => resp,
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::remove(&*services.catalog.customers, &id)
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    common::list(&*services.catalog.customers, &common::criteria(query, &body))
}
