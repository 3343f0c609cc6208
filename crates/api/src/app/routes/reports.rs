use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use bookstore_core::DomainError;
use bookstore_infra::ReportSource;

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(report_history).post(generate_report))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    pub source: Option<String>,
}

/// Fold the chosen store into a new report (`?source=book_sales|orders`).
pub async fn generate_report(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<GenerateParams>,
) -> axum::response::Response {
    let source = match params.source.as_deref().map(str::parse::<ReportSource>) {
        None => ReportSource::default(),
        Some(Ok(source)) => source,
        Some(Err(e)) => return invalid_input(e),
    };
    common::respond(StatusCode::CREATED, services.reports.generate(source))
}

/// Previously generated reports, optionally bounded by `from` / `to`.
pub async fn report_history(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    match services.catalog.reports.search(&common::criteria(query, &body)) {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(e) => invalid_input(e),
    }
}

fn invalid_input(err: DomainError) -> axum::response::Response {
    let message = match err {
        DomainError::Validation(msg) => msg,
        other => other.to_string(),
    };
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", message)
}
