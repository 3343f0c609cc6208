//! Helpers shared by the per-entity route files.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use bookstore_core::{DomainResult, Entity, EntityId, SearchCriteria};
use bookstore_infra::EntityStore;

use crate::app::errors;

/// Unwrap a JSON payload or answer `400 invalid_input`.
pub fn payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(value)| value)
        .map_err(errors::rejection_to_response)
}

pub fn parse_id(raw: &str) -> Result<EntityId, Response> {
    raw.parse::<EntityId>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"))
}

pub fn respond<T: Serialize>(status: StatusCode, result: DomainResult<T>) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Search filters from the query string, layered over an optional JSON
/// object body.
///
/// A body that is not a JSON object is ignored and the listing falls back to
/// its unfiltered form. Query values stay strings; numeric fields (`price`,
/// `quantity`) parse them when matching.
pub fn criteria(query: HashMap<String, String>, body: &Bytes) -> SearchCriteria {
    let mut filters: serde_json::Map<String, JsonValue> = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Map::new()
    } else {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring undecodable search body");
            serde_json::Map::new()
        })
    };

    for (key, raw) in query {
        filters.insert(key, JsonValue::String(raw));
    }

    SearchCriteria::from_filters(filters)
}

pub fn get_one<T, S>(store: &S, raw_id: &str) -> Response
where
    T: Entity,
    S: EntityStore<T> + ?Sized,
{
    match parse_id(raw_id) {
        Ok(id) => respond(StatusCode::OK, store.get(id)),
        Err(resp) => resp,
    }
}

/// Replace the entity at `raw_id`; the path identity wins over any id in the
/// body.
pub fn replace<T, S>(store: &S, raw_id: &str, mut value: T) -> Response
where
    T: Entity,
    S: EntityStore<T> + ?Sized,
{
    match parse_id(raw_id) {
        Ok(id) => {
            value.set_id(id);
            respond(StatusCode::OK, store.update(value))
        }
        Err(resp) => resp,
    }
}

pub fn remove<T, S>(store: &S, raw_id: &str) -> Response
where
    T: Entity,
    S: EntityStore<T> + ?Sized,
{
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match store.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub fn list<T, S>(store: &S, criteria: &SearchCriteria) -> Response
where
    T: Entity,
    S: EntityStore<T> + ?Sized,
{
    respond(StatusCode::OK, store.search(criteria))
}
