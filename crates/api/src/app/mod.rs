//! HTTP API application wiring (axum router + service wiring).
//!
//! - `services.rs`: the catalog handle and the services built on it
//! - `routes/`: HTTP routes + handlers (one file per entity kind)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use bookstore_infra::Catalog;

use crate::envelope::{envelope_middleware, Envelope};

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every catalog route runs inside the request envelope with the given
/// deadline; `/health` does not.
pub fn build_app(catalog: Catalog, request_timeout: Duration) -> Router {
    let services = Arc::new(services::AppServices::new(catalog));
    let envelope = Envelope::new(request_timeout);

    let enveloped = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                envelope,
                envelope_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(enveloped)
}
