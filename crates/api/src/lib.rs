//! HTTP API: the axum transport adapter around the bookstore catalog.

pub mod app;
pub mod envelope;
