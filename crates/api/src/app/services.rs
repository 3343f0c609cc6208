//! Services shared by every handler.

use bookstore_infra::{AggregationReader, Catalog, CrossEntityValidator};

/// Handles to the catalog and the services built on it.
///
/// Built once per process and shared behind an `Arc` through an axum
/// `Extension`.
pub struct AppServices {
    pub catalog: Catalog,
    pub validator: CrossEntityValidator,
    pub reports: AggregationReader,
}

impl AppServices {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            validator: CrossEntityValidator::new(catalog.clone()),
            reports: AggregationReader::new(catalog.clone()),
            catalog,
        }
    }
}
