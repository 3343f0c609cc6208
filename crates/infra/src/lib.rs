//! Infrastructure layer: process-local stores, cross-store workflows,
//! persistence and configuration.

pub mod catalog;
pub mod config;
pub mod reports;
pub mod snapshot;
pub mod store;
pub mod validator;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use reports::{AggregationReader, ReportHistory, ReportSource};
pub use store::{EntityStore, InMemoryEntityStore};
pub use validator::CrossEntityValidator;
