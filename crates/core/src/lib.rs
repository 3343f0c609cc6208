//! `bookstore-core`: building blocks shared by every entity kind.
//!
//! This crate contains **pure domain** primitives (no storage, no IO): process
//! assigned identities, the `Entity` contract every stored record satisfies,
//! search criteria with their per-field predicates, and the domain error model.

pub mod criteria;
pub mod entity;
pub mod error;
pub mod id;

pub use criteria::SearchCriteria;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
