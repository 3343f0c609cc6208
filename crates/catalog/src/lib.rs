//! Catalog domain module: authors and the books that reference them.
//!
//! Plain records plus their search predicates (no IO, no storage).

pub mod author;
pub mod book;

pub use author::Author;
pub use book::Book;
