//! Parties domain module: the customers that place orders.

pub mod customer;

pub use customer::{ContactInfo, Customer};
