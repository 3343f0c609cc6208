//! Sales domain module: orders, order items, book sales and sales reports.
//!
//! Records plus the pure aggregation that folds sale lines into a
//! `SalesReport` (no IO, no storage).

pub mod order;
pub mod report;
pub mod sale;

pub use order::{Order, OrderItem};
pub use report::SalesReport;
pub use sale::BookSale;
