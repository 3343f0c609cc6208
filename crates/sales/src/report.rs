//! Sales report aggregation.
//!
//! A report folds sale lines (book snapshot + quantity) into total revenue, a
//! record count, and a top-sellers list grouped by book title. Grouping is by
//! title, not identity: two distinct books sharing a title are one entry, and
//! the first book seen for a title is the one reported.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstore_catalog::Book;

use crate::order::Order;
use crate::sale::BookSale;

/// Derived snapshot of sales at a point in time. Never stored by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub timestamp: DateTime<Utc>,
    pub total_revenue: f64,
    pub total_orders: usize,
    pub top_selling_books: Vec<BookSale>,
}

impl SalesReport {
    /// Fold sale lines into a report.
    ///
    /// `record_count` is the number of scanned records, which is not the
    /// number of lines when one record holds several lines (orders).
    pub fn aggregate<'a, I>(lines: I, record_count: usize, timestamp: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = (&'a Book, u64)>,
    {
        let mut total_revenue = 0.0;
        let mut by_title: HashMap<&'a str, usize> = HashMap::new();
        let mut top: Vec<BookSale> = Vec::new();

        for (book, quantity) in lines {
            total_revenue += quantity as f64 * book.price;

            match by_title.get(book.title.as_str()) {
                Some(&idx) => top[idx].quantity += quantity,
                None => {
                    by_title.insert(book.title.as_str(), top.len());
                    top.push(BookSale::new(book.clone(), quantity));
                }
            }
        }

        // Stable: ties keep first-seen order.
        top.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        Self {
            timestamp,
            total_revenue,
            total_orders: record_count,
            top_selling_books: top,
        }
    }

    /// One line per book sale record.
    pub fn from_book_sales(sales: &[BookSale], timestamp: DateTime<Utc>) -> Self {
        Self::aggregate(
            sales.iter().map(|s| (&s.book, s.quantity)),
            sales.len(),
            timestamp,
        )
    }

    /// One line per item of every order; the count is the number of orders.
    pub fn from_orders(orders: &[Order], timestamp: DateTime<Utc>) -> Self {
        Self::aggregate(
            orders
                .iter()
                .flat_map(|o| o.items.iter().map(|i| (&i.book, i.quantity))),
            orders.len(),
            timestamp,
        )
    }

    /// Whether the report timestamp lies within the inclusive bounds.
    pub fn within(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
        from.is_none_or(|f| self.timestamp >= f) && to.is_none_or(|t| self.timestamp <= t)
    }
}
