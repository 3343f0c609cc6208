//! The process-wide set of entity stores.
//!
//! Constructed once at startup and passed by handle to every consumer;
//! cloning a `Catalog` clones the handle, not the stores.

use std::sync::Arc;

use bookstore_catalog::{Author, Book};
use bookstore_parties::Customer;
use bookstore_sales::{BookSale, Order, OrderItem};

use crate::reports::ReportHistory;
use crate::store::InMemoryEntityStore;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub authors: Arc<InMemoryEntityStore<Author>>,
    pub books: Arc<InMemoryEntityStore<Book>>,
    pub customers: Arc<InMemoryEntityStore<Customer>>,
    pub order_items: Arc<InMemoryEntityStore<OrderItem>>,
    pub orders: Arc<InMemoryEntityStore<Order>>,
    pub book_sales: Arc<InMemoryEntityStore<BookSale>>,
    pub reports: Arc<ReportHistory>,
}

impl Catalog {
    /// A catalog with every store empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles point at the same stores and report history.
    pub fn same_stores(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.authors, &other.authors)
            && Arc::ptr_eq(&self.books, &other.books)
            && Arc::ptr_eq(&self.customers, &other.customers)
            && Arc::ptr_eq(&self.order_items, &other.order_items)
            && Arc::ptr_eq(&self.orders, &other.orders)
            && Arc::ptr_eq(&self.book_sales, &other.book_sales)
            && Arc::ptr_eq(&self.reports, &other.reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityStore;

    #[test]
    fn clones_share_the_same_stores() {
        let catalog = Catalog::new();
        let handle = catalog.clone();

        handle.authors.create(Author::new("Frank", "Herbert")).unwrap();

        assert!(catalog.same_stores(&handle));
        assert_eq!(catalog.authors.len(), 1);
        assert!(!catalog.same_stores(&Catalog::new()));
    }

    #[test]
    fn same_stores_checks_every_handle() {
        let catalog = Catalog::new();

        let mut other = catalog.clone();
        other.reports = Arc::new(ReportHistory::new());
        assert!(!catalog.same_stores(&other));

        let mut other = catalog.clone();
        other.book_sales = Arc::new(InMemoryEntityStore::new());
        assert!(!catalog.same_stores(&other));

        let mut other = catalog.clone();
        other.customers = Arc::new(InMemoryEntityStore::new());
        assert!(!catalog.same_stores(&other));
    }

    #[test]
    fn each_store_has_its_own_counter() {
        let catalog = Catalog::new();
        let author = catalog.authors.create(Author::new("Frank", "Herbert")).unwrap();
        catalog.authors.create(Author::new("Jane", "Austen")).unwrap();
        let book = catalog.books.create(Book::new("Dune", 9.99, author)).unwrap();

        assert_eq!(book.id.get(), 1);
        assert_eq!(catalog.authors.next_id().get(), 3);
    }
}
