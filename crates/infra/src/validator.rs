//! Cross-entity validation on the write path.
//!
//! Referenced entities are looked up in their own stores before the write,
//! and the stored value is embedded in the record being written (a snapshot
//! as of write time, not a live link). Nothing stops the referenced entity
//! from being deleted afterwards.
//!
//! Writes spanning several stores are a saga, not a transaction: each store
//! write commits on its own and nothing is rolled back when a later step
//! fails. A returned error therefore does not mean the catalog is unchanged.

use bookstore_catalog::Book;
use bookstore_core::{DomainError, DomainResult};
use bookstore_sales::{Order, OrderItem};

use crate::catalog::Catalog;
use crate::store::EntityStore;

pub const AUTHOR_NOT_FOUND: &str = "author not found";
pub const BOOK_NOT_FOUND: &str = "book not found";
pub const BOOKS_DO_NOT_EXIST: &str = "some books do not exist";
pub const CUSTOMER_NOT_FOUND: &str = "customer not found";

#[derive(Debug, Clone)]
pub struct CrossEntityValidator {
    catalog: Catalog,
}

impl CrossEntityValidator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Create a book whose author exists. No book is written otherwise.
    pub fn create_book(&self, mut book: Book) -> DomainResult<Book> {
        book.author = reference(self.catalog.authors.get(book.author.id), AUTHOR_NOT_FOUND)?;
        self.catalog.books.create(book)
    }

    /// Create an order item whose book exists. No item is written otherwise.
    pub fn create_order_item(&self, mut item: OrderItem) -> DomainResult<OrderItem> {
        item.book = reference(self.catalog.books.get(item.book.id), BOOK_NOT_FOUND)?;
        self.catalog.order_items.create(item)
    }

    /// Create an order, creating one order item per line first.
    ///
    /// Steps, in order:
    /// 1. look up the customer, keeping the outcome;
    /// 2. create each item in list order, stopping at the first missing book
    ///    (items created before it stay committed);
    /// 3. fail if the customer lookup in step 1 failed (items stay committed);
    /// 4. create the order with the stored customer and the created items.
    pub fn create_order(&self, order: Order) -> DomainResult<Order> {
        let customer = self.catalog.customers.get(order.customer.id);

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let book_id = item.book.id;
            match self.create_order_item(item) {
                Ok(created) => items.push(created),
                Err(DomainError::Validation(_)) => {
                    tracing::warn!(
                        %book_id,
                        committed_items = items.len(),
                        "order rejected: book does not exist"
                    );
                    return Err(DomainError::validation(BOOKS_DO_NOT_EXIST));
                }
                Err(e) => return Err(e),
            }
        }

        let customer = match reference(customer, CUSTOMER_NOT_FOUND) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    customer_id = %order.customer.id,
                    committed_items = items.len(),
                    "order rejected: customer does not exist"
                );
                return Err(e);
            }
        };

        self.catalog.orders.create(Order {
            id: order.id,
            customer,
            items,
        })
    }
}

/// A missing referenced entity is a validation failure of the write; any
/// other store error propagates unchanged.
fn reference<T>(lookup: DomainResult<T>, msg: &'static str) -> DomainResult<T> {
    lookup.map_err(|e| {
        if e.is_not_found() {
            DomainError::validation(msg)
        } else {
            e
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_catalog::Author;
    use bookstore_core::{EntityId, SearchCriteria};
    use bookstore_parties::Customer;

    fn setup() -> CrossEntityValidator {
        CrossEntityValidator::new(Catalog::new())
    }

    fn author_ref(id: u64) -> Author {
        Author {
            id: EntityId::new(id),
            ..Author::default()
        }
    }

    fn book_ref(id: u64) -> Book {
        Book {
            id: EntityId::new(id),
            ..Book::default()
        }
    }

    fn customer_ref(id: u64) -> Customer {
        Customer {
            id: EntityId::new(id),
            ..Customer::default()
        }
    }

    #[test]
    fn book_with_existing_author_gets_its_own_id_and_embedded_author() {
        let v = setup();
        let author = v
            .catalog()
            .authors
            .create(Author::new("Frank", "Herbert"))
            .unwrap();
        assert_eq!(author.id, EntityId::new(1));
        v.catalog().books.create(Book::new("Seed", 1.0, author.clone())).unwrap();

        let book = v.create_book(Book::new("X", 5.0, author_ref(1))).unwrap();
        assert_eq!(book.id, EntityId::new(2));
        assert_eq!(book.author, author);
    }

    #[test]
    fn book_with_missing_author_is_rejected_and_not_written() {
        let v = setup();
        let err = v.create_book(Book::new("X", 5.0, author_ref(42))).unwrap_err();

        assert_eq!(err, DomainError::validation(AUTHOR_NOT_FOUND));
        assert!(v.catalog().books.is_empty());
        assert_eq!(v.catalog().books.next_id(), EntityId::FIRST);
    }

    #[test]
    fn order_item_with_missing_book_is_rejected() {
        let v = setup();
        let err = v.create_order_item(OrderItem::new(book_ref(1), 2)).unwrap_err();
        assert_eq!(err, DomainError::validation(BOOK_NOT_FOUND));
        assert!(v.catalog().order_items.is_empty());
    }

    #[test]
    fn order_with_valid_references_embeds_stored_values() {
        let v = setup();
        let author = v.catalog().authors.create(Author::new("F", "H")).unwrap();
        let book = v.create_book(Book::new("Dune", 9.99, author)).unwrap();
        let customer = v.catalog().customers.create(Customer::new("Ada")).unwrap();

        let order = v
            .create_order(Order::new(
                customer_ref(customer.id.get()),
                vec![OrderItem::new(book_ref(book.id.get()), 2)],
            ))
            .unwrap();

        assert_eq!(order.id, EntityId::new(1));
        assert_eq!(order.customer, customer);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].id, EntityId::new(1));
        assert_eq!(order.items[0].book, book);
        assert_eq!(v.catalog().orders.get(order.id).unwrap(), order);
    }

    #[test]
    fn missing_customer_still_commits_order_items() {
        let v = setup();
        v.catalog().customers.create(Customer::new("Ada")).unwrap();
        let author = v.catalog().authors.create(Author::new("F", "H")).unwrap();
        let book = v.create_book(Book::new("Dune", 9.99, author)).unwrap();

        let err = v
            .create_order(Order::new(
                customer_ref(99),
                vec![OrderItem::new(book_ref(book.id.get()), 2)],
            ))
            .unwrap_err();

        assert_eq!(err, DomainError::validation(CUSTOMER_NOT_FOUND));
        assert!(v.catalog().orders.is_empty());

        let items = v.catalog().order_items.search(&SearchCriteria::all()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].book.id, book.id);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn missing_book_stops_the_loop_but_keeps_earlier_items() {
        let v = setup();
        let customer = v.catalog().customers.create(Customer::new("Ada")).unwrap();
        let author = v.catalog().authors.create(Author::new("F", "H")).unwrap();
        let book = v.create_book(Book::new("Dune", 9.99, author)).unwrap();

        let err = v
            .create_order(Order::new(
                customer_ref(customer.id.get()),
                vec![
                    OrderItem::new(book_ref(book.id.get()), 1),
                    OrderItem::new(book_ref(77), 1),
                    OrderItem::new(book_ref(book.id.get()), 3),
                ],
            ))
            .unwrap_err();

        assert_eq!(err, DomainError::validation(BOOKS_DO_NOT_EXIST));
        assert_eq!(v.catalog().order_items.len(), 1);
        assert!(v.catalog().orders.is_empty());
    }

    #[test]
    fn missing_book_is_reported_before_missing_customer() {
        let v = setup();
        let err = v
            .create_order(Order::new(customer_ref(5), vec![OrderItem::new(book_ref(5), 1)]))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(BOOKS_DO_NOT_EXIST));
    }

    #[test]
    fn deleting_a_referenced_author_leaves_the_embedded_copy() {
        let v = setup();
        let author = v.catalog().authors.create(Author::new("F", "H")).unwrap();
        let book = v.create_book(Book::new("Dune", 9.99, author_ref(1))).unwrap();

        v.catalog().authors.delete(author.id).unwrap();

        let stored = v.catalog().books.get(book.id).unwrap();
        assert_eq!(stored.author, author);
    }

    #[test]
    fn order_without_items_only_checks_customer() {
        let v = setup();
        let err = v.create_order(Order::new(customer_ref(1), Vec::new())).unwrap_err();
        assert_eq!(err, DomainError::validation(CUSTOMER_NOT_FOUND));
        assert!(v.catalog().order_items.is_empty());
    }
}
