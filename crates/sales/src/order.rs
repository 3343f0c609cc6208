use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_catalog::Book;
use bookstore_core::criteria::{contains_str, equals_u64};
use bookstore_core::{Entity, EntityId};
use bookstore_parties::Customer;

/// Order line: an embedded book snapshot and the quantity ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub id: EntityId,
    pub book: Book,
    pub quantity: u64,
}

impl OrderItem {
    pub fn new(book: Book, quantity: u64) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            book,
            quantity,
        }
    }

    /// Quantity times the embedded book price.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.book.price
    }
}

impl Entity for OrderItem {
    const KIND: &'static str = "order_item";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "title" => Some(contains_str(&self.book.title, value)),
            "quantity" => Some(equals_u64(self.quantity, value)),
            _ => None,
        }
    }
}

/// Order record: an embedded customer snapshot and its items, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: EntityId,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(customer: Customer, items: Vec<OrderItem>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            customer,
            items,
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

impl Entity for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "customer" => Some(contains_str(&self.customer.name, value)),
            "customer_id" => Some(equals_u64(self.customer.id.get(), value)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_catalog::Author;
    use bookstore_core::SearchCriteria;

    fn book(title: &str, price: f64) -> Book {
        Book::new(title, price, Author::new("Frank", "Herbert"))
    }

    #[test]
    fn order_total_sums_line_totals() {
        let order = Order::new(
            Customer::new("Ada"),
            vec![
                OrderItem::new(book("Dune", 10.0), 2),
                OrderItem::new(book("Emma", 2.5), 4),
            ],
        );
        assert_eq!(order.total(), 30.0);
    }

    #[test]
    fn order_filters_by_customer_name_and_id() {
        let mut customer = Customer::new("Ada Lovelace");
        customer.id = EntityId::new(4);
        let order = Order::new(customer, Vec::new());
        assert!(SearchCriteria::all().with("customer", "Love").matches(&order));
        assert!(SearchCriteria::all().with("customer_id", 4).matches(&order));
        assert!(!SearchCriteria::all().with("customer_id", 5).matches(&order));
    }

    #[test]
    fn order_item_filters_by_title_and_quantity() {
        let item = OrderItem::new(book("Dune", 10.0), 3);
        assert!(SearchCriteria::all().with("title", "Du").with("quantity", 3).matches(&item));
        assert!(!SearchCriteria::all().with("quantity", 2).matches(&item));
    }

    #[test]
    fn decodes_order_referencing_ids_only() {
        let json = r#"{
            "customer": {"id": 1, "name": ""},
            "items": [{"book": {"id": 2, "title": "", "price": 0, "author": {"first_name": "", "last_name": ""}}, "quantity": 2}]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.customer.id, EntityId::new(1));
        assert_eq!(order.items[0].book.id, EntityId::new(2));
        assert_eq!(order.items[0].quantity, 2);
    }
}
