use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_catalog::Book;
use bookstore_catalog::book::book_field_matches;
use bookstore_core::criteria::equals_u64;
use bookstore_core::{Entity, EntityId};

/// A recorded sale of some quantity of one book.
///
/// Also used, with an unassigned identity, as the per-title aggregate in a
/// report's top-sellers list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSale {
    pub id: EntityId,
    pub book: Book,
    pub quantity: u64,
}

impl BookSale {
    pub fn new(book: Book, quantity: u64) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            book,
            quantity,
        }
    }
}

impl Entity for BookSale {
    const KIND: &'static str = "book_sale";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "quantity" => Some(equals_u64(self.quantity, value)),
            _ => book_field_matches(&self.book, field, value),
        }
    }
}
