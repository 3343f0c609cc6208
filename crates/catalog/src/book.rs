use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_core::criteria::{any_contains, contains_str, equals_f64};
use bookstore_core::{Entity, EntityId};

use crate::author::Author;

/// Book record.
///
/// `author` is an embedded copy of the author as it was when the book was
/// written to the store; it is not kept in sync with later author updates or
/// deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub price: f64,
    pub author: Author,
    pub genres: Vec<String>,
}

impl Book {
    pub fn new(title: impl Into<String>, price: f64, author: Author) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            title: title.into(),
            price,
            author,
            genres: Vec::new(),
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }
}

/// Filters shared by every record that embeds a book (books, book sales).
pub fn book_field_matches(book: &Book, field: &str, value: &JsonValue) -> Option<bool> {
    match field {
        "title" => Some(contains_str(&book.title, value)),
        "author" => Some(contains_str(&book.author.first_name, value)),
        "genre" => Some(any_contains(&book.genres, value)),
        _ => None,
    }
}

impl Entity for Book {
    const KIND: &'static str = "book";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "price" => Some(equals_f64(self.price, value)),
            _ => book_field_matches(self, field, value),
        }
    }
}
