use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_core::criteria::contains_str;
use bookstore_core::{Entity, EntityId};

/// Author record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", the value the `name` filter is matched against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Author {
    const KIND: &'static str = "author";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "firstName" | "first_name" => Some(contains_str(&self.first_name, value)),
            "lastName" | "last_name" => Some(contains_str(&self.last_name, value)),
            "name" => Some(contains_str(&self.full_name(), value)),
            _ => None,
        }
    }
}
