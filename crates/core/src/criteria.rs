//! Search criteria and the field predicates shared by every entity kind.
//!
//! String fields use case-sensitive substring containment, numeric fields
//! exact equality, list fields "any element contains". A filter value with the
//! wrong JSON type never matches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::entity::Entity;

/// Filter set for a store search. All filters must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria {
    filters: BTreeMap<String, JsonValue>,
}

impl SearchCriteria {
    /// Criteria without filters: a search returns every stored value.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_filters(filters: impl IntoIterator<Item = (String, JsonValue)>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.filters.get(field)
    }

    pub fn filters(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `entity` satisfies every recognised filter.
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| entity.field_matches(field, value).unwrap_or(true))
    }
}

/// `haystack` contains the filter string (case-sensitive).
pub fn contains_str(haystack: &str, filter: &JsonValue) -> bool {
    match filter.as_str() {
        Some(needle) => haystack.contains(needle),
        None => false,
    }
}

/// Optional string field: absent values never match.
pub fn contains_opt_str(haystack: Option<&str>, filter: &JsonValue) -> bool {
    haystack.is_some_and(|h| contains_str(h, filter))
}

/// At least one element contains the filter string.
pub fn any_contains<S: AsRef<str>>(items: &[S], filter: &JsonValue) -> bool {
    items.iter().any(|item| contains_str(item.as_ref(), filter))
}

/// Exact floating point equality with a numeric filter, or a string that
/// parses to one (query-string filters arrive as strings).
#[allow(clippy::float_cmp)]
pub fn equals_f64(field: f64, filter: &JsonValue) -> bool {
    let wanted = match filter {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    wanted.is_some_and(|f| f == field)
}

/// Exact integer equality with a numeric filter, or a string that parses to
/// one.
pub fn equals_u64(field: u64, filter: &JsonValue) -> bool {
    let wanted = match filter {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    wanted.is_some_and(|f| f == field)
}
