//! Entity trait: identity plus per-field search predicates.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::id::EntityId;

/// A record owned by an entity store.
///
/// Stores keep values by identity and hand out clones; an entity therefore
/// needs to be cheap enough to clone and safe to move across threads.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Stable lowercase kind name used in errors and logs (e.g. `"book"`).
    const KIND: &'static str;

    /// Returns the entity identity (`EntityId::UNASSIGNED` before creation).
    fn id(&self) -> EntityId;

    /// Overwrites the identity. Only the owning store assigns identities.
    fn set_id(&mut self, id: EntityId);

    /// Evaluates one filter predicate against this value.
    ///
    /// Returns `None` when `field` is not a recognised filter key for this
    /// kind, so the caller can ignore it.
    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool>;
}
