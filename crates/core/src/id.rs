//! Process-assigned entity identities.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identity of a stored entity.
///
/// Assigned by the owning store: positive, strictly increasing per store,
/// never reused. `EntityId::UNASSIGNED` (zero) marks a value that has not been
/// stored yet.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const UNASSIGNED: EntityId = EntityId(0);

    /// The first identity a fresh store hands out.
    pub const FIRST: EntityId = EntityId(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The identity following this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<EntityId> for u64 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::validation(format!("invalid id {s:?}: {e}")))?;
        Ok(Self(raw))
    }
}
