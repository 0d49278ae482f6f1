//! Circle domain model.
//!
//! # Responsibility
//! - Define the persisted circle row and its insert draft.
//!
//! # Invariants
//! - `capacity` is an advisory hint: nothing compares it against the
//!   actual roster size, here or in any other layer.
//! - `owner_id` points at an identity the store does not manage; it is
//!   never dereferenced by schema constraints.

use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier for a circle row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CircleId = i64;

/// Persisted circle row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    /// Storage-assigned, monotonically increasing id.
    pub id: CircleId,
    pub name: String,
    /// Intended maximum roster size. Advisory only.
    pub capacity: i64,
    /// External identity of the circle owner. No foreign key.
    pub owner_id: i64,
}

/// Insert draft for a circle. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCircle {
    pub name: String,
    pub capacity: i64,
    pub owner_id: i64,
}

impl NewCircle {
    pub fn new(name: impl Into<String>, capacity: i64, owner_id: i64) -> Self {
        Self {
            name: name.into(),
            capacity,
            owner_id,
        }
    }

    /// Checks draft fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.capacity)
    }
}

impl Circle {
    /// Checks a persisted or to-be-updated row.
    ///
    /// Read paths use this to reject invalid stored state instead of
    /// masking it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.capacity)
    }
}

fn validate_fields(name: &str, capacity: i64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankCircleName);
    }
    if capacity < 1 {
        return Err(ValidationError::NonPositiveCapacity(capacity));
    }
    Ok(())
}
