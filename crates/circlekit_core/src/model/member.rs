//! Member domain model.
//!
//! # Responsibility
//! - Define the persisted member row and its insert draft.
//! - Keep the insert draft's `age`/`major` optional so omitted values are
//!   filled in by storage defaults, not by Rust code.
//!
//! # Invariants
//! - A member with `circle_id = Some(..)` must reference an existing
//!   circle at all times; the schema enforces this.
//! - A member with `circle_id = None` is unaffiliated and unaffected by
//!   any circle deletion.

use super::circle::CircleId;
use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier for a member row.
pub type MemberId = i64;

/// Persisted member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Storage-assigned, monotonically increasing id.
    pub id: MemberId,
    pub name: String,
    pub grade: i64,
    /// Circle this member belongs to, if any.
    pub circle_id: Option<CircleId>,
    pub age: i64,
    pub major: String,
}

/// Insert draft for a member.
///
/// `age` and `major` are left as `None` to request the storage defaults
/// (`20` and `"other"` respectively).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub grade: i64,
    pub circle_id: Option<CircleId>,
    pub age: Option<i64>,
    pub major: Option<String>,
}

impl NewMember {
    /// Creates an unaffiliated draft with storage-default age and major.
    pub fn new(name: impl Into<String>, grade: i64) -> Self {
        Self {
            name: name.into(),
            grade,
            circle_id: None,
            age: None,
            major: None,
        }
    }

    /// Checks draft fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.grade)
    }
}

impl Member {
    /// Checks a persisted or to-be-updated row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.grade)
    }

    /// Returns whether this member currently belongs to a circle.
    pub fn is_affiliated(&self) -> bool {
        self.circle_id.is_some()
    }
}

fn validate_fields(name: &str, grade: i64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankMemberName);
    }
    if grade < 1 {
        return Err(ValidationError::NonPositiveGrade(grade));
    }
    Ok(())
}
