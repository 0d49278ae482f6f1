//! Domain model for circles and their members.
//!
//! # Responsibility
//! - Define the canonical row shapes persisted by the roster store.
//! - Define the draft shapes used on insert paths, where omitted fields
//!   fall through to storage defaults.
//!
//! # Invariants
//! - Every persisted object is identified by a storage-assigned integer id.
//! - A member belongs to at most one circle; removal of the circle removes
//!   its members (hard cascade, no tombstones).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod circle;
pub mod member;

/// Validation failure raised before any persistence is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Circle name is empty or whitespace-only.
    BlankCircleName,
    /// Circle capacity must be at least 1. Capacity is advisory beyond that.
    NonPositiveCapacity(i64),
    /// Member name is empty or whitespace-only.
    BlankMemberName,
    /// Member grade must be at least 1.
    NonPositiveGrade(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCircleName => write!(f, "circle name must not be blank"),
            Self::NonPositiveCapacity(value) => {
                write!(f, "circle capacity must be >= 1, got {value}")
            }
            Self::BlankMemberName => write!(f, "member name must not be blank"),
            Self::NonPositiveGrade(value) => {
                write!(f, "member grade must be >= 1, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}
