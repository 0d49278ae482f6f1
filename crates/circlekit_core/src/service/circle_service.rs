//! Circle use-case service.
//!
//! # Responsibility
//! - Provide stable circle lifecycle entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence
//!   contracts.
//! - Roster size is never compared against `capacity` here; capacity
//!   stays advisory.

use crate::model::circle::{Circle, CircleId};
use crate::model::member::{MemberId, NewMember};
use crate::repo::circle_repo::{CircleListQuery, CircleRepository, CircleRoster};
use crate::repo::{RepoError, RepoResult};

/// Request model for establishing a circle with its founding owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstablishCircleRequest {
    pub name: String,
    pub capacity: i64,
    pub owner_name: String,
    pub owner_grade: i64,
    /// `None` requests the storage default age.
    pub owner_age: Option<i64>,
    /// `None` requests the storage default major.
    pub owner_major: Option<String>,
}

/// Use-case service wrapper for circle lifecycle operations.
pub struct CircleService<R: CircleRepository> {
    repo: R,
}

impl<R: CircleRepository> CircleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Establishes a circle together with its founding owner member.
    ///
    /// # Contract
    /// - Atomic: either circle and owner both exist afterwards, or
    ///   neither does.
    /// - Returns the created circle id and owner member id.
    pub fn establish(
        &mut self,
        request: &EstablishCircleRequest,
    ) -> RepoResult<(CircleId, MemberId)> {
        let mut owner = NewMember::new(request.owner_name.clone(), request.owner_grade);
        owner.age = request.owner_age;
        owner.major = request.owner_major.clone();
        self.repo
            .establish_circle(&request.name, request.capacity, &owner)
    }

    /// Fetches a circle together with its members.
    ///
    /// Missing circles are a use-case error here, not an empty read.
    pub fn fetch_roster(&self, id: CircleId) -> RepoResult<CircleRoster> {
        self.repo
            .get_roster(id)?
            .ok_or(RepoError::CircleNotFound(id))
    }

    /// Applies a partial update: only the provided fields change.
    ///
    /// Returns the stored row after the update.
    pub fn update(
        &self,
        id: CircleId,
        name: Option<String>,
        capacity: Option<i64>,
    ) -> RepoResult<Circle> {
        let mut circle = self
            .repo
            .get_circle(id)?
            .ok_or(RepoError::CircleNotFound(id))?;

        if let Some(name) = name {
            circle.name = name;
        }
        if let Some(capacity) = capacity {
            circle.capacity = capacity;
        }

        self.repo.update_circle(&circle)?;
        Ok(circle)
    }

    /// Disbands a circle; its members are removed by the schema cascade.
    pub fn disband(&self, id: CircleId) -> RepoResult<()> {
        self.repo.delete_circle(id)
    }

    /// Lists circles using filter and pagination options.
    pub fn list(&self, query: &CircleListQuery) -> RepoResult<Vec<Circle>> {
        self.repo.list_circles(query)
    }
}
