//! Member use-case service.
//!
//! # Responsibility
//! - Provide stable member lifecycle entry points for core callers.
//! - Delegate persistence to repository implementations.

use crate::model::circle::CircleId;
use crate::model::member::{Member, MemberId, NewMember};
use crate::repo::member_repo::{MemberListQuery, MemberRepository};
use crate::repo::{RepoError, RepoResult};

/// Use-case service wrapper for member lifecycle operations.
pub struct MemberService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> MemberService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Enrolls a new member and returns the stored row.
    ///
    /// Returning the stored row makes storage-applied defaults (age 20,
    /// major "other") visible to the caller.
    pub fn enroll(&self, draft: &NewMember) -> RepoResult<Member> {
        let id = self.repo.create_member(draft)?;
        self.repo
            .get_member(id)?
            .ok_or(RepoError::MemberNotFound(id))
    }

    /// Gets one member by id.
    pub fn get(&self, id: MemberId) -> RepoResult<Option<Member>> {
        self.repo.get_member(id)
    }

    /// Lists the members of one circle ordered by id.
    pub fn roster(&self, circle_id: CircleId) -> RepoResult<Vec<Member>> {
        self.repo.list_members(&MemberListQuery {
            circle_id: Some(circle_id),
            ..MemberListQuery::default()
        })
    }

    /// Moves a member to another circle, or out of any circle.
    ///
    /// Returns the stored row after the move.
    pub fn transfer(&self, id: MemberId, circle_id: Option<CircleId>) -> RepoResult<Member> {
        let mut member = self
            .repo
            .get_member(id)?
            .ok_or(RepoError::MemberNotFound(id))?;

        member.circle_id = circle_id;
        self.repo.update_member(&member)?;
        Ok(member)
    }

    /// Removes a member permanently.
    pub fn withdraw(&self, id: MemberId) -> RepoResult<()> {
        self.repo.delete_member(id)
    }
}
