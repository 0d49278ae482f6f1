//! Core roster logic for circlekit.
//! This crate is the single source of truth for schema and seed invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::seed::{load_initial_roster, SeedError, SeedOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::circle::{Circle, CircleId, NewCircle};
pub use model::member::{Member, MemberId, NewMember};
pub use model::ValidationError;
pub use repo::circle_repo::{
    CircleListQuery, CircleRepository, CircleRoster, SqliteCircleRepository,
};
pub use repo::member_repo::{MemberListQuery, MemberRepository, SqliteMemberRepository};
pub use repo::{RepoError, RepoResult};
pub use service::circle_service::{CircleService, EstablishCircleRequest};
pub use service::member_service::MemberService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
