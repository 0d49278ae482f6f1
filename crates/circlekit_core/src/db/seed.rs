//! Fixed initial roster for freshly provisioned stores.
//!
//! # Responsibility
//! - Insert the three demo circles and their six members exactly once.
//! - Abort as a whole when any insert fails; a half-seeded store must not
//!   exist.
//!
//! # Invariants
//! - Seeding requires a fully migrated connection.
//! - Re-running against a store that already holds circles is a no-op.
//! - Seeded members reference the circle ids returned at insert time,
//!   never literal ids.

use super::migrations::{current_user_version, latest_version};
use super::DbError;
use log::{info, warn};
use rusqlite::{params, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// (name, capacity, owner_id)
const SEED_CIRCLES: &[(&str, i64, i64)] = &[
    ("Circle A", 5, 1),
    ("Circle B", 8, 2),
    ("Circle C", 10, 3),
];

/// (name, grade, age, index into `SEED_CIRCLES`)
const SEED_MEMBERS: &[(&str, i64, i64, usize)] = &[
    ("Alice", 3, 21, 0),
    ("Bob", 4, 22, 1),
    ("Charlie", 4, 23, 2),
    ("David", 3, 21, 0),
    ("Eve", 1, 19, 1),
    ("Frank", 2, 20, 2),
];

const SEED_MAJOR: &str = "math";

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The fixed rows were inserted by this call.
    Applied,
    /// The store already held circles; nothing was written.
    AlreadySeeded,
}

#[derive(Debug)]
pub enum SeedError {
    /// The connection has not been migrated to the schema this binary
    /// seeds against.
    SchemaNotReady {
        expected_version: u32,
        actual_version: u32,
    },
    Db(DbError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaNotReady {
                expected_version,
                actual_version,
            } => write!(
                f,
                "cannot seed: schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SchemaNotReady { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for SeedError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Loads the fixed initial roster into a migrated store.
///
/// All inserts run in one immediate transaction: either every seed row
/// lands or none does. A store that already contains any circle is left
/// untouched and reported as [`SeedOutcome::AlreadySeeded`].
///
/// # Errors
/// - [`SeedError::SchemaNotReady`] when the connection was not opened
///   through the migration path.
/// - [`SeedError::Db`] when any insert fails; the transaction is rolled
///   back.
pub fn load_initial_roster(conn: &mut Connection) -> Result<SeedOutcome, SeedError> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(SeedError::SchemaNotReady {
            expected_version,
            actual_version,
        });
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let already_seeded: i64 =
        tx.query_row("SELECT EXISTS(SELECT 1 FROM circles);", [], |row| row.get(0))?;
    if already_seeded == 1 {
        warn!("event=seed module=db status=skipped reason=already_seeded");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut circle_ids = Vec::with_capacity(SEED_CIRCLES.len());
    for (name, capacity, owner_id) in SEED_CIRCLES {
        tx.execute(
            "INSERT INTO circles (name, capacity, owner_id) VALUES (?1, ?2, ?3);",
            params![name, capacity, owner_id],
        )?;
        circle_ids.push(tx.last_insert_rowid());
    }

    for (name, grade, age, circle_index) in SEED_MEMBERS {
        tx.execute(
            "INSERT INTO members (name, grade, circle_id, age, major)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![name, grade, circle_ids[*circle_index], age, SEED_MAJOR],
        )?;
    }

    tx.commit()?;
    info!(
        "event=seed module=db status=ok circles={} members={}",
        SEED_CIRCLES.len(),
        SEED_MEMBERS.len()
    );

    Ok(SeedOutcome::Applied)
}
