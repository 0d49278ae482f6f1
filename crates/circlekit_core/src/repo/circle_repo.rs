//! Circle repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `circles` rows plus roster reads that join in
//!   the circle's members.
//! - Own the establish-circle transaction (circle + founding owner row).
//!
//! # Invariants
//! - Deleting a circle relies on the schema cascade to remove its
//!   members; no application-level member cleanup runs.
//! - `establish_circle` is atomic: a circle never exists without its
//!   owner row, nor the reverse.

use crate::model::circle::{Circle, CircleId, NewCircle};
use crate::model::member::{Member, MemberId, NewMember};
use crate::repo::member_repo::{parse_member_row, SqliteMemberRepository};
use crate::repo::{ensure_table_shape, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};

const CIRCLE_SELECT_SQL: &str = "SELECT
    id,
    name,
    capacity,
    owner_id
FROM circles";

const CIRCLE_COLUMNS: &[&str] = &["id", "name", "capacity", "owner_id"];

/// Read model pairing a circle with its current members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleRoster {
    pub circle: Circle,
    /// Members ordered by id.
    pub members: Vec<Member>,
}

/// Query options for listing circles.
#[derive(Debug, Clone, Default)]
pub struct CircleListQuery {
    /// Restrict to circles owned by one external identity.
    pub owner_id: Option<i64>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for circle CRUD and roster reads.
pub trait CircleRepository {
    fn create_circle(&self, draft: &NewCircle) -> RepoResult<CircleId>;
    /// Creates a circle and its founding owner member in one transaction.
    ///
    /// The owner is enrolled into the new circle and the circle's
    /// `owner_id` points at the created member row.
    fn establish_circle(
        &mut self,
        name: &str,
        capacity: i64,
        owner: &NewMember,
    ) -> RepoResult<(CircleId, MemberId)>;
    fn get_circle(&self, id: CircleId) -> RepoResult<Option<Circle>>;
    fn get_roster(&self, id: CircleId) -> RepoResult<Option<CircleRoster>>;
    fn list_circles(&self, query: &CircleListQuery) -> RepoResult<Vec<Circle>>;
    fn update_circle(&self, circle: &Circle) -> RepoResult<()>;
    fn delete_circle(&self, id: CircleId) -> RepoResult<()>;
}

/// SQLite-backed circle repository.
pub struct SqliteCircleRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCircleRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let _ = SqliteMemberRepository::try_new(conn)?;
        ensure_table_shape(conn, "circles", CIRCLE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CircleRepository for SqliteCircleRepository<'_> {
    fn create_circle(&self, draft: &NewCircle) -> RepoResult<CircleId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO circles (name, capacity, owner_id) VALUES (?1, ?2, ?3);",
            params![draft.name.as_str(), draft.capacity, draft.owner_id],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn establish_circle(
        &mut self,
        name: &str,
        capacity: i64,
        owner: &NewMember,
    ) -> RepoResult<(CircleId, MemberId)> {
        let circle_draft = NewCircle::new(name, capacity, 0);
        circle_draft.validate()?;
        owner.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // owner_id is not known until the owner row exists; insert with a
        // placeholder and patch it before commit.
        tx.execute(
            "INSERT INTO circles (name, capacity, owner_id) VALUES (?1, ?2, 0);",
            params![circle_draft.name.as_str(), circle_draft.capacity],
        )?;
        let circle_id = tx.last_insert_rowid();

        // Same omitted-column rule as the member repository: absent
        // age/major fall to the schema defaults.
        let mut columns = vec!["name", "grade", "circle_id"];
        let mut bind_values: Vec<Value> = vec![
            Value::Text(owner.name.clone()),
            Value::Integer(owner.grade),
            Value::Integer(circle_id),
        ];
        if let Some(age) = owner.age {
            columns.push("age");
            bind_values.push(Value::Integer(age));
        }
        if let Some(major) = owner.major.as_deref() {
            columns.push("major");
            bind_values.push(Value::Text(major.to_string()));
        }
        let placeholders = (1..=columns.len())
            .map(|position| format!("?{position}"))
            .collect::<Vec<_>>()
            .join(", ");
        tx.execute(
            &format!(
                "INSERT INTO members ({}) VALUES ({});",
                columns.join(", "),
                placeholders
            ),
            params_from_iter(bind_values),
        )?;
        let owner_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE circles SET owner_id = ?1 WHERE id = ?2;",
            params![owner_id, circle_id],
        )?;

        tx.commit()?;
        Ok((circle_id, owner_id))
    }

    fn get_circle(&self, id: CircleId) -> RepoResult<Option<Circle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CIRCLE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_circle_row(row)?));
        }

        Ok(None)
    }

    fn get_roster(&self, id: CircleId) -> RepoResult<Option<CircleRoster>> {
        let circle = match self.get_circle(id)? {
            Some(circle) => circle,
            None => return Ok(None),
        };

        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                name,
                grade,
                circle_id,
                age,
                major
             FROM members
             WHERE circle_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(Some(CircleRoster { circle, members }))
    }

    fn list_circles(&self, query: &CircleListQuery) -> RepoResult<Vec<Circle>> {
        let mut sql = format!("{CIRCLE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(owner_id) = query.owner_id {
            sql.push_str(" AND owner_id = ?");
            bind_values.push(Value::Integer(owner_id));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut circles = Vec::new();

        while let Some(row) = rows.next()? {
            circles.push(parse_circle_row(row)?);
        }

        Ok(circles)
    }

    fn update_circle(&self, circle: &Circle) -> RepoResult<()> {
        circle.validate()?;

        let changed = self.conn.execute(
            "UPDATE circles
             SET
                name = ?1,
                capacity = ?2,
                owner_id = ?3
             WHERE id = ?4;",
            params![
                circle.name.as_str(),
                circle.capacity,
                circle.owner_id,
                circle.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CircleNotFound(circle.id));
        }

        Ok(())
    }

    fn delete_circle(&self, id: CircleId) -> RepoResult<()> {
        // Dependent members fall to the ON DELETE CASCADE rule.
        let changed = self
            .conn
            .execute("DELETE FROM circles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::CircleNotFound(id));
        }

        Ok(())
    }
}

fn parse_circle_row(row: &Row<'_>) -> RepoResult<Circle> {
    let circle = Circle {
        id: row.get("id")?,
        name: row.get("name")?,
        capacity: row.get("capacity")?,
        owner_id: row.get("owner_id")?,
    };
    circle.validate().map_err(|err| {
        RepoError::InvalidData(format!("circle row {}: {err}", circle.id))
    })?;
    Ok(circle)
}
