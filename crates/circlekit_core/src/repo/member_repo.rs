//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `members` rows.
//! - Keep omitted draft fields out of the INSERT column list so the
//!   schema defaults (`age`, `major`) take effect.
//!
//! # Invariants
//! - Write paths validate the model before SQL mutations.
//! - A write naming a nonexistent circle surfaces `UnknownCircle`, not a
//!   raw constraint error.
//! - Deletes are hard deletes; the roster keeps no tombstones.

use crate::model::circle::CircleId;
use crate::model::member::{Member, MemberId, NewMember};
use crate::repo::{
    ensure_schema_version, ensure_table_shape, is_foreign_key_violation, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MEMBER_SELECT_SQL: &str = "SELECT
    id,
    name,
    grade,
    circle_id,
    age,
    major
FROM members";

pub(crate) const MEMBER_COLUMNS: &[&str] = &["id", "name", "grade", "circle_id", "age", "major"];

/// Query options for listing members.
#[derive(Debug, Clone, Default)]
pub struct MemberListQuery {
    /// Restrict to members of one circle.
    pub circle_id: Option<CircleId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for member CRUD operations.
pub trait MemberRepository {
    fn create_member(&self, draft: &NewMember) -> RepoResult<MemberId>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    fn list_members(&self, query: &MemberListQuery) -> RepoResult<Vec<Member>>;
    fn update_member(&self, member: &Member) -> RepoResult<()>;
    fn delete_member(&self, id: MemberId) -> RepoResult<()>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_table_shape(conn, "members", MEMBER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, draft: &NewMember) -> RepoResult<MemberId> {
        draft.validate()?;

        // Omitted age/major stay out of the column list so the schema
        // defaults (20, 'other') apply.
        let mut columns = vec!["name", "grade", "circle_id"];
        let mut bind_values: Vec<Value> = vec![
            Value::Text(draft.name.clone()),
            Value::Integer(draft.grade),
            match draft.circle_id {
                Some(circle_id) => Value::Integer(circle_id),
                None => Value::Null,
            },
        ];

        if let Some(age) = draft.age {
            columns.push("age");
            bind_values.push(Value::Integer(age));
        }
        if let Some(major) = draft.major.as_deref() {
            columns.push("major");
            bind_values.push(Value::Text(major.to_string()));
        }

        let placeholders = (1..=columns.len())
            .map(|position| format!("?{position}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO members ({}) VALUES ({});",
            columns.join(", "),
            placeholders
        );

        match self.conn.execute(&sql, params_from_iter(bind_values)) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) => Err(map_member_write_error(err, draft.circle_id)),
        }
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }

        Ok(None)
    }

    fn list_members(&self, query: &MemberListQuery) -> RepoResult<Vec<Member>> {
        let mut sql = format!("{MEMBER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(circle_id) = query.circle_id {
            sql.push_str(" AND circle_id = ?");
            bind_values.push(Value::Integer(circle_id));
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
        let mut members = Vec::new();

        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }

    fn update_member(&self, member: &Member) -> RepoResult<()> {
        member.validate()?;

        let result = self.conn.execute(
            "UPDATE members
             SET
                name = ?1,
                grade = ?2,
                circle_id = ?3,
                age = ?4,
                major = ?5
             WHERE id = ?6;",
            params![
                member.name.as_str(),
                member.grade,
                member.circle_id,
                member.age,
                member.major.as_str(),
                member.id,
            ],
        );

        match result {
            Ok(0) => Err(RepoError::MemberNotFound(member.id)),
            Ok(_) => Ok(()),
            Err(err) => Err(map_member_write_error(err, member.circle_id)),
        }
    }

    fn delete_member(&self, id: MemberId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM members WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::MemberNotFound(id));
        }

        Ok(())
    }
}

fn map_member_write_error(err: rusqlite::Error, circle_id: Option<CircleId>) -> RepoError {
    match (circle_id, is_foreign_key_violation(&err)) {
        (Some(circle_id), true) => RepoError::UnknownCircle(circle_id),
        _ => err.into(),
    }
}

pub(crate) fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let member = Member {
        id: row.get("id")?,
        name: row.get("name")?,
        grade: row.get("grade")?,
        circle_id: row.get("circle_id")?,
        age: row.get("age")?,
        major: row.get("major")?,
    };
    member.validate().map_err(|err| {
        RepoError::InvalidData(format!("member row {}: {err}", member.id))
    })?;
    Ok(member)
}
