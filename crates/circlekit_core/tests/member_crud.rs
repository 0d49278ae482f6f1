use circlekit_core::db::migrations::latest_version;
use circlekit_core::db::open_db_in_memory;
use circlekit_core::{
    CircleRepository, MemberListQuery, MemberRepository, MemberService, NewCircle, NewMember,
    RepoError, SqliteCircleRepository, SqliteMemberRepository,
};
use rusqlite::Connection;

fn circle_fixture(conn: &mut Connection, name: &str) -> i64 {
    let repo = SqliteCircleRepository::try_new(conn).unwrap();
    repo.create_circle(&NewCircle::new(name, 10, 1)).unwrap()
}

#[test]
fn create_without_age_or_major_applies_storage_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let id = repo.create_member(&NewMember::new("Grace", 2)).unwrap();

    let loaded = repo.get_member(id).unwrap().unwrap();
    assert_eq!(loaded.age, 20);
    assert_eq!(loaded.major, "other");
    assert_eq!(loaded.circle_id, None);
    assert!(!loaded.is_affiliated());
}

#[test]
fn create_with_explicit_fields_roundtrips() {
    let mut conn = open_db_in_memory().unwrap();
    let circle_id = circle_fixture(&mut conn, "Circle X");
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut draft = NewMember::new("Heidi", 4);
    draft.circle_id = Some(circle_id);
    draft.age = Some(23);
    draft.major = Some("physics".to_string());
    let id = repo.create_member(&draft).unwrap();

    let loaded = repo.get_member(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Heidi");
    assert_eq!(loaded.grade, 4);
    assert_eq!(loaded.circle_id, Some(circle_id));
    assert_eq!(loaded.age, 23);
    assert_eq!(loaded.major, "physics");
}

#[test]
fn create_with_dangling_circle_reference_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut draft = NewMember::new("Ivan", 1);
    draft.circle_id = Some(99);
    let err = repo.create_member(&draft).unwrap_err();
    assert!(matches!(err, RepoError::UnknownCircle(99)));
}

#[test]
fn update_with_dangling_circle_reference_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let id = repo.create_member(&NewMember::new("Judy", 2)).unwrap();
    let mut member = repo.get_member(id).unwrap().unwrap();
    member.circle_id = Some(99);

    let err = repo.update_member(&member).unwrap_err();
    assert!(matches!(err, RepoError::UnknownCircle(99)));
}

#[test]
fn update_not_found_returns_member_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let member = circlekit_core::Member {
        id: 404,
        name: "Ghost".to_string(),
        grade: 1,
        circle_id: None,
        age: 20,
        major: "other".to_string(),
    };
    let err = repo.update_member(&member).unwrap_err();
    assert!(matches!(err, RepoError::MemberNotFound(404)));
}

#[test]
fn delete_is_hard_and_not_repeatable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let id = repo.create_member(&NewMember::new("Mallory", 3)).unwrap();
    repo.delete_member(id).unwrap();

    assert!(repo.get_member(id).unwrap().is_none());
    let err = repo.delete_member(id).unwrap_err();
    assert!(matches!(err, RepoError::MemberNotFound(_)));
}

#[test]
fn list_filters_by_circle() {
    let mut conn = open_db_in_memory().unwrap();
    let circle_a = circle_fixture(&mut conn, "Circle A");
    let circle_b = circle_fixture(&mut conn, "Circle B");
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut in_a = NewMember::new("Alice", 3);
    in_a.circle_id = Some(circle_a);
    let mut in_b = NewMember::new("Bob", 4);
    in_b.circle_id = Some(circle_b);
    let unaffiliated = NewMember::new("Carol", 2);
    let alice_id = repo.create_member(&in_a).unwrap();
    repo.create_member(&in_b).unwrap();
    repo.create_member(&unaffiliated).unwrap();

    let query = MemberListQuery {
        circle_id: Some(circle_a),
        ..MemberListQuery::default()
    };
    let members = repo.list_members(&query).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, alice_id);

    let everyone = repo.list_members(&MemberListQuery::default()).unwrap();
    assert_eq!(everyone.len(), 3);
}

#[test]
fn list_pagination_with_limit_and_offset_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let first = repo.create_member(&NewMember::new("One", 1)).unwrap();
    let second = repo.create_member(&NewMember::new("Two", 1)).unwrap();
    let third = repo.create_member(&NewMember::new("Three", 1)).unwrap();
    assert!(first < second && second < third);

    let query = MemberListQuery {
        limit: Some(2),
        offset: 1,
        ..MemberListQuery::default()
    };
    let page = repo.list_members(&query).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, second);
    assert_eq!(page[1].id, third);

    let offset_only = MemberListQuery {
        offset: 2,
        ..MemberListQuery::default()
    };
    let tail = repo.list_members(&offset_only).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, third);
}

#[test]
fn service_enroll_returns_stored_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let service = MemberService::new(repo);

    let member = service.enroll(&NewMember::new("Peggy", 2)).unwrap();
    assert_eq!(member.age, 20);
    assert_eq!(member.major, "other");
}

#[test]
fn service_transfer_moves_member_between_circles_and_out() {
    let mut conn = open_db_in_memory().unwrap();
    let circle_a = circle_fixture(&mut conn, "Circle A");
    let circle_b = circle_fixture(&mut conn, "Circle B");
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let service = MemberService::new(repo);

    let mut draft = NewMember::new("Trent", 3);
    draft.circle_id = Some(circle_a);
    let member = service.enroll(&draft).unwrap();

    let moved = service.transfer(member.id, Some(circle_b)).unwrap();
    assert_eq!(moved.circle_id, Some(circle_b));

    let out = service.transfer(member.id, None).unwrap();
    assert_eq!(out.circle_id, None);

    let roster_a = service.roster(circle_a).unwrap();
    assert!(roster_a.is_empty());
}

#[test]
fn service_withdraw_removes_member() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let service = MemberService::new(repo);

    let member = service.enroll(&NewMember::new("Walter", 1)).unwrap();
    service.withdraw(member.id).unwrap();
    assert!(service.get(member.id).unwrap().is_none());
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let err = repo.create_member(&NewMember::new("  ", 2)).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo.create_member(&NewMember::new("Zero", 0)).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn repository_rejects_connection_without_members_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMemberRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("members"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_member_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            grade INTEGER NOT NULL,
            circle_id INTEGER
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMemberRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "members",
            column: "age"
        })
    ));
}
