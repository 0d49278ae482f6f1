//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `circlekit_core` linkage.
//! - Run the full provision sequence (open, migrate, seed) against an
//!   in-memory store and print a deterministic summary.

use circlekit_core::db::open_db_in_memory;
use circlekit_core::{
    load_initial_roster, CircleListQuery, CircleRepository, SqliteCircleRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("circlekit_core ping={}", circlekit_core::ping());
    println!("circlekit_core version={}", circlekit_core::core_version());

    let mut conn = open_db_in_memory()?;
    let outcome = load_initial_roster(&mut conn)?;

    let repo = SqliteCircleRepository::try_new(&mut conn)?;
    let circles = repo.list_circles(&CircleListQuery::default())?;
    let mut member_total = 0;
    for circle in &circles {
        if let Some(roster) = repo.get_roster(circle.id)? {
            member_total += roster.members.len();
        }
    }

    println!(
        "seed outcome={outcome:?} circles={} members={member_total}",
        circles.len()
    );
    Ok(())
}
