//! Aggregation queries backing the reporting endpoint.

use std::collections::BTreeMap;

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;

/// Department, origin, year-level, and status breakdowns of the student
/// body. Keys are sorted so the serialised report is deterministic.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StudentBreakdown {
    pub departments: BTreeMap<String, i64>,
    pub places: BTreeMap<String, i64>,
    pub year_levels: BTreeMap<String, i64>,
    pub statuses: BTreeMap<String, i64>,
    pub total: i64,
}

/// Aggregate the student body for reporting.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn student_breakdown(conn: &mut DbConnection) -> QueryResult<StudentBreakdown> {
    use crate::schema::students::dsl as s;
    let rows: Vec<(String, String, String, String)> = s::students
        .select((s::department, s::place, s::year_level, s::status))
        .load(conn)
        .await?;

    let mut breakdown = StudentBreakdown::default();
    for (department, place, year_level, status) in rows {
        bump(&mut breakdown.departments, department);
        bump(&mut breakdown.places, place);
        bump(&mut breakdown.year_levels, year_level);
        bump(&mut breakdown.statuses, status);
        breakdown.total += 1;
    }
    Ok(breakdown)
}

fn bump(counts: &mut BTreeMap<String, i64>, key: String) {
    let key = if key.trim().is_empty() {
        "Unspecified".to_owned()
    } else {
        key
    };
    *counts.entry(key).or_insert(0) += 1;
}
