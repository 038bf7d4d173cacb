//! Student record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::{connection::DbConnection, insert::fetch_last_insert_rowid};
use crate::models::{NewStudent, Student, StudentProfileUpdate};

/// Which uniqueness invariant a prospective registration would violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    StudentId,
    AwardNumber,
}

/// Check the registration uniqueness invariants before an insert.
///
/// The database carries unique indexes as a backstop; this pre-check
/// exists so callers can report which field collided.
///
/// # Errors
/// Returns any error produced by the lookup queries.
#[must_use = "handle the result"]
pub async fn find_duplicate_field(
    conn: &mut DbConnection,
    email_value: &str,
    student_id_value: &str,
    award_number_value: &str,
) -> QueryResult<Option<DuplicateField>> {
    use crate::schema::students::dsl as s;
    let email_hit = s::students
        .filter(s::email.eq(email_value))
        .select(s::id)
        .first::<i32>(conn)
        .await
        .optional()?;
    if email_hit.is_some() {
        return Ok(Some(DuplicateField::Email));
    }
    let student_id_hit = s::students
        .filter(s::student_id.eq(student_id_value))
        .select(s::id)
        .first::<i32>(conn)
        .await
        .optional()?;
    if student_id_hit.is_some() {
        return Ok(Some(DuplicateField::StudentId));
    }
    if !award_number_value.is_empty() {
        let award_hit = s::students
            .filter(s::award_number.eq(award_number_value))
            .select(s::id)
            .first::<i32>(conn)
            .await
            .optional()?;
        if award_hit.is_some() {
            return Ok(Some(DuplicateField::AwardNumber));
        }
    }
    Ok(None)
}

/// Insert a new student and return the generated row id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_student(
    conn: &mut DbConnection,
    student: &NewStudent<'_>,
) -> QueryResult<i32> {
    use crate::schema::students::dsl::students;
    diesel::insert_into(students)
        .values(student)
        .execute(conn)
        .await?;
    fetch_last_insert_rowid(conn).await
}

/// List all students, newest registration first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_students(conn: &mut DbConnection) -> QueryResult<Vec<Student>> {
    use crate::schema::students::dsl as s;
    s::students.order(s::id.desc()).load::<Student>(conn).await
}

/// Search students across name, email, institutional id, and award number.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn search_students(conn: &mut DbConnection, query: &str) -> QueryResult<Vec<Student>> {
    use crate::schema::students::dsl as s;
    let term = format!("%{query}%");
    s::students
        .filter(
            s::first_name
                .like(term.clone())
                .or(s::last_name.like(term.clone()))
                .or(s::email.like(term.clone()))
                .or(s::student_id.like(term.clone()))
                .or(s::award_number.like(term)),
        )
        .order(s::id.desc())
        .load::<Student>(conn)
        .await
}

/// Look up a student by primary key.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_student(conn: &mut DbConnection, sid: i32) -> QueryResult<Option<Student>> {
    use crate::schema::students::dsl as s;
    s::students
        .filter(s::id.eq(sid))
        .first::<Student>(conn)
        .await
        .optional()
}

/// Look up a student by email, institutional id, or award number.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn find_student_by_identifier(
    conn: &mut DbConnection,
    identifier: &str,
) -> QueryResult<Option<Student>> {
    use crate::schema::students::dsl as s;
    s::students
        .filter(
            s::email
                .eq(identifier)
                .or(s::student_id.eq(identifier))
                .or(s::award_number.eq(identifier)),
        )
        .first::<Student>(conn)
        .await
        .optional()
}

/// Apply an administrator's profile edit.
///
/// Returns `false` when the student does not exist.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn update_student_profile(
    conn: &mut DbConnection,
    sid: i32,
    changes: &StudentProfileUpdate<'_>,
) -> QueryResult<bool> {
    use crate::schema::students::dsl as s;
    let updated = diesel::update(s::students.filter(s::id.eq(sid)))
        .set(changes)
        .execute(conn)
        .await?;
    Ok(updated > 0)
}

/// Flip a student between `active` and `archived`.
///
/// Returns `false` when the student does not exist.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_student_status(
    conn: &mut DbConnection,
    sid: i32,
    new_status: &str,
) -> QueryResult<bool> {
    use crate::schema::students::dsl as s;
    let updated = diesel::update(s::students.filter(s::id.eq(sid)))
        .set(s::status.eq(new_status))
        .execute(conn)
        .await?;
    Ok(updated > 0)
}

/// Replace a student's stored password hash.
///
/// Returns `false` when the student does not exist.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_student_password(
    conn: &mut DbConnection,
    sid: i32,
    password_hash: &str,
) -> QueryResult<bool> {
    use crate::schema::students::dsl as s;
    let updated = diesel::update(s::students.filter(s::id.eq(sid)))
        .set(s::password.eq(password_hash))
        .execute(conn)
        .await?;
    Ok(updated > 0)
}

/// Hard-delete a student record.
///
/// Returns `false` when the student does not exist.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_student(conn: &mut DbConnection, sid: i32) -> QueryResult<bool> {
    use crate::schema::students::dsl as s;
    let deleted = diesel::delete(s::students.filter(s::id.eq(sid)))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}
