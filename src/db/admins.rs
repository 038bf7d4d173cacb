//! Administrator credential helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;

/// Look up an administrator record by email.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_admin_by_email(
    conn: &mut DbConnection,
    addr: &str,
) -> QueryResult<Option<crate::models::Admin>> {
    use crate::schema::admins::dsl::{admins, email};
    admins
        .filter(email.eq(addr))
        .first::<crate::models::Admin>(conn)
        .await
        .optional()
}

/// Insert a new administrator record.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_admin(
    conn: &mut DbConnection,
    admin: &crate::models::NewAdmin<'_>,
) -> QueryResult<usize> {
    use crate::schema::admins::dsl::admins;
    diesel::insert_into(admins).values(admin).execute(conn).await
}

/// Replace an administrator's stored password hash.
///
/// Returns `false` when no administrator matches the email.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_admin_password(
    conn: &mut DbConnection,
    addr: &str,
    password_hash: &str,
) -> QueryResult<bool> {
    use crate::schema::admins::dsl::{admins, email, password};
    let updated = diesel::update(admins.filter(email.eq(addr)))
        .set(password.eq(password_hash))
        .execute(conn)
        .await?;
    Ok(updated > 0)
}
