//! Helper for retrieving `SQLite` row ids after an insert.

use diesel::result::QueryResult;
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;

/// Fetch the last inserted row id on the current connection.
pub async fn fetch_last_insert_rowid(conn: &mut DbConnection) -> QueryResult<i32> {
    use diesel::sql_types::Integer;
    diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
        .get_result(conn)
        .await
}
