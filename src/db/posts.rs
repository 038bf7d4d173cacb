//! Announcement post and engagement helpers.
//!
//! Engagement counters mutate through in-database increments and comments
//! live in an append-only child table, so concurrent engagement on one
//! post cannot lose updates.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::{connection::DbConnection, insert::fetch_last_insert_rowid};
use crate::models::{Comment, NewComment, NewPost, Post};

/// Insert a new post and return the generated row id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_post(conn: &mut DbConnection, post: &NewPost<'_>) -> QueryResult<i32> {
    use crate::schema::posts::dsl::posts;
    diesel::insert_into(posts).values(post).execute(conn).await?;
    fetch_last_insert_rowid(conn).await
}

/// Look up a post by primary key.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_post(conn: &mut DbConnection, pid: i32) -> QueryResult<Option<Post>> {
    use crate::schema::posts::dsl as p;
    p::posts.filter(p::id.eq(pid)).first::<Post>(conn).await.optional()
}

/// Load posts, optionally restricted to one audience.
///
/// Rows come back in id order; callers sort by the effective creation
/// instant once legacy timestamps have been resolved.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_posts(
    conn: &mut DbConnection,
    audience_filter: Option<&str>,
) -> QueryResult<Vec<Post>> {
    use crate::schema::posts::dsl as p;
    let mut query = p::posts.into_boxed();
    if let Some(aud) = audience_filter {
        query = query.filter(p::audience.eq(aud.to_owned()));
    }
    query.order(p::id.desc()).load::<Post>(conn).await
}

/// Load the comments for a set of posts, oldest first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn comments_for_posts(
    conn: &mut DbConnection,
    post_ids: &[i32],
) -> QueryResult<Vec<Comment>> {
    use crate::schema::post_comments::dsl as c;
    c::post_comments
        .filter(c::post_id.eq_any(post_ids.to_vec()))
        .order(c::id.asc())
        .load::<Comment>(conn)
        .await
}

/// Count the stored comments for one post.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn count_comments(conn: &mut DbConnection, pid: i32) -> QueryResult<i64> {
    use crate::schema::post_comments::dsl as c;
    c::post_comments
        .filter(c::post_id.eq(pid))
        .count()
        .get_result(conn)
        .await
}

/// Atomically bump a post's like counter and return the new value.
///
/// Returns `None` when the post does not exist.
///
/// # Errors
/// Returns any error produced by the update or read-back query.
#[must_use = "handle the result"]
pub async fn increment_likes(conn: &mut DbConnection, pid: i32) -> QueryResult<Option<i32>> {
    use crate::schema::posts::dsl as p;
    let updated = diesel::update(p::posts.filter(p::id.eq(pid)))
        .set(p::likes.eq(p::likes + 1))
        .execute(conn)
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    p::posts
        .filter(p::id.eq(pid))
        .select(p::likes)
        .first::<i32>(conn)
        .await
        .map(Some)
}

/// Atomically bump a post's share counter and return the new value.
///
/// Returns `None` when the post does not exist.
///
/// # Errors
/// Returns any error produced by the update or read-back query.
#[must_use = "handle the result"]
pub async fn increment_shares(conn: &mut DbConnection, pid: i32) -> QueryResult<Option<i32>> {
    use crate::schema::posts::dsl as p;
    let updated = diesel::update(p::posts.filter(p::id.eq(pid)))
        .set(p::shares.eq(p::shares + 1))
        .execute(conn)
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    p::posts
        .filter(p::id.eq(pid))
        .select(p::shares)
        .first::<i32>(conn)
        .await
        .map(Some)
}

/// Append one comment and return the stored row.
///
/// # Errors
/// Returns any error produced by the insertion or read-back query.
#[must_use = "handle the result"]
pub async fn add_comment(
    conn: &mut DbConnection,
    comment: &NewComment<'_>,
) -> QueryResult<Comment> {
    use crate::schema::post_comments::dsl as c;
    diesel::insert_into(c::post_comments)
        .values(comment)
        .execute(conn)
        .await?;
    let rowid = fetch_last_insert_rowid(conn).await?;
    c::post_comments
        .filter(c::id.eq(rowid))
        .first::<Comment>(conn)
        .await
}

/// Hard-delete a post together with its comments.
///
/// Returns `false` when the post does not exist. The comment delete runs
/// in the same transaction so an interrupted delete cannot orphan rows.
///
/// # Errors
/// Returns any error produced by the delete queries.
#[must_use = "handle the result"]
pub async fn delete_post(conn: &mut DbConnection, pid: i32) -> QueryResult<bool> {
    conn.transaction::<bool, diesel::result::Error, _>(|conn| {
        Box::pin(async move {
            use crate::schema::{post_comments::dsl as c, posts::dsl as p};
            diesel::delete(c::post_comments.filter(c::post_id.eq(pid)))
                .execute(conn)
                .await?;
            let deleted = diesel::delete(p::posts.filter(p::id.eq(pid)))
                .execute(conn)
                .await?;
            Ok(deleted > 0)
        })
    })
    .await
}
