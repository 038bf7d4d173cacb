//! Direct-message helpers.
//!
//! A conversation is the set of messages whose (sender, receiver) pair
//! matches either ordering of a given pair of participants; roles
//! disambiguate admin and student ids drawn from separate tables.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::{connection::DbConnection, insert::fetch_last_insert_rowid};
use crate::models::{Message, NewMessage};

/// One side of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant<'a> {
    pub id: i32,
    pub role: &'a str,
}

/// Insert a new message and return the generated row id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_message(
    conn: &mut DbConnection,
    message: &NewMessage<'_>,
) -> QueryResult<i32> {
    use crate::schema::messages::dsl::messages;
    diesel::insert_into(messages)
        .values(message)
        .execute(conn)
        .await?;
    fetch_last_insert_rowid(conn).await
}

/// Load the conversation between two participants, oldest first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn conversation(
    conn: &mut DbConnection,
    user: Participant<'_>,
    peer: Participant<'_>,
) -> QueryResult<Vec<Message>> {
    use crate::schema::messages::dsl as m;
    let outbound = m::sender_id
        .eq(user.id)
        .and(m::sender_role.eq(user.role.to_owned()))
        .and(m::receiver_id.eq(peer.id))
        .and(m::receiver_role.eq(peer.role.to_owned()));
    let inbound = m::sender_id
        .eq(peer.id)
        .and(m::sender_role.eq(peer.role.to_owned()))
        .and(m::receiver_id.eq(user.id))
        .and(m::receiver_role.eq(user.role.to_owned()));
    m::messages
        .filter(outbound.or(inbound))
        .order(m::created_at.asc())
        .load::<Message>(conn)
        .await
}

/// Load every message a participant has sent or received, oldest first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn messages_for_participant(
    conn: &mut DbConnection,
    user: Participant<'_>,
) -> QueryResult<Vec<Message>> {
    use crate::schema::messages::dsl as m;
    let sent = m::sender_id
        .eq(user.id)
        .and(m::sender_role.eq(user.role.to_owned()));
    let received = m::receiver_id
        .eq(user.id)
        .and(m::receiver_role.eq(user.role.to_owned()));
    m::messages
        .filter(sent.or(received))
        .order(m::created_at.asc())
        .load::<Message>(conn)
        .await
}
