//! Direct messaging endpoints between administrators and students.

use std::sync::Arc;

use axum::{Json, extract::{Query, State}};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, wire::MessageWire};
use crate::{
    db::{self, Participant},
    error::ApiError,
    models::NewMessage,
};

const ROLES: [&str; 2] = ["admin", "student"];

fn validate_role(role: &str) -> Result<&str, ApiError> {
    if ROLES.contains(&role) {
        Ok(role)
    } else {
        Err(ApiError::InvalidInput(format!("Unknown role '{role}'")))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesQuery {
    pub user_id: Option<i32>,
    pub user_type: Option<String>,
    pub receiver_id: Option<i32>,
    pub receiver_type: Option<String>,
}

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetMessagesQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = query.user_id.unwrap_or(0);
    let user_role = query.user_type.unwrap_or_default();
    if user_id <= 0 || user_role.is_empty() {
        // the client polls before login settles; answer with an empty list
        return Ok(Json(json!({ "success": true, "messages": [] })));
    }
    let user = Participant {
        id: user_id,
        role: validate_role(&user_role)?,
    };

    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let receiver_id = query.receiver_id.unwrap_or(0);
    let rows = if receiver_id > 0 {
        let receiver_role = query
            .receiver_type
            .as_deref()
            .map(validate_role)
            .transpose()?
            .ok_or_else(|| ApiError::InvalidInput("Missing receiver type".to_owned()))?;
        let peer = Participant {
            id: receiver_id,
            role: receiver_role,
        };
        db::conversation(&mut conn, user, peer).await?
    } else {
        db::messages_for_participant(&mut conn, user).await?
    };

    let rendered: Vec<MessageWire> = rows.iter().map(MessageWire::from_row).collect();
    Ok(Json(json!({
        "success": true,
        "messages": rendered,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessageRequest {
    pub sender_id: Option<i32>,
    pub receiver_id: Option<i32>,
    pub sender_type: Option<String>,
    pub receiver_type: Option<String>,
    pub content: Option<String>,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
}

pub async fn save_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveMessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let sender_id = req
        .sender_id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidInput("Invalid sender ID".to_owned()))?;
    let receiver_id = req
        .receiver_id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidInput("Invalid receiver ID".to_owned()))?;
    let sender_role = req
        .sender_type
        .as_deref()
        .map(validate_role)
        .transpose()?
        .ok_or_else(|| ApiError::InvalidInput("Missing sender type".to_owned()))?;
    let receiver_role = req
        .receiver_type
        .as_deref()
        .map(validate_role)
        .transpose()?
        .ok_or_else(|| ApiError::InvalidInput("Missing receiver type".to_owned()))?;
    let content = req.content.as_deref().map(str::trim).unwrap_or("");
    if content.is_empty() && req.attachment.is_none() {
        return Err(ApiError::InvalidInput("Message content is required".to_owned()));
    }

    let message = NewMessage {
        sender_id,
        sender_role,
        receiver_id,
        receiver_role,
        content,
        attachment: req.attachment.as_deref(),
        attachment_name: req.attachment_name.as_deref(),
        read_status: false,
        created_at: Utc::now().naive_utc(),
    };
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let id = db::create_message(&mut conn, &message).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Message saved successfully",
        "id": id,
    })))
}
