//! Post engagement endpoint: like, share, comment.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, wire::CommentWire};
use crate::{compat, db, error::ApiError, models::NewComment};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    pub post_id: Option<i32>,
    pub action: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
}

pub async fn update_post_engagement(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EngagementRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(post_id), Some(action)) = (req.post_id, req.action.as_deref()) else {
        return Err(ApiError::InvalidInput("Missing required parameters".to_owned()));
    };
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    match action {
        "like" => {
            let likes = db::increment_likes(&mut conn, post_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Post not found".to_owned()))?;
            Ok(Json(json!({
                "success": true,
                "message": "Like added",
                "likes": likes,
            })))
        }
        "share" => {
            let shares = db::increment_shares(&mut conn, post_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Post not found".to_owned()))?;
            Ok(Json(json!({
                "success": true,
                "message": "Share recorded",
                "shares": shares,
            })))
        }
        "comment" => {
            let text = req
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ApiError::InvalidInput("Missing comment text".to_owned()))?;
            let post = db::get_post(&mut conn, post_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Post not found".to_owned()))?;

            let new_comment = NewComment {
                post_id,
                author: req.author.as_deref().unwrap_or("User"),
                content: text,
                created_at: Utc::now().naive_utc(),
            };
            let stored = db::add_comment(&mut conn, &new_comment).await?;
            let legacy_count =
                compat::decode_legacy_comments(post.legacy_comments.as_deref()).count();
            let stored_count = db::count_comments(&mut conn, post_id).await?;
            Ok(Json(json!({
                "success": true,
                "message": "Comment added",
                "comments_count": legacy_count + stored_count,
                "comment": CommentWire::from_row(&stored),
            })))
        }
        _ => Err(ApiError::InvalidAction),
    }
}
