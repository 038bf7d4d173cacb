//! Announcement feed endpoints: create, list, delete.

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::{Query, State}};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, wire};
use crate::{db, error::ApiError, models::NewPost};

const POST_KINDS: [&str; 4] = ["text", "media", "live", "feeling"];
const AUDIENCES: [&str; 3] = ["home", "students", "specific"];

#[derive(Deserialize)]
pub struct SavePostRequest {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub audience: Option<String>,
    pub course: Option<String>,
    pub layout: Option<String>,
    pub images: Option<Value>,
}

/// Accept a single reference or a list, the way the old client sent both.
fn images_to_json(images: Option<Value>) -> Result<Option<String>, ApiError> {
    let Some(images) = images else {
        return Ok(None);
    };
    let list: Vec<String> = match images {
        Value::Null => return Ok(None),
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(single) => vec![single],
        other => vec![other.to_string()],
    };
    if list.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(&list)
        .map(Some)
        .map_err(ApiError::internal)
}

pub async fn save_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePostRequest>,
) -> Result<Json<Value>, ApiError> {
    let kind = req.kind.unwrap_or_else(|| "text".to_owned());
    if !POST_KINDS.contains(&kind.as_str()) {
        return Err(ApiError::InvalidInput(format!("Unknown post type '{kind}'")));
    }
    let audience = req.audience.unwrap_or_else(|| "students".to_owned());
    if !AUDIENCES.contains(&audience.as_str()) {
        return Err(ApiError::InvalidInput(format!("Unknown audience '{audience}'")));
    }
    let images_json = images_to_json(req.images)?;

    let new_post = NewPost {
        content: req.content.as_deref().unwrap_or(""),
        kind: &kind,
        audience: &audience,
        course: req.course.as_deref(),
        layout: req.layout.as_deref().unwrap_or("image-left"),
        images: images_json.as_deref(),
        author: "Administrator",
        likes: 0,
        shares: 0,
        created_at: Some(Utc::now().naive_utc()),
    };
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let id = db::create_post(&mut conn, &new_post).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Post saved successfully",
        "id": id,
    })))
}

#[derive(Deserialize)]
pub struct GetPostsQuery {
    pub audience: Option<String>,
}

pub async fn get_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetPostsQuery>,
) -> Result<Json<Value>, ApiError> {
    let audience = query.audience.filter(|aud| !aud.is_empty());
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let posts = db::list_posts(&mut conn, audience.as_deref()).await?;

    let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
    let mut grouped: HashMap<i32, Vec<crate::models::Comment>> = HashMap::new();
    for comment in db::comments_for_posts(&mut conn, &ids).await? {
        grouped.entry(comment.post_id).or_default().push(comment);
    }

    let mut entries: Vec<_> = posts
        .into_iter()
        .map(|post| {
            let instant = wire::post_instant(&post);
            let comments = grouped.remove(&post.id).unwrap_or_default();
            (instant, wire::post_to_wire(post, &comments))
        })
        .collect();
    // stable sort keeps the id-descending tie-break from the query
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    let rendered: Vec<_> = entries.into_iter().map(|(_, rendered)| rendered).collect();

    Ok(Json(json!({
        "success": true,
        "posts": rendered,
        "count": rendered.len(),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostRequest {
    pub post_id: Option<i32>,
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeletePostRequest>,
) -> Result<Json<Value>, ApiError> {
    let post_id = req
        .post_id
        .ok_or_else(|| ApiError::InvalidInput("Missing post ID".to_owned()))?;
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    if !db::delete_post(&mut conn, post_id).await? {
        return Err(ApiError::NotFound("Post not found".to_owned()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}
