//! Student administration endpoints: listing, search, edits, archival.

use std::sync::Arc;

use axum::{Json, extract::{Query, State}};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, wire::StudentWire};
use crate::{db, error::ApiError, models::StudentProfileUpdate};

pub async fn get_students(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let students = db::list_students(&mut conn).await?;
    let rendered: Vec<StudentWire> = students.iter().map(StudentWire::from_row).collect();
    Ok(Json(json!({
        "success": true,
        "students": rendered,
        "count": rendered.len(),
    })))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub async fn search_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let query = params.query.unwrap_or_default();
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let students = db::search_students(&mut conn, &query).await?;
    let rendered: Vec<StudentWire> = students.iter().map(StudentWire::from_row).collect();
    Ok(Json(json!({
        "success": true,
        "students": rendered,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    pub place: Option<String>,
    pub is_indigenous: Option<bool>,
    pub is_pwd: Option<bool>,
}

pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = req
        .id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidInput("Invalid student ID".to_owned()))?;
    let changes = StudentProfileUpdate {
        first_name: req.first_name.as_deref().unwrap_or(""),
        last_name: req.last_name.as_deref().unwrap_or(""),
        email: req.email.as_deref().unwrap_or(""),
        course: req.course.as_deref().unwrap_or(""),
        year_level: req.year.as_deref().unwrap_or(""),
        department: req.department.as_deref().unwrap_or(""),
        place: req.place.as_deref().unwrap_or(""),
        is_indigenous: req.is_indigenous.unwrap_or(false),
        is_pwd: req.is_pwd.unwrap_or(false),
    };
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    if !db::update_student_profile(&mut conn, id, &changes).await? {
        return Err(ApiError::NotFound("Student not found".to_owned()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Student updated successfully",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveStudentRequest {
    pub id: Option<i32>,
    pub student_id: Option<i32>,
    pub status: Option<String>,
}

pub async fn archive_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ArchiveStudentRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = req
        .id
        .or(req.student_id)
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidInput("Invalid student ID".to_owned()))?;
    let status = req.status.unwrap_or_else(|| "archived".to_owned());
    if status != "active" && status != "archived" {
        return Err(ApiError::InvalidInput(format!("Unknown status '{status}'")));
    }
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    if !db::set_student_status(&mut conn, id, &status).await? {
        return Err(ApiError::NotFound("Student not found".to_owned()));
    }
    let verb = if status == "archived" { "archived" } else { "restored" };
    Ok(Json(json!({
        "success": true,
        "message": format!("Student {verb} successfully"),
    })))
}

#[derive(Deserialize)]
pub struct DeleteStudentRequest {
    pub id: Option<i32>,
}

pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteStudentRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = req
        .id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidInput("Invalid student ID".to_owned()))?;
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    if !db::delete_student(&mut conn, id).await? {
        return Err(ApiError::NotFound("Student not found".to_owned()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Student deleted successfully",
    })))
}
