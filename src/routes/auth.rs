//! Authentication and credential endpoints.
//!
//! Passwords are stored and compared as Argon2id hashes; the previous
//! portal's plaintext comparison was a defect, not a contract.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, wire::StudentProfileWire};
use crate::{
    db::{self, DuplicateField},
    error::ApiError,
    models::NewStudent,
    passwords::{hash_password, verify_password},
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub role: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub identifier: Option<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let password = req
        .password
        .as_deref()
        .ok_or_else(|| ApiError::InvalidInput("Missing password".to_owned()))?;
    match req.role.as_deref() {
        Some("admin") => {
            let email = required(&req.email, "email")?;
            let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
            let admin = db::get_admin_by_email(&mut conn, email)
                .await?
                .ok_or_else(|| ApiError::NotFound("Admin not found".to_owned()))?;
            if !verify_password(&admin.password, password) {
                return Err(ApiError::Unauthorized("Invalid password".to_owned()));
            }
            Ok(Json(json!({
                "success": true,
                "user": {
                    "id": "admin",
                    "name": "Administrator",
                    "email": admin.email,
                    "role": "admin",
                },
            })))
        }
        Some("student") => {
            let identifier = required(&req.identifier, "identifier")?;
            let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
            let student = db::find_student_by_identifier(&mut conn, identifier)
                .await?
                .ok_or_else(|| ApiError::NotFound("Student not found".to_owned()))?;
            if !verify_password(&student.password, password) {
                return Err(ApiError::Unauthorized("Invalid password".to_owned()));
            }
            Ok(Json(json!({
                "success": true,
                "user": {
                    "id": student.id,
                    "name": format!("{} {}", student.first_name, student.last_name),
                    "email": student.email,
                    "role": "student",
                    "studentData": StudentProfileWire::from_row(&student),
                },
            })))
        }
        _ => Err(ApiError::InvalidInput("Invalid role".to_owned())),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub award_number: Option<String>,
    pub place: Option<String>,
    pub is_indigenous: Option<bool>,
    pub is_pwd: Option<bool>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidInput(format!("Missing required field '{field}'")))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let first_name = required(&req.first_name, "firstName")?;
    let last_name = required(&req.last_name, "lastName")?;
    let student_id = required(&req.student_id, "studentId")?;
    let email = required(&req.email, "email")?;
    let password = required(&req.password, "password")?;
    let award_number = req.award_number.as_deref().unwrap_or("");

    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    match db::find_duplicate_field(&mut conn, email, student_id, award_number).await? {
        Some(DuplicateField::Email) => {
            return Err(ApiError::DuplicateEntity("Email already exists".to_owned()));
        }
        Some(DuplicateField::StudentId) => {
            return Err(ApiError::DuplicateEntity("Student ID already exists".to_owned()));
        }
        Some(DuplicateField::AwardNumber) => {
            return Err(ApiError::DuplicateEntity("Award number already exists".to_owned()));
        }
        None => {}
    }

    let hashed = hash_password(&state.argon2, password).map_err(ApiError::internal)?;
    let new_student = NewStudent {
        first_name,
        last_name,
        student_id,
        email,
        password: &hashed,
        department: req.department.as_deref().unwrap_or(""),
        course: req.course.as_deref().unwrap_or(""),
        year_level: req.year.as_deref().unwrap_or(""),
        award_number,
        place: req.place.as_deref().unwrap_or(""),
        is_indigenous: req.is_indigenous.unwrap_or(false),
        is_pwd: req.is_pwd.unwrap_or(false),
        status: "active",
        application_status: "pending",
        registered_date: Utc::now().naive_utc(),
    };
    let id = db::create_student(&mut conn, &new_student).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Registration successful",
        "id": id,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPasswordRequest {
    pub student_id: Option<i32>,
    pub email: Option<String>,
    #[serde(rename = "student_id")]
    pub student_number: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_student_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StudentPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let new_password = required(&req.new_password, "newPassword")?;
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;

    let student = if let Some(id) = req.student_id.filter(|id| *id > 0) {
        db::get_student(&mut conn, id).await?
    } else if let Some(identifier) = req
        .email
        .as_deref()
        .or(req.student_number.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        db::find_student_by_identifier(&mut conn, identifier).await?
    } else {
        return Err(ApiError::InvalidInput("Missing student identifier".to_owned()));
    };
    let student = student.ok_or_else(|| ApiError::NotFound("Student not found".to_owned()))?;

    if let Some(current) = req.current_password.as_deref() {
        if !verify_password(&student.password, current) {
            return Err(ApiError::Unauthorized("Current password is incorrect".to_owned()));
        }
    }
    let hashed = hash_password(&state.argon2, new_password).map_err(ApiError::internal)?;
    db::set_student_password(&mut conn, student.id, &hashed).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPasswordRequest {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_admin_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = required(&req.email, "email")?;
    let current = required(&req.current_password, "currentPassword")?;
    let new_password = required(&req.new_password, "newPassword")?;

    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let admin = db::get_admin_by_email(&mut conn, email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_owned()))?;
    if !verify_password(&admin.password, current) {
        return Err(ApiError::Unauthorized("Current password is incorrect".to_owned()));
    }
    let hashed = hash_password(&state.argon2, new_password).map_err(ApiError::internal)?;
    db::set_admin_password(&mut conn, email, &hashed).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}
