//! Student-body reporting endpoint.
//!
//! The old client derived these breakdowns by aggregating the full
//! student listing in the browser; the service now serves the same
//! aggregation directly.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::AppState;
use crate::{db, error::ApiError};

pub async fn report_summary(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await.map_err(ApiError::internal)?;
    let breakdown = db::student_breakdown(&mut conn).await?;
    Ok(Json(json!({
        "success": true,
        "departments": breakdown.departments,
        "places": breakdown.places,
        "yearLevels": breakdown.year_levels,
        "statuses": breakdown.statuses,
        "total": breakdown.total,
    })))
}
