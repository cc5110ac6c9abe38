use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Doctor, Service};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.store.list_services()?))
}

// GET /api/doctors
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    Ok(Json(state.store.list_doctors()?))
}

// GET /api/status
#[derive(Serialize)]
pub struct StatusResponse {
    services_count: usize,
    today: String,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, AppError> {
    let services_count = state.store.list_services()?.len();

    Ok(Json(StatusResponse {
        services_count,
        today: Local::now().date_naive().format("%Y-%m-%d").to_string(),
    }))
}
