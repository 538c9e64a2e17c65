use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::{UserProfile, UserRole};
use crate::state::AppState;
use crate::store::profiles::{NewProfile, ProfileUpdate};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profiles", post(register_profile))
        .route("/profiles/:id", get(get_profile).patch(update_profile))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: String,
    pub document: String,
    pub vehicle_plate: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub avatar_url: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_verified: Option<bool>,
}

async fn register_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }
    if payload.vehicle_plate.is_some() && payload.role != UserRole::Courier {
        return Err(AppError::Validation(
            "only couriers carry a vehicle plate".to_string(),
        ));
    }

    let profile = state.profiles.create(NewProfile {
        name: payload.name,
        email: payload.email,
        role: payload.role,
        phone: payload.phone,
        document: payload.document,
        vehicle_plate: payload.vehicle_plate,
    });

    Ok(Json(profile))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .profiles
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))?;

    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.profiles.update_fields(
        id,
        ProfileUpdate {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            document: payload.document,
            avatar_url: payload.avatar_url,
            vehicle_plate: payload.vehicle_plate,
            is_verified: payload.is_verified,
        },
    )?;

    Ok(Json(profile))
}
