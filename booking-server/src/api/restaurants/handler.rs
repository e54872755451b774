//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, restaurant, user};
use crate::utils::validation::{MAX_CHAIR_AMOUNT, MAX_NAME_LEN, validate_positive, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

/// 余位查询响应
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub restaurant_id: i64,
    pub available_seats: i64,
}

/// GET /api/restaurants - 获取所有餐厅
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = restaurant::find_all(&state.db)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/:id/availability - 查询餐厅余位
///
/// Public display read; admission re-checks inside its own transaction.
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AvailabilityResponse>> {
    let available_seats = state.reservations.availability(id).await?;
    Ok(Json(AvailabilityResponse {
        restaurant_id: id,
        available_seats,
    }))
}

/// POST /api/restaurants - 创建餐厅 (店主)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    current_user.require_owner()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_positive(payload.chair_amount, "chair_amount", MAX_CHAIR_AMOUNT)?;

    user::ensure(&state.db, current_user.id, &current_user.name, current_user.role)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let created = restaurant::create(&state.db, current_user.id, payload)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(restaurant_id = created.id, owner_id = current_user.id, "Restaurant created");
    Ok(Json(created))
}

/// PUT /api/restaurants/:id - 更新餐厅 (店主, 含座位数调整)
///
/// Shrinking `chair_amount` below the current occupancy is allowed: existing
/// reservations keep their seats, the pool just admits nothing new until
/// enough of them resolve.
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    current_user.require_owner()?;
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(chair_amount) = payload.chair_amount {
        validate_positive(chair_amount, "chair_amount", MAX_CHAIR_AMOUNT)?;
    }

    let updated = restaurant::update(&state.db, id, current_user.id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            other => AppError::database(other.to_string()),
        })?;

    Ok(Json(updated))
}
