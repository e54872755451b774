//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{reservation, restaurant, user};
use crate::utils::validation::{MAX_DINERS, validate_positive};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Reservation, ReservationCreate, ReservationStatusUpdate, ReservationView};
use shared::util::now_millis;

/// POST /api/reservations - 创建预订 (顾客)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    current_user.require_client()?;
    validate_positive(payload.diners, "diners", MAX_DINERS)?;

    user::ensure(&state.db, current_user.id, &current_user.name, current_user.role)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let created = state
        .reservations
        .create(
            payload.restaurant_id,
            current_user.id,
            payload.reservation_date,
            payload.diners,
        )
        .await?;
    Ok(Json(created))
}

/// GET /api/reservations/mine - 顾客自己的预订列表
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ReservationView>>> {
    current_user.require_client()?;
    let mut views = reservation::list_views_for_client(&state.db, current_user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let now = now_millis();
    for view in &mut views {
        view.compute_overdue(now);
    }
    Ok(Json(views))
}

/// GET /api/reservations/restaurant/:id - 餐厅的预订列表 (店主)
pub async fn by_restaurant(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<ReservationView>>> {
    current_user.require_owner()?;

    // Foreign restaurants read as "not found", same masking as transitions
    let owned = restaurant::find_by_id(&state.db, restaurant_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|r| r.owner_id == current_user.id);
    if owned.is_none() {
        return Err(AppError::not_found(format!(
            "Restaurant {restaurant_id} not found"
        )));
    }

    let mut views = reservation::list_views_for_restaurant(&state.db, restaurant_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let now = now_millis();
    for view in &mut views {
        view.compute_overdue(now);
    }
    Ok(Json(views))
}

/// GET /api/reservations/pending-count - 待处理预订数 (店主通知角标)
pub async fn pending_count(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AppResponse<i64>>> {
    current_user.require_owner()?;
    let count = reservation::pending_count_for_owner(&state.db, current_user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(ok(count))
}

/// PUT /api/reservations/:id/status - 变更预订状态 (店主)
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<Reservation>> {
    current_user.require_owner()?;
    let updated = state
        .reservations
        .update_status(id, payload.status, current_user.id)
        .await?;
    Ok(Json(updated))
}

/// POST /api/reservations/:id/cancel - 取消预订 (顾客)
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    current_user.require_client()?;
    let cancelled = state.reservations.cancel_by_client(id, current_user.id).await?;
    Ok(Json(cancelled))
}
