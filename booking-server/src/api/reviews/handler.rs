//! Review API Handlers
//!
//! Review creation re-checks eligibility at write time; the gate shown to
//! the user can go stale between display and submit.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::review;
use crate::utils::validation::{MAX_COMMENT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{ReservationView, Review, ReviewCreate};

/// 评价资格响应
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub reservation_id: i64,
    pub can_review: bool,
}

/// GET /api/reviews/eligibility/:reservation_id - 查询评价资格 (顾客)
pub async fn eligibility(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<EligibilityResponse>> {
    current_user.require_client()?;
    let can_review = state
        .reservations
        .can_review(reservation_id, current_user.id)
        .await?;
    Ok(Json(EligibilityResponse {
        reservation_id,
        can_review,
    }))
}

/// POST /api/reviews - 创建评价 (顾客)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    current_user.require_client()?;
    validate_optional_text(payload.comment.as_deref(), "comment", MAX_COMMENT_LEN)?;

    let created = state
        .reservations
        .create_review(
            payload.reservation_id,
            current_user.id,
            payload.rating,
            payload.comment,
        )
        .await?;
    Ok(Json(created))
}

/// GET /api/reviews/pending - 已到店未评价的预订列表 (顾客)
pub async fn pending(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ReservationView>>> {
    current_user.require_client()?;
    let views = review::reviewable_for_client(&state.db, current_user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(views))
}
