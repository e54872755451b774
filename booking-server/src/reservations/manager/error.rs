use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::models::ReservationStatus;
use thiserror::Error;

/// Reservation engine errors
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Restaurant {0} not found")]
    RestaurantNotFound(i64),

    /// Missing reservation and foreign-owner access are deliberately the
    /// same error, so callers cannot probe for other owners' reservations.
    #[error("Reservation not found")]
    NotFoundOrForbidden,

    #[error("Insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: i64, available: i64 },

    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Not eligible for review: {0}")]
    NotEligibleForReview(String),

    /// Writer contention that survived the bounded retry. Transient;
    /// distinct from [`ReservationError::InsufficientCapacity`].
    #[error("Conflict, please retry: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::InvalidInput(msg) => AppError::Validation(msg),
            ReservationError::RestaurantNotFound(id) => {
                AppError::NotFound(format!("Restaurant {id} not found"))
            }
            ReservationError::NotFoundOrForbidden => {
                AppError::NotFound("Reservation not found".to_string())
            }
            e @ ReservationError::InsufficientCapacity { .. } => {
                AppError::BusinessRule(e.to_string())
            }
            e @ ReservationError::InvalidTransition { .. } => AppError::BusinessRule(e.to_string()),
            ReservationError::NotEligibleForReview(msg) => {
                AppError::BusinessRule(format!("Not eligible for review: {msg}"))
            }
            ReservationError::Conflict(msg) => AppError::Conflict(msg),
            ReservationError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
