//! Review Model
//!
//! A reservation receives at most one review, and only after attendance.
//! The 0-or-1 relationship is enforced by a UNIQUE index on
//! `reservation_id`.

use serde::{Deserialize, Serialize};

/// Review entity (评价)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub reservation_id: i64,
    pub client_id: i64,
    /// 1-5 stars
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Create review payload (client_id comes from the auth token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub reservation_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}
