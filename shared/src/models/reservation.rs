//! Reservation Model
//!
//! `ReservationStatus` owns the lifecycle transition table. Everything that
//! needs to know whether a move is legal, or whether a status holds seats,
//! asks this enum — there is no second copy of the rules anywhere.

use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
///
/// | 状态 | 占用座位 | 说明 |
/// |------|----------|------|
/// | PENDING | 是 | 等待店主响应 |
/// | ACCEPTED | 是 | 店主已接受 |
/// | REJECTED | 否 | 店主已拒绝 (可恢复) |
/// | ATTENDANCE | 否 | 客人已到店 |
/// | ABSENCE | 否 | 客人未到店 |
/// | CANCELLED | 否 | 已取消 (可恢复) |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Rejected,
    Attendance,
    Absence,
    Cancelled,
}

impl ReservationStatus {
    /// Whether this status holds seats in the restaurant's pool.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Accepted)
    }

    /// Lifecycle transition table.
    ///
    /// Rejected/cancelled reservations can be reinstated by the owner;
    /// attendance/absence allow a single marking correction between them.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        match (self, next) {
            (Pending, Accepted) | (Pending, Rejected) | (Pending, Cancelled) => true,
            (Accepted, Attendance) | (Accepted, Absence) | (Accepted, Cancelled) => true,
            (Rejected, Accepted) | (Rejected, Pending) => true,
            (Cancelled, Accepted) | (Cancelled, Pending) => true,
            (Attendance, Absence) | (Absence, Attendance) => true,
            _ => false,
        }
    }

    /// Whether moving `from` -> `to` consumes seats that were previously
    /// free. Only such moves need the admission capacity check; every other
    /// legal move either frees seats or shuffles inactive states.
    pub fn needs_capacity_check(from: ReservationStatus, to: ReservationStatus) -> bool {
        !from.is_active() && to.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Accepted => "ACCEPTED",
            ReservationStatus::Rejected => "REJECTED",
            ReservationStatus::Attendance => "ATTENDANCE",
            ReservationStatus::Absence => "ABSENCE",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Reservation entity (预订)
///
/// `diners`, `reservation_date` and `restaurant_id` are immutable after
/// creation; only `status` changes. Rows are never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub restaurant_id: i64,
    pub client_id: i64,
    /// Arrival instant, millis UTC
    pub reservation_date: i64,
    pub diners: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    /// Display-only "superada" flag: an active reservation whose date has
    /// passed without resolution. Computed, never persisted, and never
    /// affects the capacity sum.
    pub fn is_overdue(&self, now: i64) -> bool {
        self.status.is_active() && self.reservation_date < now
    }
}

/// Create reservation payload (client_id comes from the auth token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub restaurant_id: i64,
    pub reservation_date: i64,
    pub diners: i64,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}

/// Reservation list row with restaurant context and the computed overdue
/// flag, as served to clients and owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReservationView {
    pub id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub client_id: i64,
    pub client_name: String,
    pub reservation_date: i64,
    pub diners: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
    /// Not a stored column — filled in after fetch
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(default))]
    pub overdue: bool,
}

impl ReservationView {
    pub fn compute_overdue(&mut self, now: i64) {
        self.overdue = self.status.is_active() && self.reservation_date < now;
    }
}
