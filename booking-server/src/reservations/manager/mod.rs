//! ReservationManager - Capacity accounting and lifecycle transitions
//!
//! This module handles:
//! - Availability computation (chair pool minus seat-holding reservations)
//! - Atomic admission of new reservation requests
//! - Owner-driven status transitions with re-admission checks
//! - Client cancellation
//! - Review eligibility
//!
//! # Admission Flow
//!
//! ```text
//! create(restaurant, client, date, diners)
//!     ├─ 1. Validate input
//!     ├─ 2. Acquire the restaurant's admission lock
//!     ├─ 3. Begin transaction
//!     ├─ 4. occupied = SUM(diners) over PENDING/ACCEPTED
//!     ├─ 5. diners > chair_amount - occupied  → InsufficientCapacity
//!     ├─ 6. Insert PENDING reservation
//!     └─ 7. Commit, release lock
//! ```
//!
//! Every write that can grow the occupancy sum of a restaurant serializes
//! on that restaurant's lock (step 2); writes that only free seats skip it.
//! Restaurants are independent units of concurrency control.

mod error;
pub use error::*;

use crate::db::repository::{RepoError, reservation, restaurant, review};
use dashmap::DashMap;
use shared::models::{Reservation, ReservationStatus, Review};
use shared::util::now_millis;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result type for engine operations
pub type ReservationResult<T> = Result<T, ReservationError>;

/// Reservation engine
///
/// Holds the pool and one admission mutex per restaurant. Lock entries are
/// created on first use and live for the process lifetime; the set of
/// restaurants is small and bounded.
pub struct ReservationManager {
    pool: SqlitePool,
    admission_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("admission_locks", &self.admission_locks.len())
            .finish()
    }
}

impl ReservationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            admission_locks: DashMap::new(),
        }
    }

    fn admission_lock(&self, restaurant_id: i64) -> Arc<Mutex<()>> {
        self.admission_locks
            .entry(restaurant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn begin(&self) -> ReservationResult<Transaction<'static, Sqlite>> {
        let tx = self.pool.begin().await.map_err(RepoError::from)?;
        Ok(tx)
    }

    // ========================================================================
    // Availability
    // ========================================================================

    /// Free seats for display: `chair_amount - occupied`, clamped at zero.
    ///
    /// Reads outside any lock; admission recomputes the sum inside its own
    /// transaction, so a stale display value can never oversell.
    pub async fn availability(&self, restaurant_id: i64) -> ReservationResult<i64> {
        let rest = restaurant::find_by_id(&self.pool, restaurant_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(ReservationError::RestaurantNotFound(restaurant_id))?;
        let occupied = reservation::sum_active_diners(&self.pool, restaurant_id).await?;
        Ok((rest.chair_amount - occupied).max(0))
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Admit a new reservation request. On success the reservation is
    /// created as PENDING; on a full house the request fails with
    /// `InsufficientCapacity` and nothing is written.
    ///
    /// Past-dated requests are accepted (owners log walk-ins this way).
    pub async fn create(
        &self,
        restaurant_id: i64,
        client_id: i64,
        reservation_date: i64,
        diners: i64,
    ) -> ReservationResult<Reservation> {
        if diners < 1 {
            return Err(ReservationError::InvalidInput(
                "diners must be positive".to_string(),
            ));
        }
        if reservation_date <= 0 {
            return Err(ReservationError::InvalidInput(
                "reservation_date is required".to_string(),
            ));
        }

        let lock = self.admission_lock(restaurant_id);
        let _guard = lock.lock().await;

        match self
            .admit_once(restaurant_id, client_id, reservation_date, diners)
            .await
        {
            Err(ReservationError::Storage(e)) if e.is_busy() => {
                tracing::warn!(restaurant_id, "Admission hit writer contention, retrying once");
                match self
                    .admit_once(restaurant_id, client_id, reservation_date, diners)
                    .await
                {
                    Err(ReservationError::Storage(e)) if e.is_busy() => {
                        Err(ReservationError::Conflict(e.to_string()))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    /// One transactional check-then-insert attempt. Caller holds the
    /// restaurant's admission lock.
    async fn admit_once(
        &self,
        restaurant_id: i64,
        client_id: i64,
        reservation_date: i64,
        diners: i64,
    ) -> ReservationResult<Reservation> {
        let mut tx = self.begin().await?;

        let chair_amount = restaurant::chair_amount_conn(&mut tx, restaurant_id)
            .await?
            .ok_or(ReservationError::RestaurantNotFound(restaurant_id))?;
        let occupied = reservation::sum_active_diners(&mut *tx, restaurant_id).await?;
        let available = chair_amount - occupied;

        if diners > available {
            // Business outcome, not a failure: keep it out of error-level logs
            tracing::info!(
                restaurant_id,
                diners,
                available,
                "Reservation rejected, insufficient capacity"
            );
            return Err(ReservationError::InsufficientCapacity {
                requested: diners,
                available: available.max(0),
            });
        }

        let created =
            reservation::insert_conn(&mut tx, restaurant_id, client_id, reservation_date, diners)
                .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id = created.id,
            restaurant_id,
            diners,
            remaining = available - diners,
            "Reservation admitted"
        );
        Ok(created)
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// Owner-driven status change.
    ///
    /// Ownership is resolved by joining reservation → restaurant → owner;
    /// a missing reservation and a foreign owner produce the same
    /// `NotFoundOrForbidden`. Transitions that re-enter the seat-holding
    /// set run the full admission check again under the restaurant's lock.
    pub async fn update_status(
        &self,
        reservation_id: i64,
        new_status: ReservationStatus,
        owner_id: i64,
    ) -> ReservationResult<Reservation> {
        // Pre-read for the lock key; everything is re-validated inside the
        // transaction against the freshly loaded row.
        let row = reservation::find_with_owner(&self.pool, reservation_id)
            .await?
            .ok_or(ReservationError::NotFoundOrForbidden)?;
        if row.owner_id != owner_id {
            return Err(ReservationError::NotFoundOrForbidden);
        }

        // A transition into PENDING/ACCEPTED may consume seats, so it
        // serializes with admissions on the same restaurant.
        let _guard = if new_status.is_active() {
            let lock = self.admission_lock(row.restaurant_id);
            Some(lock.lock_owned().await)
        } else {
            None
        };

        match self
            .transition_once(reservation_id, new_status, owner_id)
            .await
        {
            Err(ReservationError::Storage(e)) if e.is_busy() => {
                tracing::warn!(reservation_id, "Transition hit writer contention, retrying once");
                match self
                    .transition_once(reservation_id, new_status, owner_id)
                    .await
                {
                    Err(ReservationError::Storage(e)) if e.is_busy() => {
                        Err(ReservationError::Conflict(e.to_string()))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn transition_once(
        &self,
        reservation_id: i64,
        new_status: ReservationStatus,
        owner_id: i64,
    ) -> ReservationResult<Reservation> {
        let mut tx = self.begin().await?;

        let row = reservation::find_with_owner(&mut *tx, reservation_id)
            .await?
            .ok_or(ReservationError::NotFoundOrForbidden)?;
        if row.owner_id != owner_id {
            return Err(ReservationError::NotFoundOrForbidden);
        }

        if !row.status.can_transition_to(new_status) {
            return Err(ReservationError::InvalidTransition {
                from: row.status,
                to: new_status,
            });
        }

        // Attendance can only be marked once the booked instant has passed
        if new_status == ReservationStatus::Attendance
            && row.status == ReservationStatus::Accepted
            && now_millis() < row.reservation_date
        {
            return Err(ReservationError::InvalidTransition {
                from: row.status,
                to: new_status,
            });
        }

        if ReservationStatus::needs_capacity_check(row.status, new_status) {
            let chair_amount = restaurant::chair_amount_conn(&mut tx, row.restaurant_id)
                .await?
                .ok_or(ReservationError::RestaurantNotFound(row.restaurant_id))?;
            // The reservation itself is outside the active set here, so it
            // contributes nothing to the sum
            let occupied = reservation::sum_active_diners(&mut *tx, row.restaurant_id).await?;
            let available = chair_amount - occupied;
            if row.diners > available {
                tracing::info!(
                    reservation_id,
                    diners = row.diners,
                    available,
                    "Reinstatement rejected, seats filled in the interim"
                );
                return Err(ReservationError::InsufficientCapacity {
                    requested: row.diners,
                    available: available.max(0),
                });
            }
        }

        reservation::update_status_conn(&mut tx, reservation_id, new_status).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id,
            from = row.status.as_str(),
            to = new_status.as_str(),
            "Reservation status updated"
        );

        Ok(Reservation {
            status: new_status,
            updated_at: now_millis(),
            ..row.into_reservation()
        })
    }

    /// Client-side cancellation of the client's own reservation.
    ///
    /// Only the un-resolved statuses can be cancelled this way; the move
    /// frees seats, so no admission lock is involved.
    pub async fn cancel_by_client(
        &self,
        reservation_id: i64,
        client_id: i64,
    ) -> ReservationResult<Reservation> {
        match self.cancel_once(reservation_id, client_id).await {
            Err(ReservationError::Storage(e)) if e.is_busy() => {
                tracing::warn!(reservation_id, "Cancellation hit writer contention, retrying once");
                match self.cancel_once(reservation_id, client_id).await {
                    Err(ReservationError::Storage(e)) if e.is_busy() => {
                        Err(ReservationError::Conflict(e.to_string()))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn cancel_once(
        &self,
        reservation_id: i64,
        client_id: i64,
    ) -> ReservationResult<Reservation> {
        let mut tx = self.begin().await?;

        let row = reservation::find_with_owner(&mut *tx, reservation_id)
            .await?
            .ok_or(ReservationError::NotFoundOrForbidden)?;
        if row.client_id != client_id {
            return Err(ReservationError::NotFoundOrForbidden);
        }

        if !row.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(ReservationError::InvalidTransition {
                from: row.status,
                to: ReservationStatus::Cancelled,
            });
        }

        reservation::update_status_conn(&mut tx, reservation_id, ReservationStatus::Cancelled)
            .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(reservation_id, client_id, "Reservation cancelled by client");

        Ok(Reservation {
            status: ReservationStatus::Cancelled,
            updated_at: now_millis(),
            ..row.into_reservation()
        })
    }

    // ========================================================================
    // Review eligibility
    // ========================================================================

    /// Whether `client_id` may review this reservation: attended, owned by
    /// the caller, and not yet reviewed.
    pub async fn can_review(&self, reservation_id: i64, client_id: i64) -> ReservationResult<bool> {
        let res = reservation::find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(ReservationError::NotFoundOrForbidden)?;
        if res.client_id != client_id || res.status != ReservationStatus::Attendance {
            return Ok(false);
        }
        let reviewed = review::exists_for_reservation(&self.pool, reservation_id).await?;
        Ok(!reviewed)
    }

    /// Create a review, re-checking eligibility at write time. The UNIQUE
    /// index on `review.reservation_id` closes the display-to-submit race:
    /// a concurrent duplicate insert loses and surfaces as not eligible.
    pub async fn create_review(
        &self,
        reservation_id: i64,
        client_id: i64,
        rating: i64,
        comment: Option<String>,
    ) -> ReservationResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(ReservationError::InvalidInput(
                "rating must be between 1 and 5".to_string(),
            ));
        }

        let res = reservation::find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(ReservationError::NotFoundOrForbidden)?;
        if res.client_id != client_id {
            return Err(ReservationError::NotEligibleForReview(
                "reservation belongs to another client".to_string(),
            ));
        }
        if res.status != ReservationStatus::Attendance {
            return Err(ReservationError::NotEligibleForReview(format!(
                "reservation is {}, not ATTENDANCE",
                res.status.as_str()
            )));
        }

        match review::insert(&self.pool, reservation_id, client_id, rating, comment).await {
            Ok(created) => {
                tracing::info!(reservation_id, review_id = created.id, "Review created");
                Ok(created)
            }
            Err(RepoError::Duplicate(_)) => Err(ReservationError::NotEligibleForReview(
                "reservation already reviewed".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests;
