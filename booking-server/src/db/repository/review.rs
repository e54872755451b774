//! Review Repository

use super::{RepoError, RepoResult};
use shared::models::{ReservationView, Review};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

pub async fn exists_for_reservation(pool: &SqlitePool, reservation_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE reservation_id = ?")
        .bind(reservation_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert a review. The UNIQUE index on `reservation_id` makes the
/// one-review-per-reservation rule atomic; a second insert surfaces as
/// [`RepoError::Duplicate`].
pub async fn insert(
    pool: &SqlitePool,
    reservation_id: i64,
    client_id: i64,
    rating: i64,
    comment: Option<String>,
) -> RepoResult<Review> {
    let review = Review {
        id: snowflake_id(),
        reservation_id,
        client_id,
        rating,
        comment,
        created_at: now_millis(),
    };
    sqlx::query(
        "INSERT INTO review (id, reservation_id, client_id, rating, comment, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(review.id)
    .bind(review.reservation_id)
    .bind(review.client_id)
    .bind(review.rating)
    .bind(review.comment.as_deref())
    .bind(review.created_at)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Reservation {reservation_id} already reviewed"))
        }
        other => other,
    })?;
    Ok(review)
}

/// Attended reservations of a client that have no review yet.
pub async fn reviewable_for_client(
    pool: &SqlitePool,
    client_id: i64,
) -> RepoResult<Vec<ReservationView>> {
    let rows = sqlx::query_as::<_, ReservationView>(
        "SELECT res.id, res.restaurant_id, r.name AS restaurant_name, res.client_id, \
         u.name AS client_name, res.reservation_date, res.diners, res.status, res.created_at \
         FROM reservation res \
         JOIN restaurant r ON res.restaurant_id = r.id \
         JOIN user u ON res.client_id = u.id \
         LEFT JOIN review rev ON rev.reservation_id = res.id \
         WHERE res.client_id = ? AND res.status = 'ATTENDANCE' AND rev.id IS NULL \
         ORDER BY res.reservation_date DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
