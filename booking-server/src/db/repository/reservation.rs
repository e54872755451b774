//! Reservation Repository
//!
//! The occupancy sum and the status/insert writes are the data half of the
//! admission discipline: the reservation engine calls the `_conn` variants
//! inside one transaction per capacity-consuming write.

use super::RepoResult;
use shared::models::{Reservation, ReservationStatus, ReservationView};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const RESERVATION_SELECT: &str = "SELECT id, restaurant_id, client_id, reservation_date, diners, \
     status, created_at, updated_at FROM reservation";

const VIEW_SELECT: &str = "SELECT res.id, res.restaurant_id, r.name AS restaurant_name, \
     res.client_id, u.name AS client_name, res.reservation_date, res.diners, res.status, \
     res.created_at FROM reservation res \
     JOIN restaurant r ON res.restaurant_id = r.id \
     JOIN user u ON res.client_id = u.id";

/// Reservation row joined with its restaurant's owner, for ownership checks
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReservationWithOwner {
    pub id: i64,
    pub restaurant_id: i64,
    pub client_id: i64,
    pub reservation_date: i64,
    pub diners: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub owner_id: i64,
}

impl ReservationWithOwner {
    pub fn into_reservation(self) -> Reservation {
        Reservation {
            id: self.id,
            restaurant_id: self.restaurant_id,
            client_id: self.client_id,
            reservation_date: self.reservation_date,
            diners: self.diners,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sum of diners across seat-holding reservations of one restaurant.
///
/// Deliberately ignores `reservation_date`: the seat pool is shared across
/// all dates, matching the platform's booking contract.
pub async fn sum_active_diners(
    ex: impl sqlx::SqliteExecutor<'_>,
    restaurant_id: i64,
) -> RepoResult<i64> {
    let occupied: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(diners), 0) FROM reservation \
         WHERE restaurant_id = ? AND status IN ('PENDING', 'ACCEPTED')",
    )
    .bind(restaurant_id)
    .fetch_one(ex)
    .await?;
    Ok(occupied)
}

/// Insert a new pending reservation inside the admission transaction.
pub async fn insert_conn(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    client_id: i64,
    reservation_date: i64,
    diners: i64,
) -> RepoResult<Reservation> {
    let now = now_millis();
    let reservation = Reservation {
        id: snowflake_id(),
        restaurant_id,
        client_id,
        reservation_date,
        diners,
        status: ReservationStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        "INSERT INTO reservation (id, restaurant_id, client_id, reservation_date, diners, status, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(reservation.id)
    .bind(reservation.restaurant_id)
    .bind(reservation.client_id)
    .bind(reservation.reservation_date)
    .bind(reservation.diners)
    .bind(reservation.status.as_str())
    .bind(reservation.created_at)
    .bind(reservation.updated_at)
    .execute(conn)
    .await?;
    Ok(reservation)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Load a reservation joined to its restaurant's owner.
///
/// Transition legality and ownership are always validated against this
/// freshly loaded row, inside the same transaction that writes the change.
pub async fn find_with_owner(
    ex: impl sqlx::SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<ReservationWithOwner>> {
    let row = sqlx::query_as::<_, ReservationWithOwner>(
        "SELECT res.id, res.restaurant_id, res.client_id, res.reservation_date, res.diners, \
         res.status, res.created_at, res.updated_at, r.owner_id FROM reservation res \
         JOIN restaurant r ON res.restaurant_id = r.id WHERE res.id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn update_status_conn(
    conn: &mut SqliteConnection,
    id: i64,
    status: ReservationStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE reservation SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status.as_str())
        .bind(now_millis())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// A client's reservations, newest first.
pub async fn list_views_for_client(
    pool: &SqlitePool,
    client_id: i64,
) -> RepoResult<Vec<ReservationView>> {
    let sql = format!("{VIEW_SELECT} WHERE res.client_id = ? ORDER BY res.reservation_date DESC");
    let rows = sqlx::query_as::<_, ReservationView>(&sql)
        .bind(client_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Incoming reservations of one restaurant, soonest first.
pub async fn list_views_for_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> RepoResult<Vec<ReservationView>> {
    let sql =
        format!("{VIEW_SELECT} WHERE res.restaurant_id = ? ORDER BY res.reservation_date ASC");
    let rows = sqlx::query_as::<_, ReservationView>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Notification badge: pending requests across all of an owner's restaurants.
pub async fn pending_count_for_owner(pool: &SqlitePool, owner_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation res \
         JOIN restaurant r ON res.restaurant_id = r.id \
         WHERE r.owner_id = ? AND res.status = 'PENDING'",
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
