//! Restaurant Repository

use super::{RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const RESTAURANT_SELECT: &str =
    "SELECT id, owner_id, name, chair_amount, is_active, created_at, updated_at FROM restaurant";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, Restaurant>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Seat pool size, read inside the admission transaction.
pub async fn chair_amount_conn(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<i64>> {
    let row: Option<i64> =
        sqlx::query_scalar("SELECT chair_amount FROM restaurant WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    owner_id: i64,
    data: RestaurantCreate,
) -> RepoResult<Restaurant> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO restaurant (id, owner_id, name, chair_amount, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&data.name)
    .bind(data.chair_amount)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

/// Owner edit. The WHERE clause pins the owner so a foreign owner's update
/// reads as "not found" rather than "forbidden".
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    data: RestaurantUpdate,
) -> RepoResult<Restaurant> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE restaurant SET name = COALESCE(?1, name), chair_amount = COALESCE(?2, chair_amount), \
         is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5 AND owner_id = ?6",
    )
    .bind(&data.name)
    .bind(data.chair_amount)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))
}
