//! User Repository
//!
//! Identity lives in the external auth service; this table mirrors the
//! users that have touched booking data, so foreign keys stay enforceable.

use super::RepoResult;
use shared::models::{Role, User};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Mirror a verified caller into the local user table.
///
/// First write wins; later calls refresh the name only.
pub async fn ensure(pool: &SqlitePool, id: i64, name: &str, role: Role) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, name, role, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 1, ?4, ?4) \
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(name)
    .bind(role.as_str())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, name, role, is_active, created_at, updated_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
