use super::*;
use crate::db::DbService;
use crate::db::repository::{restaurant, user};
use shared::models::{RestaurantCreate, Role};
use shared::util::now_millis;
use tempfile::TempDir;

pub(crate) const OWNER_ID: i64 = 1001;
pub(crate) const OTHER_OWNER_ID: i64 = 1002;
pub(crate) const CLIENT_ID: i64 = 2001;
pub(crate) const OTHER_CLIENT_ID: i64 = 2002;

/// Manager over a throwaway SQLite file, with both owners and both clients
/// seeded. The TempDir must stay alive for the duration of the test.
pub(crate) struct TestContext {
    pub manager: ReservationManager,
    pub pool: SqlitePool,
    _tmp: TempDir,
}

pub(crate) async fn create_test_context() -> TestContext {
    let tmp = TempDir::new().expect("temp dir");
    let db_path = tmp.path().join("booking-test.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("test database");
    let pool = db.pool.clone();

    for (id, name, role) in [
        (OWNER_ID, "Owner One", Role::Owner),
        (OTHER_OWNER_ID, "Owner Two", Role::Owner),
        (CLIENT_ID, "Client One", Role::Client),
        (OTHER_CLIENT_ID, "Client Two", Role::Client),
    ] {
        user::ensure(&pool, id, name, role).await.expect("seed user");
    }

    TestContext {
        manager: ReservationManager::new(pool.clone()),
        pool,
        _tmp: tmp,
    }
}

pub(crate) async fn seed_restaurant(ctx: &TestContext, chair_amount: i64) -> i64 {
    let created = restaurant::create(
        &ctx.pool,
        OWNER_ID,
        RestaurantCreate {
            name: format!("Test Restaurant {chair_amount}"),
            chair_amount,
        },
    )
    .await
    .expect("seed restaurant");
    created.id
}

/// A booked instant comfortably in the future
pub(crate) fn future_date() -> i64 {
    now_millis() + 86_400_000
}

/// A booked instant already in the past (walk-in logging)
pub(crate) fn past_date() -> i64 {
    now_millis() - 86_400_000
}

/// The invariant the whole engine exists to protect
pub(crate) async fn assert_capacity_invariant(pool: &SqlitePool, restaurant_id: i64) {
    let rest = restaurant::find_by_id(pool, restaurant_id)
        .await
        .expect("restaurant lookup")
        .expect("restaurant exists");
    let occupied = reservation::sum_active_diners(pool, restaurant_id)
        .await
        .expect("occupancy sum");
    assert!(
        occupied <= rest.chair_amount,
        "capacity invariant violated: occupied {} > chairs {}",
        occupied,
        rest.chair_amount
    );
}

mod test_admission;
mod test_concurrency;
