//! 预订容量压力测试
//!
//! 使用 ServerState::initialize 完整初始化，模拟真实场景中大量顾客
//! 同时抢订同一家餐厅：无论交错如何，活跃预订的总人数不得超过座位数。

use booking_server::db::repository::{reservation, restaurant, user};
use booking_server::{Config, ServerState};
use rand::Rng;
use shared::models::{ReservationStatus, RestaurantCreate, Role};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::Barrier;

const CHAIRS: i64 = 50;
const WAVES: usize = 4;
const REQUESTS_PER_WAVE: usize = 16;

const OWNER_ID: i64 = 10;
const FIRST_CLIENT_ID: i64 = 100;

async fn initialize_state(tmp: &tempfile::TempDir) -> ServerState {
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    ServerState::initialize(&config).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_booking_storm_respects_capacity() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let state = initialize_state(&tmp).await;
    let pool = state.get_db();

    user::ensure(&pool, OWNER_ID, "Stress Owner", Role::Owner)
        .await
        .expect("seed owner");
    for i in 0..REQUESTS_PER_WAVE {
        user::ensure(
            &pool,
            FIRST_CLIENT_ID + i as i64,
            &format!("Client {i}"),
            Role::Client,
        )
        .await
        .expect("seed client");
    }

    // Seeding mirrors the verified identity into the local user table
    let owner = user::find_by_id(&pool, OWNER_ID)
        .await
        .expect("user lookup")
        .expect("owner mirrored");
    assert_eq!(owner.role, Role::Owner);

    let created = restaurant::create(
        &pool,
        OWNER_ID,
        RestaurantCreate {
            name: "La Marea".to_string(),
            chair_amount: CHAIRS,
        },
    )
    .await
    .expect("seed restaurant");
    let rid = created.id;

    let manager = state.reservations.clone();
    let date = now_millis() + 3_600_000;

    for wave in 0..WAVES {
        // 一波并发预订请求
        let barrier = Arc::new(Barrier::new(REQUESTS_PER_WAVE));
        let mut handles = Vec::new();
        for i in 0..REQUESTS_PER_WAVE {
            let manager = manager.clone();
            let barrier = barrier.clone();
            let client_id = FIRST_CLIENT_ID + i as i64;
            handles.push(tokio::spawn(async move {
                let diners = rand::thread_rng().gen_range(1..=8);
                barrier.wait().await;
                manager.create(rid, client_id, date, diners).await
            }));
        }

        let mut admitted = Vec::new();
        for handle in handles {
            match handle.await.expect("task join") {
                Ok(res) => admitted.push(res),
                Err(booking_server::ReservationError::InsufficientCapacity { .. }) => {}
                Err(e) => panic!("unexpected error in wave {wave}: {e}"),
            }
        }

        // 不变量：活跃人数 <= 座位数
        let occupied = reservation::sum_active_diners(&pool, rid)
            .await
            .expect("occupancy sum");
        assert!(
            occupied <= CHAIRS,
            "wave {wave}: occupied {occupied} exceeds {CHAIRS} chairs"
        );

        // 店主随机处理一部分，再取消一部分释放座位，进入下一波
        for (i, res) in admitted.iter().enumerate() {
            let next = if i % 3 == 0 {
                ReservationStatus::Cancelled
            } else if i % 3 == 1 {
                ReservationStatus::Accepted
            } else {
                ReservationStatus::Rejected
            };
            manager
                .update_status(res.id, next, OWNER_ID)
                .await
                .expect("owner transition");
        }

        let occupied = reservation::sum_active_diners(&pool, rid)
            .await
            .expect("occupancy sum");
        assert!(occupied <= CHAIRS);
    }

    // 最终全量核对：逐行累加活跃预订，和 SUM 查询一致
    let views = reservation::list_views_for_restaurant(&pool, rid)
        .await
        .expect("list reservations");
    let manual_sum: i64 = views
        .iter()
        .filter(|v| v.status.is_active())
        .map(|v| v.diners)
        .sum();
    let occupied = reservation::sum_active_diners(&pool, rid)
        .await
        .expect("occupancy sum");
    assert_eq!(manual_sum, occupied);
    assert!(occupied <= CHAIRS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn full_house_backfills_after_cancellations() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let state = initialize_state(&tmp).await;
    let pool = state.get_db();

    user::ensure(&pool, OWNER_ID, "Stress Owner", Role::Owner)
        .await
        .expect("seed owner");
    user::ensure(&pool, FIRST_CLIENT_ID, "Client A", Role::Client)
        .await
        .expect("seed client");
    user::ensure(&pool, FIRST_CLIENT_ID + 1, "Client B", Role::Client)
        .await
        .expect("seed client");

    let created = restaurant::create(
        &pool,
        OWNER_ID,
        RestaurantCreate {
            name: "El Faro".to_string(),
            chair_amount: 12,
        },
    )
    .await
    .expect("seed restaurant");
    let rid = created.id;

    let manager = state.reservations.clone();
    let date = now_millis() + 3_600_000;

    // 填满
    let mut held = Vec::new();
    for _ in 0..3 {
        held.push(
            manager
                .create(rid, FIRST_CLIENT_ID, date, 4)
                .await
                .expect("fill up"),
        );
    }
    assert_eq!(manager.availability(rid).await.expect("availability"), 0);

    // 并发：客人逐个取消，同时另一位客人反复尝试补位
    let canceller = {
        let manager = manager.clone();
        let held = held.clone();
        tokio::spawn(async move {
            for res in held {
                manager
                    .cancel_by_client(res.id, FIRST_CLIENT_ID)
                    .await
                    .expect("client cancel");
                tokio::task::yield_now().await;
            }
        })
    };
    let backfiller = {
        let manager = manager.clone();
        tokio::spawn(async move {
            let mut admitted: i64 = 0;
            for _ in 0..200 {
                match manager.create(rid, FIRST_CLIENT_ID + 1, date, 4).await {
                    Ok(_) => admitted += 1,
                    Err(booking_server::ReservationError::InsufficientCapacity { .. }) => {
                        tokio::task::yield_now().await;
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
                if admitted == 3 {
                    break;
                }
            }
            admitted
        })
    };

    canceller.await.expect("canceller join");
    let admitted = backfiller.await.expect("backfiller join");

    let occupied = reservation::sum_active_diners(&pool, rid)
        .await
        .expect("occupancy sum");
    assert!(occupied <= 12, "occupied {occupied} exceeds 12 chairs");
    assert_eq!(occupied, admitted * 4);
}
