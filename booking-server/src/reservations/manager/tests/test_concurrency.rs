use super::*;
use std::sync::Arc;
use tokio::sync::Barrier;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admissions_admit_exactly_one() {
    // chair_amount = 10, two simultaneous requests for 6: one must lose
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 10).await;

    let manager = Arc::new(ctx.manager);
    let barrier = Arc::new(Barrier::new(2));

    let mut handles = Vec::new();
    for client_id in [CLIENT_ID, OTHER_CLIENT_ID] {
        let manager = manager.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            manager.create(rid, client_id, future_date(), 6).await
        }));
    }

    let mut admitted = 0;
    let mut capacity_rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ReservationError::InsufficientCapacity { .. }) => capacity_rejections += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(capacity_rejections, 1);

    let occupied = reservation::sum_active_diners(&ctx.pool, rid).await.unwrap();
    assert_eq!(occupied, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admission_storm_never_oversells() {
    // 10 requests of 3 diners against 20 chairs: exactly 6 fit
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 20).await;

    let manager = Arc::new(ctx.manager);
    let barrier = Arc::new(Barrier::new(10));

    let mut handles = Vec::new();
    for i in 0..10 {
        let manager = manager.clone();
        let barrier = barrier.clone();
        let client_id = if i % 2 == 0 { CLIENT_ID } else { OTHER_CLIENT_ID };
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            manager.create(rid, client_id, future_date(), 3).await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ReservationError::InsufficientCapacity { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(admitted, 6);
    let occupied = reservation::sum_active_diners(&ctx.pool, rid).await.unwrap();
    assert_eq!(occupied, 18);
    assert_capacity_invariant(&ctx.pool, rid).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reinstatement_races_admission_for_the_last_seats() {
    // 10 chairs; a cancelled 6-diner reservation and a fresh 6-diner request
    // race for the same seats: exactly one may hold them afterwards
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 10).await;

    let parked = ctx
        .manager
        .create(rid, CLIENT_ID, future_date(), 6)
        .await
        .unwrap();
    ctx.manager
        .update_status(parked.id, ReservationStatus::Cancelled, OWNER_ID)
        .await
        .unwrap();

    let manager = Arc::new(ctx.manager);
    let barrier = Arc::new(Barrier::new(2));

    let reinstate = {
        let manager = manager.clone();
        let barrier = barrier.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            manager
                .update_status(parked.id, ReservationStatus::Pending, OWNER_ID)
                .await
        })
    };
    let admit = {
        let manager = manager.clone();
        let barrier = barrier.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            manager
                .create(rid, OTHER_CLIENT_ID, future_date(), 6)
                .await
        })
    };

    let outcomes = [
        reinstate.await.unwrap().map(|_| ()),
        admit.await.unwrap().map(|_| ()),
    ];
    let winners = outcomes.iter().filter(|o| o.is_ok()).count();
    let losers = outcomes
        .iter()
        .filter(|o| matches!(o, Err(ReservationError::InsufficientCapacity { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(losers, 1);

    let occupied = reservation::sum_active_diners(&ctx.pool, rid).await.unwrap();
    assert_eq!(occupied, 6);
    assert_capacity_invariant(&ctx.pool, rid).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_restaurants_do_not_contend() {
    let ctx = create_test_context().await;
    let rid_a = seed_restaurant(&ctx, 4).await;
    let rid_b = seed_restaurant(&ctx, 4).await;

    let manager = Arc::new(ctx.manager);
    let barrier = Arc::new(Barrier::new(2));

    let mut handles = Vec::new();
    for rid in [rid_a, rid_b] {
        let manager = manager.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            manager.create(rid, CLIENT_ID, future_date(), 4).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        reservation::sum_active_diners(&ctx.pool, rid_a).await.unwrap(),
        4
    );
    assert_eq!(
        reservation::sum_active_diners(&ctx.pool, rid_b).await.unwrap(),
        4
    );
}
