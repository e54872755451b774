use super::*;

#[tokio::test]
async fn admits_within_capacity() {
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 10).await;

    let created = ctx
        .manager
        .create(rid, CLIENT_ID, future_date(), 4)
        .await
        .unwrap();

    assert_eq!(created.status, ReservationStatus::Pending);
    assert_eq!(created.diners, 4);
    assert_eq!(ctx.manager.availability(rid).await.unwrap(), 6);
    assert_capacity_invariant(&ctx.pool, rid).await;
}

#[tokio::test]
async fn exact_fit_then_full() {
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 4).await;

    ctx.manager
        .create(rid, CLIENT_ID, future_date(), 4)
        .await
        .unwrap();

    let err = ctx
        .manager
        .create(rid, OTHER_CLIENT_ID, future_date(), 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReservationError::InsufficientCapacity {
            requested: 1,
            available: 0
        }
    ));
    assert_eq!(ctx.manager.availability(rid).await.unwrap(), 0);
}

#[tokio::test]
async fn rejected_request_writes_nothing() {
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 5).await;

    ctx.manager
        .create(rid, CLIENT_ID, future_date(), 3)
        .await
        .unwrap();
    let before = ctx.manager.availability(rid).await.unwrap();

    let err = ctx
        .manager
        .create(rid, OTHER_CLIENT_ID, future_date(), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InsufficientCapacity { .. }));
    assert_eq!(ctx.manager.availability(rid).await.unwrap(), before);
}

#[tokio::test]
async fn validates_input() {
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 10).await;

    for diners in [0, -2] {
        let err = ctx
            .manager
            .create(rid, CLIENT_ID, future_date(), diners)
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidInput(_)));
    }

    let err = ctx
        .manager
        .create(rid, CLIENT_ID, 0, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_restaurant() {
    let ctx = create_test_context().await;

    let err = ctx
        .manager
        .create(999_999, CLIENT_ID, future_date(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::RestaurantNotFound(999_999)));

    let err = ctx.manager.availability(999_999).await.unwrap_err();
    assert!(matches!(err, ReservationError::RestaurantNotFound(_)));
}

#[tokio::test]
async fn past_dated_requests_are_admitted() {
    // Walk-in logging: the platform does not reject past dates
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 6).await;

    let created = ctx
        .manager
        .create(rid, CLIENT_ID, past_date(), 2)
        .await
        .unwrap();
    assert_eq!(created.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn seat_pool_is_shared_across_dates() {
    // One pool for all dates: a booking next Monday blocks next Tuesday too
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 10).await;

    let monday = future_date();
    let tuesday = monday + 86_400_000;

    ctx.manager.create(rid, CLIENT_ID, monday, 6).await.unwrap();
    let err = ctx
        .manager
        .create(rid, OTHER_CLIENT_ID, tuesday, 6)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InsufficientCapacity { .. }));
}

#[tokio::test]
async fn availability_read_is_idempotent() {
    let ctx = create_test_context().await;
    let rid = seed_restaurant(&ctx, 8).await;

    ctx.manager
        .create(rid, CLIENT_ID, future_date(), 3)
        .await
        .unwrap();

    let first = ctx.manager.availability(rid).await.unwrap();
    let second = ctx.manager.availability(rid).await.unwrap();
    assert_eq!(first, 5);
    assert_eq!(first, second);
}
