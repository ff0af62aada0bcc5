mod common;

use std::sync::{Arc, Barrier};

use diesel::prelude::*;
use fleetbite::db::{CartOperations, DbConnection, OrderOperations, RepositoryError};
use fleetbite::models::common::{CourierStatus, DeliveryStatus, OrderStatus, UserRole};
use fleetbite::test_utils::insert_user;

#[actix_rt::test]
async fn place_order_converts_cart_atomically() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    // 2 x 500 + 1 x 1000 = 2000.
    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 2)
        .expect("add cheap item");
    cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[1], 1)
        .expect("add pricey item");

    let placed = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    let mut conn = DbConnection::new(&pool).expect("db connection");

    {
        use fleetbite::db::schema::orders::dsl::*;
        let (order_total, order_state, order_restaurant): (i32, OrderStatus, i32) = orders
            .filter(order_id.eq(placed.order_id))
            .select((total_price, status, restaurant_id))
            .first(conn.connection())
            .expect("load order");
        assert_eq!(order_total, 2000);
        assert_eq!(order_state, OrderStatus::Pending);
        assert_eq!(order_restaurant, fixtures.restaurant_id);
    }

    {
        use fleetbite::db::schema::order_items::dsl::*;
        let snapshot: Vec<(i32, i32)> = order_items
            .filter(order_id.eq(placed.order_id))
            .order_by(item_id.asc())
            .select((item_id, quantity))
            .load(conn.connection())
            .expect("load order items");
        assert_eq!(
            snapshot,
            vec![
                (fixtures.menu_item_ids[0], 2),
                (fixtures.menu_item_ids[1], 1)
            ]
        );
    }

    {
        use fleetbite::db::schema::deliveries::dsl::*;
        let (delivery_state, assigned_courier, delivered_address): (DeliveryStatus, i32, String) =
            deliveries
                .filter(delivery_id.eq(placed.delivery_id))
                .select((status, courier_id, delivery_address))
                .first(conn.connection())
                .expect("load delivery");
        assert_eq!(delivery_state, DeliveryStatus::Assigned);
        assert_eq!(assigned_courier, fixtures.courier_id);
        assert_eq!(delivered_address, "1 Elm Street");
    }

    {
        use fleetbite::db::schema::delivery_people::dsl::*;
        let courier_state: CourierStatus = delivery_people
            .filter(courier_id.eq(fixtures.courier_id))
            .select(status)
            .first(conn.connection())
            .expect("load courier");
        assert_eq!(courier_state, CourierStatus::Unavailable);
    }

    // The cart is consumed.
    let err = cart_ops.get_cart(fixtures.customer_id).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[actix_rt::test]
async fn place_order_rejects_empty_cart_and_releases_nothing() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let order_ops = OrderOperations::new(pool.clone());

    let bare_cart_id: i32 = {
        use fleetbite::db::schema::carts::dsl::*;
        let mut conn = DbConnection::new(&pool).expect("db connection");
        diesel::insert_into(carts)
            .values(user_id.eq(fixtures.customer_id))
            .returning(cart_id)
            .get_result(conn.connection())
            .expect("insert bare cart")
    };

    let err = order_ops
        .place_order(fixtures.customer_id, bare_cart_id, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::EmptyCart));

    // The rollback must undo the courier claim made before the cart check.
    let mut conn = DbConnection::new(&pool).expect("db connection");
    use fleetbite::db::schema::delivery_people::dsl::*;
    let courier_state: CourierStatus = delivery_people
        .filter(courier_id.eq(fixtures.courier_id))
        .select(status)
        .first(conn.connection())
        .expect("load courier");
    assert_eq!(courier_state, CourierStatus::Available);
}

#[actix_rt::test]
async fn place_order_fails_without_available_courier() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        use fleetbite::db::schema::delivery_people::dsl::*;
        diesel::update(delivery_people.filter(courier_id.eq(fixtures.courier_id)))
            .set(status.eq(CourierStatus::Unavailable))
            .execute(conn.connection())
            .expect("mark courier busy");
    }

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");

    let err = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NoCourierAvailable));

    // The cart survives a failed placement.
    let lines = cart_ops.get_cart(fixtures.customer_id).expect("get cart");
    assert_eq!(lines.len(), 1);
}

#[actix_rt::test]
async fn oversized_line_totals_fail_placement_cleanly() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let pricey_item = {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        fleetbite::test_utils::insert_menu_item(
            conn.connection(),
            fixtures.restaurant_id,
            "Banquet Package",
            2_000_000,
            None,
        )
        .expect("insert menu item")
    };

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, pricey_item, 1)
        .expect("add item");

    // Force a quantity past the operations-layer cap so the line product
    // exceeds i32 range, as a row written by an older schema might.
    {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        use fleetbite::db::schema::cart_items::dsl::*;
        diesel::update(cart_items.filter(cart_item_id.eq(line.cart_item_id)))
            .set(quantity.eq(3_000_000))
            .execute(conn.connection())
            .expect("inflate quantity");
    }

    let err = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));

    // The rollback releases the courier and keeps the cart.
    let mut conn = DbConnection::new(&pool).expect("db connection");
    {
        use fleetbite::db::schema::delivery_people::dsl::*;
        let courier_state: CourierStatus = delivery_people
            .filter(courier_id.eq(fixtures.courier_id))
            .select(status)
            .first(conn.connection())
            .expect("load courier");
        assert_eq!(courier_state, CourierStatus::Available);
    }
    {
        use fleetbite::db::schema::orders::dsl::orders;
        let order_count: i64 = orders
            .count()
            .get_result(conn.connection())
            .expect("count orders");
        assert_eq!(order_count, 0);
    }
}

#[actix_rt::test]
async fn place_order_hides_foreign_carts() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");

    let other_user = {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        insert_user(
            conn.connection(),
            "intruder@example.com",
            "555-0099",
            "Intruder",
            UserRole::Customer,
        )
        .expect("insert user")
    };

    let err = order_ops
        .place_order(other_user, line.cart_id, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    let err = order_ops
        .place_order(fixtures.customer_id, 99999, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[actix_rt::test]
async fn place_order_cannot_reuse_a_consumed_cart() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");
    order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    // Release the courier so the retry fails on the cart, not the pool.
    {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        use fleetbite::db::schema::delivery_people::dsl::*;
        diesel::update(delivery_people.filter(courier_id.eq(fixtures.courier_id)))
            .set(status.eq(CourierStatus::Available))
            .execute(conn.connection())
            .expect("free courier");
    }

    let err = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[actix_rt::test]
async fn concurrent_placements_never_share_a_courier() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());

    let second_customer = {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        insert_user(
            conn.connection(),
            "rival@example.com",
            "555-0042",
            "Rival Customer",
            UserRole::Customer,
        )
        .expect("insert user")
    };

    let first_cart = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("first cart")
        .cart_id;
    let second_cart = cart_ops
        .add_or_update_item(second_customer, fixtures.menu_item_ids[1], 1)
        .expect("second cart")
        .cart_id;

    // Two placements racing for the single AVAILABLE courier.
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for (customer, cart) in [
        (fixtures.customer_id, first_cart),
        (second_customer, second_cart),
    ] {
        let pool = pool.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            let order_ops = OrderOperations::new(pool);
            barrier.wait();
            order_ops.place_order(customer, cart, "1 Elm Street")
        }));
    }

    let outcomes: Vec<Result<_, _>> = handles
        .into_iter()
        .map(|h| h.join().expect("placement thread"))
        .collect();

    let wins = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(wins, 1, "exactly one placement must claim the courier");
    let loss = outcomes
        .iter()
        .find_map(|o| o.as_ref().err())
        .expect("one placement must lose");
    assert!(matches!(loss, RepositoryError::NoCourierAvailable));

    let mut conn = DbConnection::new(&pool).expect("db connection");
    {
        use fleetbite::db::schema::deliveries::dsl::*;
        let delivery_count: i64 = deliveries
            .count()
            .get_result(conn.connection())
            .expect("count deliveries");
        assert_eq!(delivery_count, 1);
    }
    {
        use fleetbite::db::schema::delivery_people::dsl::*;
        let courier_state: CourierStatus = delivery_people
            .filter(courier_id.eq(fixtures.courier_id))
            .select(status)
            .first(conn.connection())
            .expect("load courier");
        assert_eq!(courier_state, CourierStatus::Unavailable);
    }
}

#[actix_rt::test]
async fn cancel_order_releases_courier_and_drops_delivery() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");
    let placed = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    order_ops
        .cancel_order(fixtures.customer_id, placed.order_id)
        .expect("cancel order");

    let mut conn = DbConnection::new(&pool).expect("db connection");
    {
        use fleetbite::db::schema::orders::dsl::*;
        let order_state: OrderStatus = orders
            .filter(order_id.eq(placed.order_id))
            .select(status)
            .first(conn.connection())
            .expect("load order");
        assert_eq!(order_state, OrderStatus::Cancelled);
    }
    {
        use fleetbite::db::schema::deliveries::dsl::*;
        let remaining: i64 = deliveries
            .filter(order_id.eq(placed.order_id))
            .count()
            .get_result(conn.connection())
            .expect("count deliveries");
        assert_eq!(remaining, 0);
    }
    {
        use fleetbite::db::schema::delivery_people::dsl::*;
        let courier_state: CourierStatus = delivery_people
            .filter(courier_id.eq(fixtures.courier_id))
            .select(status)
            .first(conn.connection())
            .expect("load courier");
        assert_eq!(courier_state, CourierStatus::Available);
    }
}

#[actix_rt::test]
async fn cancel_order_only_touches_own_pending_orders() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");
    let placed = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    let other_user = {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        insert_user(
            conn.connection(),
            "intruder@example.com",
            "555-0099",
            "Intruder",
            UserRole::Customer,
        )
        .expect("insert user")
    };
    let err = order_ops.cancel_order(other_user, placed.order_id).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    // Once the order moves past PENDING, cancellation stops matching it.
    {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        use fleetbite::db::schema::orders::dsl::*;
        diesel::update(orders.filter(order_id.eq(placed.order_id)))
            .set(status.eq(OrderStatus::Delivered))
            .execute(conn.connection())
            .expect("mark delivered");
    }
    let err = order_ops
        .cancel_order(fixtures.customer_id, placed.order_id)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[actix_rt::test]
async fn cancel_order_tolerates_a_missing_delivery_row() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");
    let placed = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    {
        let mut conn = DbConnection::new(&pool).expect("db connection");
        use fleetbite::db::schema::deliveries::dsl::*;
        diesel::delete(deliveries.filter(order_id.eq(placed.order_id)))
            .execute(conn.connection())
            .expect("drop delivery");
    }

    order_ops
        .cancel_order(fixtures.customer_id, placed.order_id)
        .expect("cancel without delivery row");
}

#[actix_rt::test]
async fn order_listings_filter_by_restaurant_status_and_user() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let cart_ops = CartOperations::new(pool.clone());
    let order_ops = OrderOperations::new(pool.clone());

    let line = cart_ops
        .add_or_update_item(fixtures.customer_id, fixtures.menu_item_ids[0], 1)
        .expect("add item");
    let placed = order_ops
        .place_order(fixtures.customer_id, line.cart_id, "1 Elm Street")
        .expect("place order");

    let pending = order_ops
        .get_orders_by_restaurant(fixtures.restaurant_id, OrderStatus::Pending)
        .expect("pending orders");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order_id, placed.order_id);

    let delivered = order_ops
        .get_orders_by_restaurant(fixtures.restaurant_id, OrderStatus::Delivered)
        .expect("delivered orders");
    assert!(delivered.is_empty());

    let mine = order_ops
        .get_orders_by_user(fixtures.customer_id)
        .expect("user orders");
    assert_eq!(mine.len(), 1);

    let theirs = order_ops
        .get_orders_by_user(fixtures.courier_user_id)
        .expect("courier user orders");
    assert!(theirs.is_empty());
}
