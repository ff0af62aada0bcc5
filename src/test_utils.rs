use crate::db::{establish_connection_pool, run_db_migrations, DbConnection, DbPool, RepositoryError};
use crate::models::common::{CourierStatus, UserRole};
use diesel::prelude::*;
use diesel::PgConnection;
use std::sync::Once;

// Fixture strategy:
// - Build users/restaurants/menu items via helpers below.
// - Passwords are pre-hashed at low cost to keep tests fast.
const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_PASSWORD: &str = "hunter2-fixture";
static TEST_THREADS_GUARD: Once = Once::new();

fn ensure_single_threaded_tests() {
    TEST_THREADS_GUARD.call_once(|| {
        let threads = test_threads_from_args().or_else(|| std::env::var("RUST_TEST_THREADS").ok());
        if threads.as_deref() != Some("1") {
            panic!(
                "Tests must run with --test-threads=1 or RUST_TEST_THREADS=1 because init_test_env mutates environment variables."
            );
        }
    });
}

fn test_threads_from_args() -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == "--test-threads" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--test-threads=") {
            return Some(value.to_string());
        }
    }
    None
}

fn set_env_if_unset(key: &str, value: &str) {
    if std::env::var_os(key).is_none() {
        std::env::set_var(key, value);
    }
}

pub fn init_test_env() {
    ensure_single_threaded_tests();
    set_env_if_unset("JWT_SECRET", TEST_JWT_SECRET);
}

pub fn build_test_pool(database_url: &str) -> DbPool {
    let pool = establish_connection_pool(database_url);
    run_db_migrations(pool.clone()).expect("Unable to run migrations");
    pool
}

pub fn reset_db(pool: &DbPool) -> Result<(), RepositoryError> {
    let mut conn = DbConnection::new(pool)?;
    diesel::sql_query(
        "TRUNCATE TABLE delivery_addresses, deliveries, delivery_people, order_items, orders, \
         cart_items, carts, menu_items, restaurants, users RESTART IDENTITY CASCADE",
    )
    .execute(conn.connection())
    .map_err(RepositoryError::DatabaseError)?;
    Ok(())
}

pub struct TestFixtures {
    pub customer_id: i32,
    pub courier_user_id: i32,
    pub courier_id: i32,
    pub restaurant_id: i32,
    pub menu_item_ids: Vec<i32>,
}

/// One customer, one AVAILABLE courier, one restaurant with two menu items
/// priced 500 and 1000 minor units.
pub fn seed_basic_fixtures(pool: &DbPool) -> Result<TestFixtures, RepositoryError> {
    let mut conn = DbConnection::new(pool)?;

    let customer_id = insert_user(
        conn.connection(),
        "customer1@example.com",
        "555-0001",
        "Customer One",
        UserRole::Customer,
    )?;
    let courier_user_id = insert_user(
        conn.connection(),
        "courier1@example.com",
        "555-0002",
        "Courier One",
        UserRole::DeliveryPerson,
    )?;
    let courier_id = insert_courier(conn.connection(), courier_user_id)?;
    let restaurant_id = insert_restaurant(conn.connection(), "Test Bistro", "Main Street 1")?;
    let cheap_item_id = insert_menu_item(
        conn.connection(),
        restaurant_id,
        "Garden Salad",
        500,
        Some("Simple green salad"),
    )?;
    let pricey_item_id = insert_menu_item(
        conn.connection(),
        restaurant_id,
        "House Burger",
        1000,
        Some("Burger with fries"),
    )?;

    Ok(TestFixtures {
        customer_id,
        courier_user_id,
        courier_id,
        restaurant_id,
        menu_item_ids: vec![cheap_item_id, pricey_item_id],
    })
}

pub fn insert_user(
    conn: &mut PgConnection,
    user_email: &str,
    user_phone: &str,
    name: &str,
    user_role: UserRole,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::users::dsl::*;

    // Cost 4 keeps fixture setup fast; never use this cost in production.
    let hash = bcrypt::hash(TEST_PASSWORD, 4)
        .map_err(|e| RepositoryError::Internal(format!("hash failure: {e}")))?;

    diesel::insert_into(users)
        .values((
            email.eq(user_email),
            phone.eq(user_phone),
            password_hash.eq(hash),
            full_name.eq(name),
            role.eq(user_role),
        ))
        .returning(user_id)
        .get_result::<i32>(conn)
        .map_err(RepositoryError::DatabaseError)
}

pub fn insert_courier(conn: &mut PgConnection, owner_user_id: i32) -> Result<i32, RepositoryError> {
    use crate::db::schema::delivery_people::dsl::*;

    diesel::insert_into(delivery_people)
        .values((user_id.eq(owner_user_id), status.eq(CourierStatus::Available)))
        .returning(courier_id)
        .get_result::<i32>(conn)
        .map_err(RepositoryError::DatabaseError)
}

pub fn insert_restaurant(
    conn: &mut PgConnection,
    restaurant_name: &str,
    restaurant_location: &str,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::restaurants::dsl::*;

    diesel::insert_into(restaurants)
        .values((name.eq(restaurant_name), location.eq(restaurant_location)))
        .returning(restaurant_id)
        .get_result::<i32>(conn)
        .map_err(RepositoryError::DatabaseError)
}

pub fn insert_menu_item(
    conn: &mut PgConnection,
    owning_restaurant_id: i32,
    item_name: &str,
    item_price: i32,
    item_description: Option<&str>,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::menu_items::dsl::*;

    diesel::insert_into(menu_items)
        .values((
            restaurant_id.eq(owning_restaurant_id),
            name.eq(item_name),
            price.eq(item_price),
            description.eq(item_description),
        ))
        .returning(item_id)
        .get_result::<i32>(conn)
        .map_err(RepositoryError::DatabaseError)
}
