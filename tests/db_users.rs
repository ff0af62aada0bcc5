mod common;

use diesel::prelude::*;
use fleetbite::db::{DbConnection, RepositoryError, UserOperations};
use fleetbite::models::common::{CourierStatus, UserRole};

#[actix_rt::test]
async fn signup_creates_profile_and_courier_capacity_row() {
    let pool = common::setup_pool();
    let user_ops = UserOperations::new(pool.clone());

    let customer = user_ops
        .create_user(
            "alice@example.com",
            "555-0001",
            "s3cret-password",
            "Alice",
            UserRole::Customer,
        )
        .expect("create customer");
    assert_eq!(customer.role, UserRole::Customer);

    let courier = user_ops
        .create_user(
            "bob@example.com",
            "555-0002",
            "s3cret-password",
            "Bob",
            UserRole::DeliveryPerson,
        )
        .expect("create courier");

    let mut conn = DbConnection::new(&pool).expect("db connection");
    {
        use fleetbite::db::schema::delivery_people::dsl::*;
        let rows: Vec<(i32, CourierStatus)> = delivery_people
            .select((user_id, status))
            .load(conn.connection())
            .expect("load couriers");
        assert_eq!(rows, vec![(courier.user_id, CourierStatus::Available)]);
    }
}

#[actix_rt::test]
async fn signup_rejects_duplicates_and_blank_fields() {
    let pool = common::setup_pool();
    let user_ops = UserOperations::new(pool);

    user_ops
        .create_user(
            "alice@example.com",
            "555-0001",
            "s3cret-password",
            "Alice",
            UserRole::Customer,
        )
        .expect("create customer");

    // Same email, different phone.
    let err = user_ops
        .create_user(
            "alice@example.com",
            "555-0009",
            "s3cret-password",
            "Alice Again",
            UserRole::Customer,
        )
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));

    // Same phone, different email.
    let err = user_ops
        .create_user(
            "alice2@example.com",
            "555-0001",
            "s3cret-password",
            "Alice Again",
            UserRole::Customer,
        )
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));

    let err = user_ops
        .create_user("", "555-0003", "s3cret-password", "Nameless", UserRole::Customer)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));
}

#[actix_rt::test]
async fn login_accepts_email_or_phone_and_rejects_bad_passwords() {
    let pool = common::setup_pool();
    let user_ops = UserOperations::new(pool);

    let created = user_ops
        .create_user(
            "alice@example.com",
            "555-0001",
            "s3cret-password",
            "Alice",
            UserRole::Customer,
        )
        .expect("create customer");

    let by_email = user_ops
        .verify_credentials("alice@example.com", "s3cret-password")
        .expect("login by email");
    assert_eq!(by_email.user_id, created.user_id);

    let by_phone = user_ops
        .verify_credentials("555-0001", "s3cret-password")
        .expect("login by phone");
    assert_eq!(by_phone.user_id, created.user_id);

    let err = user_ops
        .verify_credentials("alice@example.com", "wrong-password")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidCredentials));

    let err = user_ops
        .verify_credentials("nobody@example.com", "s3cret-password")
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[actix_rt::test]
async fn profile_reads_and_updates() {
    let pool = common::setup_pool();
    let user_ops = UserOperations::new(pool);

    let created = user_ops
        .create_user(
            "alice@example.com",
            "555-0001",
            "s3cret-password",
            "Alice",
            UserRole::Customer,
        )
        .expect("create customer");

    let profile = user_ops.get_profile(created.user_id).expect("get profile");
    assert_eq!(profile.email, "alice@example.com");

    let updated = user_ops
        .update_profile(
            created.user_id,
            Some("Alice B".to_string()),
            Some("2 Oak Avenue".to_string()),
        )
        .expect("update profile");
    assert_eq!(updated.full_name, "Alice B");
    assert_eq!(updated.address.as_deref(), Some("2 Oak Avenue"));

    let err = user_ops
        .update_profile(created.user_id, None, None)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));

    let err = user_ops.get_profile(99999).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}
