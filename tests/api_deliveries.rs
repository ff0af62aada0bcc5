mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use fleetbite::models::common::UserRole;
use serde_json::{json, Value};

async fn place_order_via_http<S, B>(
    app: &S,
    customer: &(actix_web::http::header::HeaderName, String),
    item_id: i32,
) -> (i64, i64)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let resp = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/carts/items")
            .insert_header(customer.clone())
            .set_json(json!({ "item_id": item_id }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let cart_id = body["data"]["cart_id"].as_i64().expect("cart id");

    let resp = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header(customer.clone())
            .set_json(json!({ "cart_id": cart_id, "delivery_address": "1 Elm Street" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    (
        body["data"]["order_id"].as_i64().expect("order id"),
        body["data"]["delivery_id"].as_i64().expect("delivery id"),
    )
}

#[actix_rt::test]
async fn courier_drives_a_delivery_to_completion() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let customer = common::auth_header(fixtures.customer_id, UserRole::Customer);
    let courier = common::auth_header(fixtures.courier_user_id, UserRole::DeliveryPerson);

    let (_order_id, delivery_id) =
        place_order_via_http(&app, &customer, fixtures.menu_item_ids[0]).await;

    // The assignment shows up as the courier's active delivery.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries/active")
            .insert_header(courier.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["delivery_id"].as_i64(), Some(delivery_id));

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/deliveries/{delivery_id}/status"))
            .insert_header(courier.clone())
            .set_json(json!({ "status": "IN_TRANSIT" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "IN_TRANSIT");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/deliveries/{delivery_id}/status"))
            .insert_header(courier.clone())
            .set_json(json!({ "status": "DELIVERED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Delivered work leaves the active slot empty again.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries/active")
            .insert_header(courier)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"].is_null());
}

#[actix_rt::test]
async fn customers_cannot_drive_deliveries() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let customer = common::auth_header(fixtures.customer_id, UserRole::Customer);

    let (_order_id, delivery_id) =
        place_order_via_http(&app, &customer, fixtures.menu_item_ids[0]).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/deliveries/{delivery_id}/status"))
            .insert_header(customer)
            .set_json(json!({ "status": "IN_TRANSIT" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[actix_rt::test]
async fn skipping_a_delivery_stage_is_rejected() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let customer = common::auth_header(fixtures.customer_id, UserRole::Customer);
    let courier = common::auth_header(fixtures.courier_user_id, UserRole::DeliveryPerson);

    let (_order_id, delivery_id) =
        place_order_via_http(&app, &customer, fixtures.menu_item_ids[0]).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/deliveries/{delivery_id}/status"))
            .insert_header(courier)
            .set_json(json!({ "status": "DELIVERED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_USER_INPUT");
}

#[actix_rt::test]
async fn delivery_listing_filters_and_validates_status() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let customer = common::auth_header(fixtures.customer_id, UserRole::Customer);

    let (_order_id, delivery_id) =
        place_order_via_http(&app, &customer, fixtures.menu_item_ids[0]).await;

    // Defaults to ASSIGNED.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries")
            .insert_header(customer.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["delivery_id"].as_i64(), Some(delivery_id));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries?status=IN_TRANSIT")
            .insert_header(customer.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries?status=LOST_IN_SPACE")
            .insert_header(customer)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_USER_INPUT");
}

#[actix_rt::test]
async fn customers_manage_their_address_book() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let customer = common::auth_header(fixtures.customer_id, UserRole::Customer);
    let courier = common::auth_header(fixtures.courier_user_id, UserRole::DeliveryPerson);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/deliveries/addresses")
            .insert_header(customer.clone())
            .set_json(json!({ "title": "Home", "address": "1 Elm Street" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Home");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries/addresses")
            .insert_header(customer)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // The address book is a customer surface.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deliveries/addresses")
            .insert_header(courier)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
