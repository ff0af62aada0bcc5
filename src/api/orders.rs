use crate::api::errors::ApiError;
use crate::auth::{AuthedUser, CustomerPrincipal};
use crate::db::OrderOperations;
use crate::enums::orders::{OrderListQuery, OrdersResp, PlaceOrderReq, PlaceOrderResp};
use crate::models::common::OrderStatus;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use log::{debug, error};

#[utoipa::path(
    tag = "Orders",
    request_body = PlaceOrderReq,
    responses(
        (status = 200, description = "Order placed and courier assigned", body = PlaceOrderResp),
        (status = 400, description = "Empty cart or no courier available", body = crate::api::errors::ErrorBody),
        (status = 403, description = "Caller is not a customer", body = crate::api::errors::ErrorBody),
        (status = 404, description = "Cart not found", body = crate::api::errors::ErrorBody),
    ),
    summary = "Convert a cart into an order with an assigned delivery"
)]
#[post("")]
pub(super) async fn place_order(
    order_ops: web::Data<OrderOperations>,
    caller: CustomerPrincipal,
    req_data: web::Json<PlaceOrderReq>,
) -> Result<impl Responder, ApiError> {
    let PlaceOrderReq {
        cart_id,
        delivery_address,
    } = req_data.into_inner();

    if delivery_address.trim().is_empty() {
        return Err(ApiError::BadInput(
            "Delivery address is required".to_string(),
        ));
    }

    let placed = order_ops
        .place_order(caller.user_id(), cart_id, &delivery_address)
        .map_err(|e| {
            error!(
                "place_order: placement failed for cart {} of user {}: {}",
                cart_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    debug!(
        "place_order: user {} placed order {} with delivery {}",
        caller.user_id(),
        placed.order_id,
        placed.delivery_id
    );
    Ok(HttpResponse::Ok().json(PlaceOrderResp {
        status: "ok".to_string(),
        data: Some(placed),
        error: None,
    }))
}

#[utoipa::path(
    tag = "Orders",
    responses(
        (status = 200, description = "Order cancelled, courier released", body = crate::enums::OkResp),
        (status = 404, description = "No PENDING order with this id for the caller", body = crate::api::errors::ErrorBody),
    ),
    summary = "Cancel a PENDING order"
)]
#[delete("/{order_id}")]
pub(super) async fn cancel_order(
    order_ops: web::Data<OrderOperations>,
    caller: CustomerPrincipal,
    path: web::Path<(i32,)>,
) -> Result<impl Responder, ApiError> {
    let order_id = path.into_inner().0;
    order_ops
        .cancel_order(caller.user_id(), order_id)
        .map_err(|e| {
            error!(
                "cancel_order: cancellation failed for order {} of user {}: {}",
                order_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    debug!(
        "cancel_order: order {} cancelled by user {}",
        order_id,
        caller.user_id()
    );
    Ok(HttpResponse::Ok().json(crate::enums::OkResp::ok()))
}

#[utoipa::path(
    tag = "Orders",
    params(
        ("restaurant_id", description = "Restaurant whose orders to list"),
        ("status" = Option<String>, Query, description = "Order status filter, defaults to PENDING"),
    ),
    responses(
        (status = 200, description = "Orders for the restaurant", body = OrdersResp),
        (status = 400, description = "Unknown status value", body = crate::api::errors::ErrorBody),
    ),
    summary = "List a restaurant's orders by status"
)]
#[get("/restaurant/{restaurant_id}")]
pub(super) async fn get_orders_by_restaurant(
    order_ops: web::Data<OrderOperations>,
    _caller: AuthedUser,
    path: web::Path<(i32,)>,
    query: web::Query<OrderListQuery>,
) -> Result<impl Responder, ApiError> {
    let restaurant_id = path.into_inner().0;
    let status = match query.into_inner().status {
        Some(raw) => OrderStatus::from_str(&raw)
            .ok_or_else(|| ApiError::BadInput(format!("Unknown order status: {raw}")))?,
        None => OrderStatus::Pending,
    };

    let orders = order_ops
        .get_orders_by_restaurant(restaurant_id, status)
        .map_err(|e| {
            error!(
                "get_orders_by_restaurant: error listing orders for restaurant {}: {}",
                restaurant_id, e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(OrdersResp {
        status: "ok".to_string(),
        data: orders,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Orders",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = OrdersResp),
    ),
    summary = "List the caller's own orders"
)]
#[get("")]
pub(super) async fn get_my_orders(
    order_ops: web::Data<OrderOperations>,
    caller: AuthedUser,
) -> Result<impl Responder, ApiError> {
    let orders = order_ops.get_orders_by_user(caller.user_id()).map_err(|e| {
        error!(
            "get_my_orders: error listing orders for user {}: {}",
            caller.user_id(),
            e
        );
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(OrdersResp {
        status: "ok".to_string(),
        data: orders,
        error: None,
    }))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, order_ops: &OrderOperations) {
    cfg.service(
        web::scope("/orders")
            .app_data(web::Data::new(order_ops.clone()))
            .service(place_order)
            .service(cancel_order)
            .service(get_orders_by_restaurant)
            .service(get_my_orders),
    );
}
