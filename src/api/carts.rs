use crate::api::errors::ApiError;
use crate::auth::AuthedUser;
use crate::db::CartOperations;
use crate::enums::carts::{AddCartItemReq, CartLineResp, CartLinesResp, ReplaceCartReq};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::{debug, error};

#[utoipa::path(
    tag = "Cart",
    request_body = AddCartItemReq,
    responses(
        (status = 200, description = "Line added or merged", body = CartLineResp),
        (status = 404, description = "Unknown menu item", body = crate::api::errors::ErrorBody),
        (status = 400, description = "Invalid quantity", body = crate::api::errors::ErrorBody),
    ),
    summary = "Add a menu item to the caller's cart"
)]
#[post("/items")]
pub(super) async fn add_cart_item(
    cart_ops: web::Data<CartOperations>,
    caller: AuthedUser,
    req_data: web::Json<AddCartItemReq>,
) -> Result<impl Responder, ApiError> {
    let AddCartItemReq { item_id, quantity } = req_data.into_inner();
    let line = cart_ops
        .add_or_update_item(caller.user_id(), item_id, quantity.unwrap_or(1))
        .map_err(|e| {
            error!(
                "add_cart_item: error adding item {} for user {}: {}",
                item_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    debug!(
        "add_cart_item: user {} holds {} x item {}",
        caller.user_id(),
        line.quantity,
        item_id
    );
    Ok(HttpResponse::Ok().json(CartLineResp {
        status: "ok".to_string(),
        data: Some(line),
        error: None,
    }))
}

#[utoipa::path(
    tag = "Cart",
    responses(
        (status = 200, description = "Cart lines", body = CartLinesResp),
        (status = 404, description = "No cart or cart empty", body = crate::api::errors::ErrorBody),
    ),
    summary = "Get the caller's cart"
)]
#[get("")]
pub(super) async fn get_cart(
    cart_ops: web::Data<CartOperations>,
    caller: AuthedUser,
) -> Result<impl Responder, ApiError> {
    let lines = cart_ops.get_cart(caller.user_id()).map_err(|e| {
        error!(
            "get_cart: error loading cart for user {}: {}",
            caller.user_id(),
            e
        );
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(CartLinesResp {
        status: "ok".to_string(),
        data: lines,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Cart",
    responses(
        (status = 200, description = "Remaining lines", body = CartLinesResp),
        (status = 403, description = "Line belongs to another user", body = crate::api::errors::ErrorBody),
        (status = 404, description = "Line not found", body = crate::api::errors::ErrorBody),
    ),
    summary = "Remove one line from the caller's cart"
)]
#[delete("/items/{cart_item_id}")]
pub(super) async fn delete_cart_item(
    cart_ops: web::Data<CartOperations>,
    caller: AuthedUser,
    path: web::Path<(i32,)>,
) -> Result<impl Responder, ApiError> {
    let cart_item_id = path.into_inner().0;
    let remaining = cart_ops
        .delete_item(caller.user_id(), cart_item_id)
        .map_err(|e| {
            error!(
                "delete_cart_item: error deleting line {} for user {}: {}",
                cart_item_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(CartLinesResp {
        status: "ok".to_string(),
        data: remaining,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Cart",
    request_body = ReplaceCartReq,
    responses(
        (status = 200, description = "New cart lines", body = CartLinesResp),
        (status = 403, description = "Cart belongs to another user", body = crate::api::errors::ErrorBody),
    ),
    summary = "Replace all lines of a cart"
)]
#[put("/{cart_id}")]
pub(super) async fn replace_cart(
    cart_ops: web::Data<CartOperations>,
    caller: AuthedUser,
    path: web::Path<(i32,)>,
    req_data: web::Json<ReplaceCartReq>,
) -> Result<impl Responder, ApiError> {
    let cart_id = path.into_inner().0;
    let lines: Vec<(i32, i32)> = req_data
        .into_inner()
        .items
        .into_iter()
        .map(|l| (l.item_id, l.quantity))
        .collect();

    let new_lines = cart_ops
        .replace_cart(caller.user_id(), cart_id, lines)
        .map_err(|e| {
            error!(
                "replace_cart: error replacing cart {} for user {}: {}",
                cart_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(CartLinesResp {
        status: "ok".to_string(),
        data: new_lines,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Cart",
    responses(
        (status = 200, description = "Cart deleted", body = crate::enums::OkResp),
        (status = 403, description = "Cart belongs to another user", body = crate::api::errors::ErrorBody),
    ),
    summary = "Delete a cart outright"
)]
#[delete("/{cart_id}")]
pub(super) async fn delete_cart(
    cart_ops: web::Data<CartOperations>,
    caller: AuthedUser,
    path: web::Path<(i32,)>,
) -> Result<impl Responder, ApiError> {
    let cart_id = path.into_inner().0;
    cart_ops
        .delete_cart(caller.user_id(), cart_id)
        .map_err(|e| {
            error!(
                "delete_cart: error deleting cart {} for user {}: {}",
                cart_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(crate::enums::OkResp::ok()))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, cart_ops: &CartOperations) {
    cfg.service(
        web::scope("/carts")
            .app_data(web::Data::new(cart_ops.clone()))
            .service(add_cart_item)
            .service(get_cart)
            .service(delete_cart_item)
            .service(replace_cart)
            .service(delete_cart),
    );
}
