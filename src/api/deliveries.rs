use crate::api::errors::ApiError;
use crate::auth::{AuthedUser, CourierPrincipal, CustomerPrincipal};
use crate::db::DeliveryOperations;
use crate::enums::deliveries::{
    AddressResp, AddressesResp, CreateAddressReq, DeliveriesResp, DeliveryListQuery, DeliveryResp,
    UpdateDeliveryStatusReq,
};
use crate::models::common::DeliveryStatus;
use actix_web::{get, post, put, web, HttpResponse, Responder};
use log::{debug, error};

#[utoipa::path(
    tag = "Delivery",
    request_body = UpdateDeliveryStatusReq,
    responses(
        (status = 200, description = "Delivery advanced", body = DeliveryResp),
        (status = 400, description = "Transition not allowed", body = crate::api::errors::ErrorBody),
        (status = 403, description = "Caller is not a courier", body = crate::api::errors::ErrorBody),
        (status = 404, description = "Delivery not found or not this courier's", body = crate::api::errors::ErrorBody),
    ),
    summary = "Advance a delivery through its state machine"
)]
#[put("/{delivery_id}/status")]
pub(super) async fn update_delivery_status(
    delivery_ops: web::Data<DeliveryOperations>,
    caller: CourierPrincipal,
    path: web::Path<(i32,)>,
    req_data: web::Json<UpdateDeliveryStatusReq>,
) -> Result<impl Responder, ApiError> {
    let delivery_id = path.into_inner().0;
    let next_status = req_data.into_inner().status;

    let updated = delivery_ops
        .update_status(caller.user_id(), delivery_id, next_status)
        .map_err(|e| {
            error!(
                "update_delivery_status: error advancing delivery {} for courier user {}: {}",
                delivery_id,
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    debug!(
        "update_delivery_status: delivery {} now {}",
        delivery_id,
        updated.status.as_str()
    );
    Ok(HttpResponse::Ok().json(DeliveryResp {
        status: "ok".to_string(),
        data: Some(updated),
        error: None,
    }))
}

#[utoipa::path(
    tag = "Delivery",
    params(
        ("status" = Option<String>, Query, description = "Delivery status filter, defaults to ASSIGNED"),
    ),
    responses(
        (status = 200, description = "Deliveries for the caller's orders", body = DeliveriesResp),
        (status = 400, description = "Unknown status value", body = crate::api::errors::ErrorBody),
    ),
    summary = "List deliveries attached to the caller's orders"
)]
#[get("")]
pub(super) async fn get_deliveries(
    delivery_ops: web::Data<DeliveryOperations>,
    caller: AuthedUser,
    query: web::Query<DeliveryListQuery>,
) -> Result<impl Responder, ApiError> {
    let status = match query.into_inner().status {
        Some(raw) => DeliveryStatus::from_str(&raw)
            .ok_or_else(|| ApiError::BadInput(format!("Unknown delivery status: {raw}")))?,
        None => DeliveryStatus::Assigned,
    };

    let deliveries = delivery_ops
        .get_deliveries_for_user(caller.user_id(), status)
        .map_err(|e| {
            error!(
                "get_deliveries: error listing deliveries for user {}: {}",
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(DeliveriesResp {
        status: "ok".to_string(),
        data: deliveries,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Delivery",
    responses(
        (status = 200, description = "The courier's active delivery, if any", body = DeliveryResp),
        (status = 403, description = "Caller is not a courier", body = crate::api::errors::ErrorBody),
    ),
    summary = "Get the calling courier's active delivery"
)]
#[get("/active")]
pub(super) async fn get_active_delivery(
    delivery_ops: web::Data<DeliveryOperations>,
    caller: CourierPrincipal,
) -> Result<impl Responder, ApiError> {
    let delivery = delivery_ops
        .get_active_delivery_for_courier(caller.user_id())
        .map_err(|e| {
            error!(
                "get_active_delivery: error for courier user {}: {}",
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(DeliveryResp {
        status: "ok".to_string(),
        data: delivery,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Address",
    request_body = CreateAddressReq,
    responses(
        (status = 200, description = "Address saved", body = AddressResp),
        (status = 403, description = "Caller is not a customer", body = crate::api::errors::ErrorBody),
    ),
    summary = "Save a delivery address"
)]
#[post("/addresses")]
pub(super) async fn create_address(
    delivery_ops: web::Data<DeliveryOperations>,
    caller: CustomerPrincipal,
    req_data: web::Json<CreateAddressReq>,
) -> Result<impl Responder, ApiError> {
    let CreateAddressReq { title, address } = req_data.into_inner();
    let created = delivery_ops
        .create_address(caller.user_id(), &title, &address)
        .map_err(|e| {
            error!(
                "create_address: error saving address for user {}: {}",
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(AddressResp {
        status: "ok".to_string(),
        data: Some(created),
        error: None,
    }))
}

#[utoipa::path(
    tag = "Address",
    responses(
        (status = 200, description = "The caller's saved addresses", body = AddressesResp),
        (status = 403, description = "Caller is not a customer", body = crate::api::errors::ErrorBody),
    ),
    summary = "List the caller's saved delivery addresses"
)]
#[get("/addresses")]
pub(super) async fn get_addresses(
    delivery_ops: web::Data<DeliveryOperations>,
    caller: CustomerPrincipal,
) -> Result<impl Responder, ApiError> {
    let addresses = delivery_ops.get_addresses(caller.user_id()).map_err(|e| {
        error!(
            "get_addresses: error listing addresses for user {}: {}",
            caller.user_id(),
            e
        );
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(AddressesResp {
        status: "ok".to_string(),
        data: addresses,
        error: None,
    }))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, delivery_ops: &DeliveryOperations) {
    cfg.service(
        web::scope("/deliveries")
            .app_data(web::Data::new(delivery_ops.clone()))
            .service(create_address)
            .service(get_addresses)
            .service(get_active_delivery)
            .service(update_delivery_status)
            .service(get_deliveries),
    );
}
