use crate::models::common::DeliveryStatus;
use crate::models::delivery::{Delivery, DeliveryAddress};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateDeliveryStatusReq {
    pub status: DeliveryStatus,
}

#[derive(Deserialize, ToSchema)]
pub struct DeliveryListQuery {
    /// Defaults to ASSIGNED when omitted.
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DeliveryResp {
    pub status: String,
    pub data: Option<Delivery>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DeliveriesResp {
    pub status: String,
    pub data: Vec<Delivery>,
    pub error: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAddressReq {
    pub title: String,
    pub address: String,
}

#[derive(Serialize, ToSchema)]
pub struct AddressResp {
    pub status: String,
    pub data: Option<DeliveryAddress>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AddressesResp {
    pub status: String,
    pub data: Vec<DeliveryAddress>,
    pub error: Option<String>,
}
