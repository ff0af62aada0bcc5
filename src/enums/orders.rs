use crate::models::order::{Order, PlacedOrder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct PlaceOrderReq {
    pub cart_id: i32,
    pub delivery_address: String,
}

#[derive(Serialize, ToSchema)]
pub struct PlaceOrderResp {
    pub status: String,
    pub data: Option<PlacedOrder>,
    pub error: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct OrderListQuery {
    /// Defaults to PENDING when omitted.
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OrdersResp {
    pub status: String,
    pub data: Vec<Order>,
    pub error: Option<String>,
}
