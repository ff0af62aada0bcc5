use crate::models::cart::CartLine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AddCartItemReq {
    pub item_id: i32,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct CartLineSpec {
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct ReplaceCartReq {
    pub items: Vec<CartLineSpec>,
}

#[derive(Serialize, ToSchema)]
pub struct CartLineResp {
    pub status: String,
    pub data: Option<CartLine>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CartLinesResp {
    pub status: String,
    pub data: Vec<CartLine>,
    pub error: Option<String>,
}
