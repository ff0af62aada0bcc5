use crate::models::restaurant::{MenuItem, Restaurant};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RestaurantsResp {
    pub status: String,
    pub data: Vec<Restaurant>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MenuResp {
    pub status: String,
    pub data: Vec<MenuItem>,
    pub error: Option<String>,
}
