pub mod carts;
pub mod deliveries;
pub mod orders;
pub mod restaurants;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope for operations with nothing to return.
#[derive(Serialize, ToSchema)]
pub struct OkResp {
    pub status: String,
    pub error: Option<String>,
}

impl OkResp {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }
}
