use crate::models::common::UserRole;
use crate::models::user::UserProfile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignupReq {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Defaults to CUSTOMER when omitted.
    pub role: Option<UserRole>,
}

#[derive(Serialize, ToSchema)]
pub struct SignupResp {
    pub status: String,
    pub data: Option<UserProfile>,
    pub error: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    /// Email address or phone number.
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResp {
    pub status: String,
    pub token: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResp {
    pub status: String,
    pub data: Option<UserProfile>,
    pub error: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    pub full_name: Option<String>,
    pub address: Option<String>,
}
