use crate::api::errors::ApiError;
use crate::auth::AuthedUser;
use crate::db::UserOperations;
use crate::enums::users::{ProfileResp, UpdateProfileReq};
use actix_web::{get, put, web, HttpResponse, Responder};
use log::error;

#[utoipa::path(
    tag = "User",
    responses(
        (status = 200, description = "Current profile", body = ProfileResp),
        (status = 401, description = "Not authenticated", body = crate::api::errors::ErrorBody),
    ),
    summary = "Get the calling user's profile"
)]
#[get("/me")]
pub(super) async fn get_me(
    user_ops: web::Data<UserOperations>,
    caller: AuthedUser,
) -> Result<impl Responder, ApiError> {
    let profile = user_ops.get_profile(caller.user_id()).map_err(|e| {
        error!("get_me: error loading profile for user {}: {}", caller.user_id(), e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(ProfileResp {
        status: "ok".to_string(),
        data: Some(profile),
        error: None,
    }))
}

#[utoipa::path(
    tag = "User",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResp),
        (status = 400, description = "Nothing to update", body = crate::api::errors::ErrorBody),
    ),
    summary = "Update the calling user's name or address"
)]
#[put("/me")]
pub(super) async fn update_me(
    user_ops: web::Data<UserOperations>,
    caller: AuthedUser,
    req_data: web::Json<UpdateProfileReq>,
) -> Result<impl Responder, ApiError> {
    let UpdateProfileReq { full_name, address } = req_data.into_inner();
    let profile = user_ops
        .update_profile(caller.user_id(), full_name, address)
        .map_err(|e| {
            error!(
                "update_me: error updating profile for user {}: {}",
                caller.user_id(),
                e
            );
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ProfileResp {
        status: "ok".to_string(),
        data: Some(profile),
        error: None,
    }))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, user_ops: &UserOperations) {
    cfg.service(
        web::scope("/users")
            .app_data(web::Data::new(user_ops.clone()))
            .service(get_me)
            .service(update_me),
    );
}
