use crate::api::errors::ApiError;
use crate::auth::config::JwtConfig;
use crate::auth::jwt::issue_jwt;
use crate::db::UserOperations;
use crate::enums::users::{LoginReq, LoginResp, SignupReq, SignupResp};
use crate::models::common::UserRole;
use actix_web::{post, web, HttpResponse, Responder};
use log::{debug, error};

#[utoipa::path(
    tag = "Auth",
    request_body = SignupReq,
    responses(
        (status = 200, description = "Account created", body = SignupResp),
        (status = 400, description = "Missing fields or user already exists", body = crate::api::errors::ErrorBody),
    ),
    summary = "Register a new account"
)]
#[post("/signup")]
pub(super) async fn signup(
    user_ops: web::Data<UserOperations>,
    req_data: web::Json<SignupReq>,
) -> Result<impl Responder, ApiError> {
    let SignupReq {
        full_name,
        email,
        phone,
        password,
        role,
    } = req_data.into_inner();
    let role = role.unwrap_or(UserRole::Customer);

    let profile = user_ops
        .create_user(&email, &phone, &password, &full_name, role)
        .map_err(|e| {
            error!("signup: failed to create account for '{}': {}", email, e);
            ApiError::from(e)
        })?;

    debug!("signup: account {} created for '{}'", profile.user_id, email);
    Ok(HttpResponse::Ok().json(SignupResp {
        status: "ok".to_string(),
        data: Some(profile),
        error: None,
    }))
}

#[utoipa::path(
    tag = "Auth",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Authenticated, token issued", body = LoginResp),
        (status = 401, description = "Wrong password", body = crate::api::errors::ErrorBody),
        (status = 404, description = "Unknown identifier", body = crate::api::errors::ErrorBody),
    ),
    summary = "Authenticate and obtain a bearer token"
)]
#[post("/login")]
pub(super) async fn login(
    user_ops: web::Data<UserOperations>,
    jwt_cfg: web::Data<JwtConfig>,
    req_data: web::Json<LoginReq>,
) -> Result<impl Responder, ApiError> {
    let LoginReq {
        identifier,
        password,
    } = req_data.into_inner();

    let user = user_ops
        .verify_credentials(&identifier, &password)
        .map_err(|e| {
            error!("login: authentication failed for '{}': {}", identifier, e);
            ApiError::from(e)
        })?;

    let token = issue_jwt(user.user_id, user.role, &jwt_cfg).map_err(|e| {
        error!("login: failed to issue token for user {}: {}", user.user_id, e);
        ApiError::Internal
    })?;

    debug!("login: user {} authenticated", user.user_id);
    Ok(HttpResponse::Ok().json(LoginResp {
        status: "ok".to_string(),
        token: Some(token),
        error: None,
    }))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, user_ops: &UserOperations, jwt_cfg: &JwtConfig) {
    cfg.service(
        web::scope("/auth")
            .app_data(web::Data::new(user_ops.clone()))
            .app_data(web::Data::new(jwt_cfg.clone()))
            .service(signup)
            .service(login),
    );
}
