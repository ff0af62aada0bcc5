use crate::api::errors::ApiError;
use crate::auth::principal::Principal;
use crate::models::common::UserRole;
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

/// Any authenticated caller, regardless of role.
pub struct AuthedUser(pub Principal);

impl AuthedUser {
    pub fn user_id(&self) -> i32 {
        self.0.user_id
    }
    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

impl FromRequest for AuthedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(p) = req.extensions().get::<Principal>() {
            return ready(Ok(AuthedUser(p.clone())));
        }
        ready(Err(ApiError::Unauthorized("missing principal".to_string()).into()))
    }
}

/// The single role gate: every handler states the role it requires by the
/// extractor it takes, instead of checking role strings inline.
fn require_role(req: &HttpRequest, required: UserRole) -> Result<Principal, Error> {
    let Some(p) = req.extensions().get::<Principal>().cloned() else {
        return Err(ApiError::Unauthorized("missing principal".to_string()).into());
    };
    if p.role != required {
        return Err(ApiError::Forbidden(format!("{} role required", required.as_str())).into());
    }
    Ok(p)
}

pub struct CustomerPrincipal {
    user_id: i32,
}

impl CustomerPrincipal {
    pub fn user_id(&self) -> i32 {
        self.user_id
    }
}

impl FromRequest for CustomerPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(require_role(req, UserRole::Customer).map(|p| CustomerPrincipal {
            user_id: p.user_id,
        }))
    }
}

pub struct CourierPrincipal {
    user_id: i32,
}

impl CourierPrincipal {
    pub fn user_id(&self) -> i32 {
        self.user_id
    }
}

impl FromRequest for CourierPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            require_role(req, UserRole::DeliveryPerson).map(|p| CourierPrincipal {
                user_id: p.user_id,
            }),
        )
    }
}
