use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, Error, HttpMessage};
use futures::future::LocalBoxFuture;

use crate::api::errors::ApiError;
use crate::auth::config::JwtConfig;
use crate::auth::jwt::verify_jwt;
use crate::auth::Principal;

/// Verifies the bearer token once per request and stores the resulting
/// `Principal` in request extensions for the role extractors.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_cfg: JwtConfig,
}

impl AuthLayer {
    pub fn new(jwt_cfg: JwtConfig) -> Self {
        Self { jwt_cfg }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            inner: self.clone(),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
    inner: AuthLayer,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Bypass only '/', '/health' and the login/signup endpoints
        let path = req.path().to_string();
        if path == "/" || path == "/health" || path == "/auth/signup" || path == "/auth/login" {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token_opt = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string());
        if token_opt.as_deref().unwrap_or("").is_empty() {
            return Box::pin(async {
                Err(ApiError::Unauthorized("missing or invalid auth header".to_string()).into())
            });
        }

        let token = token_opt.unwrap();
        let inner = self.inner.clone();
        let srv = self.service.clone();
        Box::pin(async move {
            match verify_jwt(&token, &inner.jwt_cfg) {
                Ok((user_id, role)) => {
                    req.extensions_mut().insert(Principal { user_id, role });
                    srv.call(req).await
                }
                Err(_) => Err(ApiError::Unauthorized("unauthorized".to_string()).into()),
            }
        })
    }
}
