mod auth;
mod carts;
mod deliveries;
pub mod errors;
mod orders;
mod restaurants;
mod users;

use crate::AppState;
use actix_web::{get, web, HttpResponse, Responder};
pub use errors::default_error_handler;

#[get("/")]
async fn root_endpoint() -> impl Responder {
    HttpResponse::Ok().body("Server up!")
}

#[get("/health")]
async fn health_endpoint() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(root_endpoint)
        .service(health_endpoint)
        .configure(|cfg| auth::config(cfg, &state.user_ops, &state.jwt_cfg))
        .configure(|cfg| users::config(cfg, &state.user_ops))
        .configure(|cfg| carts::config(cfg, &state.cart_ops))
        .configure(|cfg| orders::config(cfg, &state.order_ops))
        .configure(|cfg| deliveries::config(cfg, &state.delivery_ops))
        .configure(|cfg| restaurants::config(cfg, &state.restaurant_ops));
}
