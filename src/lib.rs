pub mod api;
pub mod auth;
pub mod db;
pub mod enums;
pub mod models;
pub mod test_utils;

use crate::auth::config::JwtConfig;
use crate::db::{
    establish_connection_pool, run_db_migrations, CartOperations, DeliveryOperations,
    OrderOperations, RestaurantOperations, UserOperations,
};

#[derive(Clone)]
pub struct AppState {
    pub user_ops: UserOperations,
    pub cart_ops: CartOperations,
    pub order_ops: OrderOperations,
    pub delivery_ops: DeliveryOperations,
    pub restaurant_ops: RestaurantOperations,
    pub jwt_cfg: JwtConfig,
}

impl AppState {
    pub fn new(url: &str) -> Self {
        let db = establish_connection_pool(url);
        run_db_migrations(db.clone()).expect("Unable to run migrations");

        let jwt_cfg = JwtConfig::from_env();

        AppState {
            user_ops: UserOperations::new(db.clone()),
            cart_ops: CartOperations::new(db.clone()),
            order_ops: OrderOperations::new(db.clone()),
            delivery_ops: DeliveryOperations::new(db.clone()),
            restaurant_ops: RestaurantOperations::new(db),
            jwt_cfg,
        }
    }
}
