use crate::api::errors::ApiError;
use crate::auth::AuthedUser;
use crate::db::RestaurantOperations;
use crate::enums::restaurants::{MenuResp, RestaurantsResp};
use actix_web::{get, web, HttpResponse, Responder};
use log::error;

#[utoipa::path(
    tag = "Restaurant",
    responses(
        (status = 200, description = "All restaurants", body = RestaurantsResp),
    ),
    summary = "List restaurants"
)]
#[get("")]
pub(super) async fn get_restaurants(
    restaurant_ops: web::Data<RestaurantOperations>,
    _caller: AuthedUser,
) -> Result<impl Responder, ApiError> {
    let restaurants = restaurant_ops.get_all().map_err(|e| {
        error!("get_restaurants: error listing restaurants: {}", e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(RestaurantsResp {
        status: "ok".to_string(),
        data: restaurants,
        error: None,
    }))
}

#[utoipa::path(
    tag = "Restaurant",
    responses(
        (status = 200, description = "Menu for one restaurant", body = MenuResp),
        (status = 404, description = "Restaurant not found", body = crate::api::errors::ErrorBody),
    ),
    summary = "List a restaurant's menu items"
)]
#[get("/{restaurant_id}/menu")]
pub(super) async fn get_menu(
    restaurant_ops: web::Data<RestaurantOperations>,
    _caller: AuthedUser,
    path: web::Path<(i32,)>,
) -> Result<impl Responder, ApiError> {
    let restaurant_id = path.into_inner().0;
    let menu = restaurant_ops.get_menu(restaurant_id).map_err(|e| {
        error!(
            "get_menu: error loading menu for restaurant {}: {}",
            restaurant_id, e
        );
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(MenuResp {
        status: "ok".to_string(),
        data: menu,
        error: None,
    }))
}

pub(super) fn config(cfg: &mut web::ServiceConfig, restaurant_ops: &RestaurantOperations) {
    cfg.service(
        web::scope("/restaurants")
            .app_data(web::Data::new(restaurant_ops.clone()))
            .service(get_restaurants)
            .service(get_menu),
    );
}
