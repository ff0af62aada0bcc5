use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::restaurant::{MenuItem, Restaurant};
use diesel::prelude::*;
use log::error;

#[derive(Clone)]
pub struct RestaurantOperations {
    pool: DbPool,
}

impl RestaurantOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn get_all(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("get_all: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::restaurants::dsl::*;
        restaurants
            .order_by(name.asc())
            .select(Restaurant::as_select())
            .load::<Restaurant>(conn.connection())
            .map_err(|e| {
                error!("get_all: error loading restaurants: {}", e);
                RepositoryError::DatabaseError(e)
            })
    }

    pub fn get_menu(&self, search_restaurant_id: i32) -> Result<Vec<MenuItem>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_menu: failed to acquire DB connection for restaurant {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        {
            use crate::db::schema::restaurants::dsl::*;
            let exists = restaurants
                .filter(restaurant_id.eq(search_restaurant_id))
                .select(restaurant_id)
                .first::<i32>(conn.connection())
                .optional()
                .map_err(RepositoryError::DatabaseError)?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound(format!(
                    "Restaurant {} not found",
                    search_restaurant_id
                )));
            }
        }

        use crate::db::schema::menu_items::dsl::*;
        menu_items
            .filter(restaurant_id.eq(search_restaurant_id))
            .order_by(item_id.asc())
            .select(MenuItem::as_select())
            .load::<MenuItem>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_menu: error loading menu for restaurant {}: {}",
                    search_restaurant_id, e
                );
                RepositoryError::DatabaseError(e)
            })
    }
}
