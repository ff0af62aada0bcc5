use diesel::{Insertable, Queryable};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub item_id: i32,
    pub quantity: i32,
}

/// Cart line joined with its menu item, the shape handed back to clients.
#[derive(Queryable, Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub cart_item_id: i32,
    pub cart_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub unit_price: i32,
    pub quantity: i32,
}
