use crate::models::common::OrderStatus;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::orders)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub restaurant_id: i32,
    pub total_price: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::orders)]
pub struct NewOrder {
    pub user_id: i32,
    pub restaurant_id: i32,
    pub total_price: i32,
    pub status: OrderStatus,
}

/// Snapshot of a cart line at placement time, never mutated afterwards.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
}

/// Durable result of a successful placement.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub delivery_id: i32,
}
