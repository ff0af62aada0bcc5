use crate::models::common::{CourierStatus, DeliveryStatus};
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::deliveries)]
#[diesel(primary_key(delivery_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Delivery {
    pub delivery_id: i32,
    pub order_id: i32,
    pub courier_id: i32,
    pub status: DeliveryStatus,
    pub deliver_by: DateTime<Utc>,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::deliveries)]
pub struct NewDelivery {
    pub order_id: i32,
    pub courier_id: i32,
    pub status: DeliveryStatus,
    pub deliver_by: DateTime<Utc>,
    pub delivery_address: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::delivery_people)]
pub struct NewDeliveryPerson {
    pub user_id: i32,
    pub status: CourierStatus,
}

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::delivery_addresses)]
#[diesel(primary_key(address_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryAddress {
    pub address_id: i32,
    pub user_id: i32,
    pub title: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::delivery_addresses)]
pub struct NewDeliveryAddress {
    pub user_id: i32,
    pub title: String,
    pub address: String,
}
