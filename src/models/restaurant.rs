use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::restaurants)]
#[diesel(primary_key(restaurant_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Restaurant {
    pub restaurant_id: i32,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::restaurants)]
pub struct NewRestaurant {
    pub name: String,
    pub location: String,
}

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::menu_items)]
#[diesel(primary_key(item_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItem {
    pub item_id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::menu_items)]
pub struct NewMenuItem {
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
}
