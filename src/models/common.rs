use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use serde::{Deserialize, Serialize};
use std::io::Write;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = crate::db::schema::sql_types::UserRole)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    DeliveryPerson,
    RestaurantOwner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::DeliveryPerson => "DELIVERY_PERSON",
            UserRole::RestaurantOwner => "RESTAURANT_OWNER",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "CUSTOMER" => Some(UserRole::Customer),
            "DELIVERY_PERSON" => Some(UserRole::DeliveryPerson),
            "RESTAURANT_OWNER" => Some(UserRole::RestaurantOwner),
            _ => None,
        }
    }
}

impl ToSql<crate::db::schema::sql_types::UserRole, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<crate::db::schema::sql_types::UserRole, Pg> for UserRole {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let value = std::str::from_utf8(bytes.as_bytes())?;
        UserRole::from_str(value).ok_or_else(|| format!("unknown user_role: {value}").into())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = crate::db::schema::sql_types::OrderStatus)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OrderStatus::Pending),
            "IN_PROGRESS" => Some(OrderStatus::InProgress),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl ToSql<crate::db::schema::sql_types::OrderStatus, Pg> for OrderStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<crate::db::schema::sql_types::OrderStatus, Pg> for OrderStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let value = std::str::from_utf8(bytes.as_bytes())?;
        OrderStatus::from_str(value).ok_or_else(|| format!("unknown order_status: {value}").into())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = crate::db::schema::sql_types::DeliveryStatus)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Assigned,
    InTransit,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "ASSIGNED",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "ASSIGNED" => Some(DeliveryStatus::Assigned),
            "IN_TRANSIT" => Some(DeliveryStatus::InTransit),
            "DELIVERED" => Some(DeliveryStatus::Delivered),
            _ => None,
        }
    }

    /// Transitions are one-way: ASSIGNED -> IN_TRANSIT -> DELIVERED.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Assigned, DeliveryStatus::InTransit)
                | (DeliveryStatus::InTransit, DeliveryStatus::Delivered)
        )
    }
}

impl ToSql<crate::db::schema::sql_types::DeliveryStatus, Pg> for DeliveryStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<crate::db::schema::sql_types::DeliveryStatus, Pg> for DeliveryStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let value = std::str::from_utf8(bytes.as_bytes())?;
        DeliveryStatus::from_str(value)
            .ok_or_else(|| format!("unknown delivery_status: {value}").into())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = crate::db::schema::sql_types::CourierStatus)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourierStatus {
    Available,
    Unavailable,
}

impl CourierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourierStatus::Available => "AVAILABLE",
            CourierStatus::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "AVAILABLE" => Some(CourierStatus::Available),
            "UNAVAILABLE" => Some(CourierStatus::Unavailable),
            _ => None,
        }
    }
}

impl ToSql<crate::db::schema::sql_types::CourierStatus, Pg> for CourierStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<crate::db::schema::sql_types::CourierStatus, Pg> for CourierStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let value = std::str::from_utf8(bytes.as_bytes())?;
        CourierStatus::from_str(value)
            .ok_or_else(|| format!("unknown courier_status: {value}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_only_moves_forward() {
        assert!(DeliveryStatus::Assigned.can_transition_to(DeliveryStatus::InTransit));
        assert!(DeliveryStatus::InTransit.can_transition_to(DeliveryStatus::Delivered));

        assert!(!DeliveryStatus::Assigned.can_transition_to(DeliveryStatus::Delivered));
        assert!(!DeliveryStatus::InTransit.can_transition_to(DeliveryStatus::Assigned));
        assert!(!DeliveryStatus::Delivered.can_transition_to(DeliveryStatus::InTransit));
        assert!(!DeliveryStatus::Delivered.can_transition_to(DeliveryStatus::Delivered));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in ["PENDING", "IN_PROGRESS", "DELIVERED", "CANCELLED"] {
            assert_eq!(OrderStatus::from_str(status).unwrap().as_str(), status);
        }
        assert!(OrderStatus::from_str("SHIPPED").is_none());
        assert!(DeliveryStatus::from_str("LOST").is_none());
        assert!(UserRole::from_str("ADMIN").is_none());
    }
}
