use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::{CourierStatus, DeliveryStatus, OrderStatus};
use crate::models::delivery::{Delivery, DeliveryAddress, NewDeliveryAddress};
use chrono::Utc;
use diesel::prelude::*;
use log::{debug, error};

#[derive(Clone)]
pub struct DeliveryOperations {
    pool: DbPool,
}

impl DeliveryOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Advance a delivery through ASSIGNED -> IN_TRANSIT -> DELIVERED.
    ///
    /// Only the courier assigned to the delivery may drive it. Reaching
    /// DELIVERED cascades in the same transaction: the order is marked
    /// DELIVERED and the courier goes back to AVAILABLE.
    pub fn update_status(
        &self,
        courier_user_id: i32,
        target_delivery_id: i32,
        next_status: DeliveryStatus,
    ) -> Result<Delivery, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("update_status: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            let (current_status, owning_courier_id, delivered_order_id): (DeliveryStatus, i32, i32);
            {
                use crate::db::schema::*;
                (current_status, owning_courier_id, delivered_order_id) = deliveries::table
                    .inner_join(
                        delivery_people::table
                            .on(deliveries::courier_id.eq(delivery_people::courier_id)),
                    )
                    .filter(deliveries::delivery_id.eq(target_delivery_id))
                    .filter(delivery_people::user_id.eq(courier_user_id))
                    .select((
                        deliveries::status,
                        deliveries::courier_id,
                        deliveries::order_id,
                    ))
                    .first::<(DeliveryStatus, i32, i32)>(conn)
                    .optional()
                    .map_err(RepositoryError::DatabaseError)?
                    .ok_or_else(|| {
                        RepositoryError::NotFound(format!(
                            "Delivery {} not found for courier user {}",
                            target_delivery_id, courier_user_id
                        ))
                    })?;
            }

            if !current_status.can_transition_to(next_status) {
                return Err(RepositoryError::ValidationError(format!(
                    "Invalid delivery transition {} -> {}",
                    current_status.as_str(),
                    next_status.as_str()
                )));
            }

            let updated: Delivery;
            {
                use crate::db::schema::deliveries::dsl::*;
                updated = diesel::update(deliveries.filter(delivery_id.eq(target_delivery_id)))
                    .set(status.eq(next_status))
                    .returning(Delivery::as_returning())
                    .get_result::<Delivery>(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            if next_status == DeliveryStatus::Delivered {
                {
                    use crate::db::schema::orders::dsl::*;
                    diesel::update(orders.filter(order_id.eq(delivered_order_id)))
                        .set((status.eq(OrderStatus::Delivered), updated_at.eq(Utc::now())))
                        .execute(conn)
                        .map_err(RepositoryError::DatabaseError)?;
                }
                {
                    use crate::db::schema::delivery_people::dsl::*;
                    diesel::update(delivery_people.filter(courier_id.eq(owning_courier_id)))
                        .set(status.eq(CourierStatus::Available))
                        .execute(conn)
                        .map_err(RepositoryError::DatabaseError)?;
                }
                debug!(
                    "update_status: delivery {} completed, order {} delivered, courier {} freed",
                    target_delivery_id, delivered_order_id, owning_courier_id
                );
            } else {
                debug!(
                    "update_status: delivery {} moved to {}",
                    target_delivery_id,
                    next_status.as_str()
                );
            }

            Ok(updated)
        })
    }

    /// Customer view: deliveries attached to the caller's orders.
    pub fn get_deliveries_for_user(
        &self,
        search_user_id: i32,
        search_status: DeliveryStatus,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_deliveries_for_user: failed to acquire DB connection for user {}: {}",
                search_user_id, e
            );
            e
        })?;

        use crate::db::schema::*;
        deliveries::table
            .inner_join(orders::table.on(deliveries::order_id.eq(orders::order_id)))
            .filter(orders::user_id.eq(search_user_id))
            .filter(deliveries::status.eq(search_status))
            .select(Delivery::as_select())
            .order_by(deliveries::created_at.desc())
            .load::<Delivery>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_deliveries_for_user: error loading deliveries for user {}: {}",
                    search_user_id, e
                );
                RepositoryError::DatabaseError(e)
            })
    }

    /// Courier view: the delivery currently assigned to the calling courier,
    /// if any. DELIVERED rows are history, not active work.
    pub fn get_active_delivery_for_courier(
        &self,
        courier_user_id: i32,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_active_delivery_for_courier: failed to acquire DB connection for user {}: {}",
                courier_user_id, e
            );
            e
        })?;

        use crate::db::schema::*;
        deliveries::table
            .inner_join(
                delivery_people::table.on(deliveries::courier_id.eq(delivery_people::courier_id)),
            )
            .filter(delivery_people::user_id.eq(courier_user_id))
            .filter(deliveries::status.ne(DeliveryStatus::Delivered))
            .select(Delivery::as_select())
            .first::<Delivery>(conn.connection())
            .optional()
            .map_err(|e| {
                error!(
                    "get_active_delivery_for_courier: error loading delivery for user {}: {}",
                    courier_user_id, e
                );
                RepositoryError::DatabaseError(e)
            })
    }

    pub fn create_address(
        &self,
        userid: i32,
        title: &str,
        address: &str,
    ) -> Result<DeliveryAddress, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_address: failed to acquire DB connection: {}", e);
            e
        })?;

        if title.trim().is_empty() || address.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "Address title and address are required".to_string(),
            ));
        }

        use crate::db::schema::delivery_addresses::dsl::delivery_addresses;
        diesel::insert_into(delivery_addresses)
            .values(&NewDeliveryAddress {
                user_id: userid,
                title: title.to_string(),
                address: address.to_string(),
            })
            .returning(DeliveryAddress::as_returning())
            .get_result::<DeliveryAddress>(conn.connection())
            .map_err(|e| {
                error!(
                    "create_address: error creating address for user {}: {}",
                    userid, e
                );
                RepositoryError::DatabaseError(e)
            })
    }

    pub fn get_addresses(&self, userid: i32) -> Result<Vec<DeliveryAddress>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_addresses: failed to acquire DB connection for user {}: {}",
                userid, e
            );
            e
        })?;

        use crate::db::schema::delivery_addresses::dsl::*;
        delivery_addresses
            .filter(user_id.eq(userid))
            .order_by(created_at.desc())
            .select(DeliveryAddress::as_select())
            .load::<DeliveryAddress>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_addresses: error loading addresses for user {}: {}",
                    userid, e
                );
                RepositoryError::DatabaseError(e)
            })
    }
}
