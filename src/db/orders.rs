use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::{CourierStatus, DeliveryStatus, OrderStatus};
use crate::models::delivery::NewDelivery;
use crate::models::order::{NewOrder, NewOrderItem, Order, PlacedOrder};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use log::{debug, error};

/// Estimated lead time stamped on every new delivery.
const DELIVERY_LEAD_MINUTES: i64 = 30;

#[derive(Queryable, Debug)]
struct PricedCartLine {
    item_id: i32,
    quantity: i32,
    unit_price: i32,
    restaurant_id: i32,
}

#[derive(Clone)]
pub struct OrderOperations {
    pool: DbPool,
}

impl OrderOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Convert a cart into an order plus an assigned delivery.
    ///
    /// Runs as one transaction: claim a courier, snapshot the cart lines into
    /// order items, create the delivery, consume the cart. Any failure rolls
    /// the whole sequence back. The courier claim uses `FOR UPDATE SKIP
    /// LOCKED` so two concurrent placements can never reserve the same row.
    pub fn place_order(
        &self,
        userid: i32,
        target_cart_id: i32,
        address: &str,
    ) -> Result<PlacedOrder, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("place_order: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            let claimed_courier_id = Self::claim_available_courier(conn)?;

            // Cart must exist and belong to the caller; both cases read as
            // not-found so callers learn nothing about other users' carts.
            {
                use crate::db::schema::carts::dsl::*;
                let owner = carts
                    .filter(cart_id.eq(target_cart_id))
                    .select(user_id)
                    .first::<i32>(conn)
                    .optional()
                    .map_err(RepositoryError::DatabaseError)?;
                match owner {
                    Some(owner_id) if owner_id == userid => {}
                    _ => {
                        return Err(RepositoryError::NotFound(format!(
                            "Cart {} not found for user {}",
                            target_cart_id, userid
                        )))
                    }
                }
            }

            let lines: Vec<PricedCartLine>;
            {
                use crate::db::schema::*;
                lines = cart_items::table
                    .inner_join(menu_items::table.on(cart_items::item_id.eq(menu_items::item_id)))
                    .filter(cart_items::cart_id.eq(target_cart_id))
                    .select((
                        cart_items::item_id,
                        cart_items::quantity,
                        menu_items::price,
                        menu_items::restaurant_id,
                    ))
                    .load::<PricedCartLine>(conn)
                    .map_err(|e| {
                        error!(
                            "place_order: error loading cart lines for cart {}: {}",
                            target_cart_id, e
                        );
                        RepositoryError::DatabaseError(e)
                    })?;
            }

            if lines.is_empty() {
                return Err(RepositoryError::EmptyCart);
            }

            // Authoritative total, never taken from the client. Summed in
            // i64 so oversized quantities fail the narrowing check instead
            // of wrapping.
            let total: i64 = lines
                .iter()
                .map(|l| i64::from(l.unit_price) * i64::from(l.quantity))
                .sum();
            let order_total = i32::try_from(total).map_err(|_| {
                RepositoryError::ValidationError(format!(
                    "Order total for cart {} exceeds the representable price range",
                    target_cart_id
                ))
            })?;
            let order_restaurant_id = lines[0].restaurant_id;

            let new_order_id: i32;
            {
                use crate::db::schema::orders::dsl::*;
                new_order_id = diesel::insert_into(orders)
                    .values(&NewOrder {
                        user_id: userid,
                        restaurant_id: order_restaurant_id,
                        total_price: order_total,
                        status: OrderStatus::Pending,
                    })
                    .returning(order_id)
                    .get_result::<i32>(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            {
                let snapshot: Vec<NewOrderItem> = lines
                    .iter()
                    .map(|l| NewOrderItem {
                        order_id: new_order_id,
                        item_id: l.item_id,
                        quantity: l.quantity,
                    })
                    .collect();

                use crate::db::schema::order_items::dsl::*;
                diesel::insert_into(order_items)
                    .values(&snapshot)
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            let new_delivery_id: i32;
            {
                use crate::db::schema::deliveries::dsl::*;
                new_delivery_id = diesel::insert_into(deliveries)
                    .values(&NewDelivery {
                        order_id: new_order_id,
                        courier_id: claimed_courier_id,
                        status: DeliveryStatus::Assigned,
                        deliver_by: Utc::now() + Duration::minutes(DELIVERY_LEAD_MINUTES),
                        delivery_address: address.to_string(),
                    })
                    .returning(delivery_id)
                    .get_result::<i32>(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            // The cart is consumed exactly once the order exists; lines
            // cascade away with it.
            {
                use crate::db::schema::carts::dsl::*;
                diesel::delete(carts.filter(cart_id.eq(target_cart_id)))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            debug!(
                "place_order: cart {} became order {} (total {}) with delivery {} via courier {}",
                target_cart_id, new_order_id, order_total, new_delivery_id, claimed_courier_id
            );

            Ok(PlacedOrder {
                order_id: new_order_id,
                delivery_id: new_delivery_id,
            })
        })
    }

    /// Cancel a PENDING order owned by the caller and release its courier.
    /// The lookup filter rejects non-PENDING orders as not-found.
    pub fn cancel_order(&self, userid: i32, target_order_id: i32) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("cancel_order: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            {
                use crate::db::schema::orders::dsl::*;
                let cancellable = orders
                    .filter(order_id.eq(target_order_id))
                    .filter(user_id.eq(userid))
                    .filter(status.eq(OrderStatus::Pending))
                    .select(order_id)
                    .first::<i32>(conn)
                    .optional()
                    .map_err(RepositoryError::DatabaseError)?;

                if cancellable.is_none() {
                    return Err(RepositoryError::NotFound(format!(
                        "Order {} not found",
                        target_order_id
                    )));
                }

                diesel::update(orders.filter(order_id.eq(target_order_id)))
                    .set((status.eq(OrderStatus::Cancelled), updated_at.eq(Utc::now())))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            // A missing delivery row makes the courier release a no-op.
            let assigned_courier: Option<i32>;
            {
                use crate::db::schema::deliveries::dsl::*;
                assigned_courier = deliveries
                    .filter(order_id.eq(target_order_id))
                    .select(courier_id)
                    .first::<i32>(conn)
                    .optional()
                    .map_err(RepositoryError::DatabaseError)?;
            }

            if let Some(freed_courier_id) = assigned_courier {
                {
                    use crate::db::schema::delivery_people::dsl::*;
                    diesel::update(delivery_people.filter(courier_id.eq(freed_courier_id)))
                        .set(status.eq(CourierStatus::Available))
                        .execute(conn)
                        .map_err(RepositoryError::DatabaseError)?;
                }
                {
                    use crate::db::schema::deliveries::dsl::*;
                    diesel::delete(deliveries.filter(order_id.eq(target_order_id)))
                        .execute(conn)
                        .map_err(RepositoryError::DatabaseError)?;
                }
            }

            debug!(
                "cancel_order: order {} cancelled for user {}, courier released: {:?}",
                target_order_id, userid, assigned_courier
            );

            Ok(())
        })
    }

    pub fn get_orders_by_restaurant(
        &self,
        search_restaurant_id: i32,
        search_status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_orders_by_restaurant: failed to acquire DB connection for restaurant {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        use crate::db::schema::orders::dsl::*;
        orders
            .filter(restaurant_id.eq(search_restaurant_id))
            .filter(status.eq(search_status))
            .order_by(created_at.desc())
            .select(Order::as_select())
            .load::<Order>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_orders_by_restaurant: error loading orders for restaurant {}: {}",
                    search_restaurant_id, e
                );
                RepositoryError::DatabaseError(e)
            })
    }

    pub fn get_orders_by_user(&self, search_user_id: i32) -> Result<Vec<Order>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_orders_by_user: failed to acquire DB connection for user {}: {}",
                search_user_id, e
            );
            e
        })?;

        use crate::db::schema::orders::dsl::*;
        orders
            .filter(user_id.eq(search_user_id))
            .order_by(created_at.desc())
            .select(Order::as_select())
            .load::<Order>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_orders_by_user: error loading orders for user {}: {}",
                    search_user_id, e
                );
                RepositoryError::DatabaseError(e)
            })
    }

    /// Atomically claim one AVAILABLE courier and flip them UNAVAILABLE.
    /// `SKIP LOCKED` makes concurrent placements pass over a row another
    /// transaction is claiming instead of blocking on it.
    fn claim_available_courier(conn: &mut PgConnection) -> Result<i32, RepositoryError> {
        use crate::db::schema::delivery_people::dsl::*;

        let candidate = delivery_people
            .filter(status.eq(CourierStatus::Available))
            .order_by(courier_id.asc())
            .limit(1)
            .for_update()
            .skip_locked()
            .select(courier_id)
            .first::<i32>(conn)
            .optional()
            .map_err(RepositoryError::DatabaseError)?;

        let claimed = candidate.ok_or(RepositoryError::NoCourierAvailable)?;

        diesel::update(delivery_people.filter(courier_id.eq(claimed)))
            .set(status.eq(CourierStatus::Unavailable))
            .execute(conn)
            .map_err(RepositoryError::DatabaseError)?;

        Ok(claimed)
    }
}
