use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::cart::{CartLine, NewCartItem};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::upsert::excluded;
use diesel::PgConnection;
use log::{debug, error};
use std::collections::BTreeMap;

/// Upper bound on a single cart line's quantity, including merges.
pub const MAX_LINE_QUANTITY: i32 = 1_000;

type CartLineSelect = (
    crate::db::schema::cart_items::columns::cart_item_id,
    crate::db::schema::cart_items::columns::cart_id,
    crate::db::schema::cart_items::columns::item_id,
    crate::db::schema::menu_items::columns::name,
    crate::db::schema::menu_items::columns::price,
    crate::db::schema::cart_items::columns::quantity,
);

fn cart_line_columns() -> CartLineSelect {
    use crate::db::schema::*;
    (
        cart_items::cart_item_id,
        cart_items::cart_id,
        cart_items::item_id,
        menu_items::name,
        menu_items::price,
        cart_items::quantity,
    )
}

#[derive(Clone)]
pub struct CartOperations {
    pool: DbPool,
}

impl CartOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Add a menu item to the caller's cart, creating the cart on first use.
    /// A second add of the same item merges into the existing line.
    pub fn add_or_update_item(
        &self,
        userid: i32,
        menu_item_id: i32,
        add_quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("add_or_update_item: failed to acquire DB connection: {}", e);
            e
        })?;

        if !(1..=MAX_LINE_QUANTITY).contains(&add_quantity) {
            return Err(RepositoryError::ValidationError(format!(
                "Quantity must be between 1 and {}, got {} for user: {}",
                MAX_LINE_QUANTITY, add_quantity, userid
            )));
        }

        conn.connection().transaction(|conn| {
            let (item_name, item_price): (String, i32);
            {
                use crate::db::schema::menu_items::dsl::*;
                (item_name, item_price) = menu_items
                    .filter(item_id.eq(menu_item_id))
                    .select((name, price))
                    .first::<(String, i32)>(conn)
                    .map_err(|e| {
                        error!(
                            "add_or_update_item: error loading menu item {}: {}",
                            menu_item_id, e
                        );
                        match e {
                            Error::NotFound => RepositoryError::NotFound(format!(
                                "menu_items: No menu item matched for id {}",
                                menu_item_id
                            )),
                            other => RepositoryError::DatabaseError(other),
                        }
                    })?;
            }

            let owning_cart_id = Self::get_or_create_cart(conn, userid)?;

            let (line_id, line_qty): (i32, i32);
            {
                use crate::db::schema::cart_items::dsl::*;
                (line_id, line_qty) = diesel::insert_into(cart_items)
                    .values(&NewCartItem {
                        cart_id: owning_cart_id,
                        item_id: menu_item_id,
                        quantity: add_quantity,
                    })
                    .on_conflict((cart_id, item_id))
                    .do_update()
                    .set(quantity.eq(quantity + excluded(quantity)))
                    .returning((cart_item_id, quantity))
                    .get_result::<(i32, i32)>(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            // Merged quantity must stay under the cap; rolling back here
            // leaves the existing line untouched.
            if line_qty > MAX_LINE_QUANTITY {
                return Err(RepositoryError::ValidationError(format!(
                    "Cart line for item {} would exceed the quantity limit of {}",
                    menu_item_id, MAX_LINE_QUANTITY
                )));
            }

            debug!(
                "add_or_update_item: cart {} line {} now holds {} x item {} for user {}",
                owning_cart_id, line_id, line_qty, menu_item_id, userid
            );

            Ok(CartLine {
                cart_item_id: line_id,
                cart_id: owning_cart_id,
                item_id: menu_item_id,
                item_name,
                unit_price: item_price,
                quantity: line_qty,
            })
        })
    }

    /// All lines of the caller's cart. An absent or empty cart is NotFound.
    pub fn get_cart(&self, userid: i32) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_cart: failed to acquire DB connection for user_id {}: {}",
                userid, e
            );
            e
        })?;

        use crate::db::schema::*;
        let lines = cart_items::table
            .inner_join(carts::table.on(cart_items::cart_id.eq(carts::cart_id)))
            .inner_join(menu_items::table.on(cart_items::item_id.eq(menu_items::item_id)))
            .filter(carts::user_id.eq(userid))
            .select(cart_line_columns())
            .order_by(cart_items::cart_item_id.asc())
            .load::<CartLine>(conn.connection())
            .map_err(|e| {
                error!(
                    "get_cart: error loading cart lines for user_id {}: {}",
                    userid, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if lines.is_empty() {
            return Err(RepositoryError::NotFound(format!(
                "Cart not found for user {}",
                userid
            )));
        }

        Ok(lines)
    }

    /// Remove a single line. The line must exist and its cart must belong to
    /// the caller. Returns the remaining lines (possibly none).
    pub fn delete_item(
        &self,
        userid: i32,
        target_cart_item_id: i32,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("delete_item: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            let (owning_cart_id, owner_user_id): (i32, i32);
            {
                use crate::db::schema::*;
                (owning_cart_id, owner_user_id) = cart_items::table
                    .inner_join(carts::table.on(cart_items::cart_id.eq(carts::cart_id)))
                    .filter(cart_items::cart_item_id.eq(target_cart_item_id))
                    .select((cart_items::cart_id, carts::user_id))
                    .first::<(i32, i32)>(conn)
                    .map_err(|e| match e {
                        Error::NotFound => RepositoryError::NotFound(format!(
                            "Cart item {} not found",
                            target_cart_item_id
                        )),
                        other => RepositoryError::DatabaseError(other),
                    })?;
            }

            if owner_user_id != userid {
                return Err(RepositoryError::Forbidden(format!(
                    "Cart item {} does not belong to user {}",
                    target_cart_item_id, userid
                )));
            }

            {
                use crate::db::schema::cart_items::dsl::*;
                diesel::delete(cart_items.filter(cart_item_id.eq(target_cart_item_id)))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            Self::load_lines_for_cart(conn, owning_cart_id)
        })
    }

    /// Wholesale replace of a cart's lines, ownership-checked.
    pub fn replace_cart(
        &self,
        userid: i32,
        target_cart_id: i32,
        new_lines: Vec<(i32, i32)>,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("replace_cart: failed to acquire DB connection: {}", e);
            e
        })?;

        // A repeated item id merges into one line, mirroring add_or_update_item.
        let mut merged: BTreeMap<i32, i32> = BTreeMap::new();
        for (item, qty) in &new_lines {
            if *qty < 1 {
                return Err(RepositoryError::ValidationError(format!(
                    "Quantity must be at least 1, got {} for item {}",
                    qty, item
                )));
            }
            let slot = merged.entry(*item).or_insert(0);
            *slot = slot.saturating_add(*qty);
        }
        for (item, qty) in &merged {
            if *qty > MAX_LINE_QUANTITY {
                return Err(RepositoryError::ValidationError(format!(
                    "Quantity for item {} exceeds the limit of {}",
                    item, MAX_LINE_QUANTITY
                )));
            }
        }

        conn.connection().transaction(|conn| {
            Self::check_cart_ownership(conn, userid, target_cart_id)?;

            let requested_ids: Vec<i32> = merged.keys().copied().collect();
            {
                use crate::db::schema::menu_items::dsl::*;
                let known: i64 = menu_items
                    .filter(item_id.eq_any(&requested_ids))
                    .count()
                    .get_result(conn)
                    .map_err(RepositoryError::DatabaseError)?;
                if known as usize != requested_ids.len() {
                    return Err(RepositoryError::NotFound(format!(
                        "Cart replacement references unknown menu items: {:?}",
                        requested_ids
                    )));
                }
            }

            {
                use crate::db::schema::cart_items::dsl::*;
                diesel::delete(cart_items.filter(cart_id.eq(target_cart_id)))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;

                let inserts: Vec<NewCartItem> = merged
                    .iter()
                    .map(|(item, qty)| NewCartItem {
                        cart_id: target_cart_id,
                        item_id: *item,
                        quantity: *qty,
                    })
                    .collect();
                if !inserts.is_empty() {
                    diesel::insert_into(cart_items)
                        .values(&inserts)
                        .execute(conn)
                        .map_err(RepositoryError::DatabaseError)?;
                }
            }

            debug!(
                "replace_cart: cart {} replaced with {} lines for user {}",
                target_cart_id,
                merged.len(),
                userid
            );

            Self::load_lines_for_cart(conn, target_cart_id)
        })
    }

    /// Drop the whole cart; its lines cascade away with it.
    pub fn delete_cart(&self, userid: i32, target_cart_id: i32) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("delete_cart: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            Self::check_cart_ownership(conn, userid, target_cart_id)?;

            use crate::db::schema::carts::dsl::*;
            diesel::delete(carts.filter(cart_id.eq(target_cart_id)))
                .execute(conn)
                .map_err(RepositoryError::DatabaseError)?;

            debug!(
                "delete_cart: cart {} deleted for user {}",
                target_cart_id, userid
            );
            Ok(())
        })
    }

    fn get_or_create_cart(conn: &mut PgConnection, userid: i32) -> Result<i32, RepositoryError> {
        use crate::db::schema::carts::dsl::*;

        let existing = carts
            .filter(user_id.eq(userid))
            .select(cart_id)
            .first::<i32>(conn)
            .optional()
            .map_err(RepositoryError::DatabaseError)?;

        match existing {
            Some(id) => Ok(id),
            None => diesel::insert_into(carts)
                .values(user_id.eq(userid))
                .returning(cart_id)
                .get_result::<i32>(conn)
                .map_err(RepositoryError::DatabaseError),
        }
    }

    fn check_cart_ownership(
        conn: &mut PgConnection,
        userid: i32,
        target_cart_id: i32,
    ) -> Result<(), RepositoryError> {
        use crate::db::schema::carts::dsl::*;

        let owner = carts
            .filter(cart_id.eq(target_cart_id))
            .select(user_id)
            .first::<i32>(conn)
            .map_err(|e| match e {
                Error::NotFound => {
                    RepositoryError::NotFound(format!("Cart {} not found", target_cart_id))
                }
                other => RepositoryError::DatabaseError(other),
            })?;

        if owner != userid {
            return Err(RepositoryError::Forbidden(format!(
                "Cart {} does not belong to user {}",
                target_cart_id, userid
            )));
        }
        Ok(())
    }

    fn load_lines_for_cart(
        conn: &mut PgConnection,
        target_cart_id: i32,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        use crate::db::schema::*;
        cart_items::table
            .inner_join(menu_items::table.on(cart_items::item_id.eq(menu_items::item_id)))
            .filter(cart_items::cart_id.eq(target_cart_id))
            .select(cart_line_columns())
            .order_by(cart_items::cart_item_id.asc())
            .load::<CartLine>(conn)
            .map_err(RepositoryError::DatabaseError)
    }
}
