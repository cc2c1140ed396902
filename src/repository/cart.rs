use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::cart::{Cart, CartLine, CartOwner};
use crate::domain::types::{CartId, Money, ProductId};
use crate::models::cart::{Cart as DbCart, CartItem, CartTotalsChangeset, NewCart};
use crate::repository::{
    CartReader, CartWriter, DieselRepository, RepositoryError, RepositoryResult,
};

/// Load the lines of a cart row and rebuild the aggregate.
fn load_cart(conn: &mut SqliteConnection, row: DbCart) -> RepositoryResult<Cart> {
    use crate::schema::cart_items;

    let items = cart_items::table
        .filter(cart_items::cart_id.eq(row.id))
        .select(CartItem::as_select())
        .load::<CartItem>(conn)?;

    let mut lines = BTreeMap::new();
    for item in items {
        let quantity = u32::try_from(item.quantity).map_err(|_| {
            RepositoryError::ValidationError(format!(
                "cart {} holds a negative quantity",
                item.cart_id
            ))
        })?;
        lines.insert(
            ProductId::new(item.product_id)?,
            CartLine {
                quantity,
                unit_price: Money::new(item.unit_price)?,
            },
        );
    }

    Ok(Cart::restore(
        CartId::new(row.id)?,
        row.owner()?,
        lines,
        row.totals(),
    ))
}

impl CartReader for DieselRepository {
    fn find_cart(&self, owner: &CartOwner) -> RepositoryResult<Option<Cart>> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let query = match owner {
            CartOwner::Customer(customer_id) => carts::table
                .filter(carts::customer_id.eq(customer_id.as_str()))
                .into_boxed(),
            CartOwner::Session(token) => carts::table
                .filter(carts::session_token.eq(token.as_str()))
                .into_boxed(),
        };

        let row = query
            .select(DbCart::as_select())
            .first::<DbCart>(&mut conn)
            .optional()?;

        row.map(|row| load_cart(&mut conn, row)).transpose()
    }
}

impl CartWriter for DieselRepository {
    fn save_cart(&self, cart: &Cart) -> RepositoryResult<Cart> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;

        let cart_id = conn.transaction::<_, RepositoryError, _>(|conn| {
            let cart_id = match cart.id {
                Some(id) => id.get(),
                None => diesel::insert_into(carts::table)
                    .values(NewCart::from(&cart.owner))
                    .returning(carts::id)
                    .get_result::<i32>(conn)?,
            };

            diesel::update(carts::table.filter(carts::id.eq(cart_id)))
                .set(CartTotalsChangeset::from(cart.totals()))
                .execute(conn)?;

            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id)))
                .execute(conn)?;

            let items = cart
                .items()
                .iter()
                .map(|(product_id, line)| {
                    let quantity = i32::try_from(line.quantity).map_err(|_| {
                        RepositoryError::ValidationError(format!(
                            "quantity {} too large",
                            line.quantity
                        ))
                    })?;
                    Ok(CartItem {
                        cart_id,
                        product_id: product_id.get(),
                        quantity,
                        unit_price: line.unit_price.get(),
                    })
                })
                .collect::<RepositoryResult<Vec<CartItem>>>()?;

            if !items.is_empty() {
                diesel::insert_into(cart_items::table)
                    .values(&items)
                    .execute(conn)?;
            }

            Ok(cart_id)
        })?;

        Ok(Cart::restore(
            CartId::new(cart_id)?,
            cart.owner.clone(),
            cart.items().clone(),
            cart.totals(),
        ))
    }
}
