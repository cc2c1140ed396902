use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::cart::{Cart, CartTotals};
use crate::domain::order::{NewOrder, Order, OrderStatusChange};
use crate::domain::types::OrderId;
use crate::models::cart::CartTotalsChangeset;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem, Order as DbOrder, OrderItem as DbOrderItem,
    OrderStatusChangeset,
};
use crate::repository::{
    DieselRepository, OrderListQuery, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
};

/// Attach items to loaded order rows, preserving row order.
fn with_items(conn: &mut SqliteConnection, rows: Vec<DbOrder>) -> RepositoryResult<Vec<Order>> {
    use crate::schema::order_items;

    let items = DbOrderItem::belonging_to(&rows)
        .order(order_items::id.asc())
        .select(DbOrderItem::as_select())
        .load::<DbOrderItem>(conn)?
        .grouped_by(&rows);

    let orders = rows
        .into_iter()
        .zip(items)
        .map(|(row, items)| row.into_domain(items))
        .collect::<Result<Vec<Order>, _>>()?;

    Ok(orders)
}

impl OrderReader for DieselRepository {
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(customer_id) = &query.customer_id {
                items = items.filter(orders::customer_id.eq(customer_id.as_str().to_string()));
            }
            if let Some(status) = query.status {
                items = items.filter(orders::order_status.eq(status.as_str()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(DbOrder::as_select())
            .load::<DbOrder>(&mut conn)?;

        Ok((total, with_items(&mut conn, rows)?))
    }

    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let rows = orders::table
            .filter(orders::id.eq(id.get()))
            .select(DbOrder::as_select())
            .load::<DbOrder>(&mut conn)?;

        Ok(with_items(&mut conn, rows)?.pop())
    }
}

impl OrderWriter for DieselRepository {
    fn place_order(&self, order: &NewOrder, cart: &Cart) -> RepositoryResult<Order> {
        use crate::schema::{cart_items, carts, order_items, orders, products};

        let mut conn = self.conn()?;
        let db_order = DbNewOrder::try_from(order)?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let now = chrono::Utc::now().naive_utc();

            for item in &order.items {
                let quantity = i32::try_from(item.quantity).map_err(|_| {
                    RepositoryError::ValidationError(format!(
                        "quantity {} too large",
                        item.quantity
                    ))
                })?;

                let updated = diesel::update(
                    products::table
                        .filter(products::id.eq(item.product_id.get()))
                        .filter(products::stock.ge(quantity)),
                )
                .set((
                    products::stock.eq(products::stock - quantity),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;

                if updated == 0 {
                    return Err(RepositoryError::Conflict(format!(
                        "insufficient stock for {}",
                        item.sku
                    )));
                }
            }

            let created = diesel::insert_into(orders::table)
                .values(&db_order)
                .returning(DbOrder::as_returning())
                .get_result::<DbOrder>(conn)?;

            let new_items = order
                .items
                .iter()
                .map(|item| NewOrderItem::new(created.id, item))
                .collect::<Result<Vec<_>, _>>()?;

            if !new_items.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&new_items)
                    .execute(conn)?;
            }

            if let Some(cart_id) = cart.id {
                diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id.get())))
                    .execute(conn)?;
                diesel::update(carts::table.filter(carts::id.eq(cart_id.get())))
                    .set(CartTotalsChangeset::from(CartTotals::default()))
                    .execute(conn)?;
            }

            let mut placed = with_items(conn, vec![created])?;
            placed.pop().ok_or(RepositoryError::NotFound)
        })
    }

    fn apply_status_change(
        &self,
        id: OrderId,
        change: OrderStatusChange,
    ) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let affected = diesel::update(orders::table.filter(orders::id.eq(id.get())))
            .set(OrderStatusChangeset::from(change))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
