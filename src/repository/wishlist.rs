use diesel::prelude::*;

use crate::domain::types::{CustomerId, ProductId};
use crate::domain::wishlist::WishlistItem;
use crate::models::wishlist::{NewWishlistItem, WishlistItem as DbWishlistItem};
use crate::repository::{DieselRepository, RepositoryResult, WishlistReader, WishlistWriter};

impl WishlistReader for DieselRepository {
    fn list_wishlist(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<WishlistItem>> {
        use crate::schema::wishlist_items;

        let mut conn = self.conn()?;

        let items = wishlist_items::table
            .filter(wishlist_items::customer_id.eq(customer_id.as_str()))
            .order(wishlist_items::created_at.desc())
            .select(DbWishlistItem::as_select())
            .load::<DbWishlistItem>(&mut conn)?;

        let items = items
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<WishlistItem>, _>>()?;

        Ok(items)
    }
}

impl WishlistWriter for DieselRepository {
    fn add_to_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize> {
        use crate::schema::wishlist_items;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(wishlist_items::table)
            .values(NewWishlistItem {
                customer_id: customer_id.as_str(),
                product_id: product_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn remove_from_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize> {
        use crate::schema::wishlist_items;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            wishlist_items::table
                .filter(wishlist_items::customer_id.eq(customer_id.as_str()))
                .filter(wishlist_items::product_id.eq(product_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
