use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{CustomerId, TypeConstraintError};
use crate::domain::wishlist::WishlistItem as DomainWishlistItem;

/// Diesel model representing the `wishlist_items` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::wishlist_items)]
pub struct WishlistItem {
    pub customer_id: String,
    pub product_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::wishlist_items)]
pub struct NewWishlistItem<'a> {
    pub customer_id: &'a str,
    pub product_id: i32,
}

impl TryFrom<WishlistItem> for DomainWishlistItem {
    type Error = TypeConstraintError;

    fn try_from(item: WishlistItem) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_id: CustomerId::new(item.customer_id)?,
            product_id: item.product_id.try_into()?,
            created_at: item.created_at,
        })
    }
}
