use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ImagePath, Money, ProductId, ProductImageId, ProductName, ProductSku, ProductSlug,
    ProductTypeId, StockLevel,
};

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub product_type_id: ProductTypeId,
    pub name: ProductName,
    pub slug: ProductSlug,
    pub description: Option<String>,
    pub price: Money,
    /// Optional override; only honoured while lower than `price`.
    pub discount_price: Option<Money>,
    pub stock: StockLevel,
    pub sku: ProductSku,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Images ordered by position.
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Price actually charged for one unit.
    pub fn effective_price(&self) -> Money {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    /// Whether `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: u32) -> bool {
        self.is_active && i64::from(self.stock.get()) >= i64::from(quantity)
    }
}

/// Stored image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub path: ImagePath,
    pub position: i32,
}

/// Information required to create a [`Product`] or replace its attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub product_type_id: ProductTypeId,
    pub name: ProductName,
    pub slug: ProductSlug,
    pub description: Option<String>,
    pub price: Money,
    pub discount_price: Option<Money>,
    pub stock: StockLevel,
    pub sku: ProductSku,
    pub is_active: bool,
    pub is_featured: bool,
}
