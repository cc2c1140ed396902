use serde::Serialize;

use crate::domain::cart::{Cart, CartTotals};
use crate::domain::product::Product;
use crate::domain::types::round_money;
use crate::dto::products::ProductImageDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineDto {
    pub product_id: i32,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub image: Option<ProductImageDto>,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    /// Whether the product can still be bought in this quantity.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartDto {
    pub items: Vec<CartLineDto>,
    pub item_count: u32,
    pub totals: CartTotals,
}

impl CartDto {
    /// Describe `cart`, whose totals must be current. Lines whose product
    /// is missing from `products` are left out.
    pub fn new(cart: &Cart, products: &[Product]) -> Self {
        let items = cart
            .items()
            .iter()
            .filter_map(|(product_id, line)| {
                let product = products.iter().find(|p| p.id == *product_id)?;
                Some(CartLineDto {
                    product_id: product_id.get(),
                    name: product.name.as_str().to_string(),
                    slug: product.slug.as_str().to_string(),
                    sku: product.sku.as_str().to_string(),
                    image: product.images.first().cloned().map(ProductImageDto::from),
                    quantity: line.quantity,
                    unit_price: line.unit_price.get(),
                    line_total: round_money(line.line_total()),
                    available: product.can_sell(line.quantity),
                })
            })
            .collect();

        Self {
            items,
            item_count: cart.item_count(),
            totals: cart.totals(),
        }
    }
}
