use serde::Serialize;

use crate::domain::product::{Product, ProductImage};
use crate::domain::spec::ProductSpec;

/// Public URL prefix uploaded images are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImageDto {
    pub id: i32,
    pub url: String,
    pub position: i32,
}

impl From<ProductImage> for ProductImageDto {
    fn from(value: ProductImage) -> Self {
        Self {
            id: value.id.get(),
            url: format!("{UPLOADS_URL_PREFIX}/{}", value.path),
            position: value.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub category_id: i32,
    pub product_type_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    /// Price actually charged per unit.
    pub effective_price: f64,
    pub stock: i32,
    pub in_stock: bool,
    pub sku: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub images: Vec<ProductImageDto>,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            category_id: value.category_id.get(),
            product_type_id: value.product_type_id.get(),
            effective_price: value.effective_price().get(),
            in_stock: value.stock.get() > 0,
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
            description: value.description,
            price: value.price.get(),
            discount_price: value.discount_price.map(|p| p.get()),
            stock: value.stock.get(),
            sku: value.sku.into_inner(),
            is_active: value.is_active,
            is_featured: value.is_featured,
            images: value.images.into_iter().map(ProductImageDto::from).collect(),
        }
    }
}

/// Product page: the product plus its type and spec record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailDto {
    #[serde(flatten)]
    pub product: ProductDto,
    pub product_type: String,
    pub spec: Option<ProductSpec>,
}
