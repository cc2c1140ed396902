use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    ProductImage as DomainProductImage,
};
use crate::domain::types::{
    Money, ProductName, ProductSku, ProductSlug, StockLevel, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub product_type_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub sku: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`Product`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct NewProduct {
    pub category_id: i32,
    pub product_type_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub sku: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Converts into the domain entity with its already-loaded images.
    pub fn into_domain(
        self,
        images: Vec<DomainProductImage>,
    ) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: self.id.try_into()?,
            category_id: self.category_id.try_into()?,
            product_type_id: self.product_type_id.try_into()?,
            name: ProductName::new(self.name)?,
            slug: ProductSlug::new(self.slug)?,
            description: self.description,
            price: Money::new(self.price)?,
            discount_price: self.discount_price.map(Money::new).transpose()?,
            stock: StockLevel::new(self.stock)?,
            sku: ProductSku::new(self.sku)?,
            is_active: self.is_active,
            is_featured: self.is_featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images,
        })
    }
}

impl From<&DomainNewProduct> for NewProduct {
    fn from(product: &DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            product_type_id: product.product_type_id.get(),
            name: product.name.as_str().to_string(),
            slug: product.slug.as_str().to_string(),
            description: product.description.clone(),
            price: product.price.get(),
            discount_price: product.discount_price.map(Money::get),
            stock: product.stock.get(),
            sku: product.sku.as_str().to_string(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
