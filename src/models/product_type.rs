use diesel::prelude::*;

use crate::domain::product_type::ProductType as DomainProductType;
use crate::domain::types::{ProductTypeName, ProductTypeSlug, TypeConstraintError};

/// Diesel model representing the `product_types` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_types)]
pub struct ProductType {
    pub id: i32,
    pub slug: String,
    pub name: String,
}

impl TryFrom<ProductType> for DomainProductType {
    type Error = TypeConstraintError;

    fn try_from(value: ProductType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.try_into()?,
            slug: ProductTypeSlug::new(value.slug)?,
            name: ProductTypeName::new(value.name)?,
        })
    }
}
