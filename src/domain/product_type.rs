use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductTypeId, ProductTypeName, ProductTypeSlug};

/// Kind of product; its slug selects the spec strategy applied to products of
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub slug: ProductTypeSlug,
    pub name: ProductTypeName,
}
