use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::product::NewProduct;
use crate::domain::types::{
    CategoryId, Money, ProductName, ProductSku, ProductSlug, ProductTypeId, StockLevel,
};
use crate::forms::{check, non_blank, validation_errors};
use crate::specs::{FieldErrors, RawSpecData};

fn default_true() -> bool {
    true
}

/// Body of the admin create and update product endpoints.
///
/// `spec` carries the type-specific attributes; it is checked later by the
/// strategy of the product's type.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(range(min = 1, message = "The category is required."))]
    pub category_id: i32,
    #[validate(range(min = 1, message = "The product type is required."))]
    pub product_type_id: i32,
    #[validate(length(min = 1, max = 255, message = "The name must be 1 to 255 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "The slug must be 1 to 255 characters."))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "The price must be at least 0."))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "The discount price must be at least 0."))]
    pub discount_price: Option<f64>,
    #[validate(range(min = 0, message = "The stock must be at least 0."))]
    pub stock: i32,
    #[validate(length(min = 1, max = 100, message = "The sku must be 1 to 100 characters."))]
    pub sku: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub spec: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub product: NewProduct,
    pub spec: RawSpecData,
}

/// A product form whose own fields failed.
///
/// Keeps whatever parsed of the references and the raw spec so the spec can
/// still be checked and its errors reported alongside these.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedProductForm {
    pub errors: FieldErrors,
    pub category_id: Option<CategoryId>,
    pub product_type_id: Option<ProductTypeId>,
    pub spec: Option<RawSpecData>,
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = RejectedProductForm;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        let mut errors = validation_errors(&value);

        let category_id = check(&mut errors, "category_id", CategoryId::new(value.category_id));
        let product_type_id = check(
            &mut errors,
            "product_type_id",
            ProductTypeId::new(value.product_type_id),
        );
        let name = check(&mut errors, "name", ProductName::new(value.name));
        let slug = check(&mut errors, "slug", ProductSlug::new(value.slug));
        let price = check(&mut errors, "price", Money::new(value.price));
        let discount_price = check(
            &mut errors,
            "discount_price",
            value.discount_price.map(Money::new).transpose(),
        );
        let stock = check(&mut errors, "stock", StockLevel::new(value.stock));
        let sku = check(&mut errors, "sku", ProductSku::new(value.sku));
        let spec = match RawSpecData::from_json(value.spec) {
            Ok(spec) => Some(spec),
            Err(spec_errors) => {
                errors.merge(spec_errors);
                None
            }
        };

        let (
            Some(category_id),
            Some(product_type_id),
            Some(name),
            Some(slug),
            Some(price),
            Some(discount_price),
            Some(stock),
            Some(sku),
            Some(spec),
        ) = (
            category_id,
            product_type_id,
            name,
            slug,
            price,
            discount_price,
            stock,
            sku,
            spec.clone(),
        )
        else {
            return Err(RejectedProductForm {
                errors,
                category_id,
                product_type_id,
                spec,
            });
        };
        if !errors.is_empty() {
            return Err(RejectedProductForm {
                errors,
                category_id: Some(category_id),
                product_type_id: Some(product_type_id),
                spec: Some(spec),
            });
        }

        Ok(Self {
            product: NewProduct {
                category_id,
                product_type_id,
                name,
                slug,
                description: non_blank(value.description),
                price,
                discount_price,
                stock,
                sku,
                is_active: value.is_active,
                is_featured: value.is_featured,
            },
            spec,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(body: Value) -> ProductForm {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "category_id": 1,
            "product_type_id": 1,
            "name": "Solitaire Ring",
            "slug": "solitaire-ring",
            "price": 1200.0,
            "discount_price": 999.0,
            "stock": 3,
            "sku": "RING-001",
            "spec": {"metal_type": "gold", "huid": "AB12CD"}
        })
    }

    #[test]
    fn builds_product_and_keeps_raw_spec() {
        let payload = ProductFormPayload::try_from(form(valid_body())).unwrap();

        assert_eq!(payload.product.slug.as_str(), "solitaire-ring");
        assert_eq!(payload.product.discount_price.unwrap(), 999.0);
        assert!(payload.product.is_active);
        assert!(!payload.product.is_featured);
        assert_ne!(payload.spec, RawSpecData::default());
    }

    #[test]
    fn missing_spec_is_empty() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("spec");

        let payload = ProductFormPayload::try_from(form(body)).unwrap();
        assert_eq!(payload.spec, RawSpecData::default());
    }

    #[test]
    fn collects_every_invalid_field() {
        let mut body = valid_body();
        body["price"] = json!(-1.0);
        body["slug"] = json!("Not A Slug");
        body["stock"] = json!(-2);
        body["spec"] = json!(["gold"]);

        let rejected = ProductFormPayload::try_from(form(body)).unwrap_err();

        assert!(rejected.errors.contains("price"));
        assert!(rejected.errors.contains("slug"));
        assert!(rejected.errors.contains("stock"));
        assert!(rejected.errors.contains("spec"));
        assert!(rejected.spec.is_none());
    }

    #[test]
    fn rejected_form_keeps_spec_for_later_checks() {
        let mut body = valid_body();
        body["name"] = json!("");
        body["spec"] = json!({"making_charge_type": "bogus"});

        let rejected = ProductFormPayload::try_from(form(body)).unwrap_err();

        assert!(rejected.errors.contains("name"));
        assert_eq!(rejected.product_type_id, Some(ProductTypeId::new(1).unwrap()));
        assert_eq!(rejected.category_id, Some(CategoryId::new(1).unwrap()));
        assert_ne!(rejected.spec, Some(RawSpecData::default()));
    }
}
