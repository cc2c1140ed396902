use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ProductId, Quantity};
use crate::forms::{FormError, check, validation_errors};

/// Most units of one product a single request may add.
pub const MAX_QUANTITY_PER_REQUEST: i32 = 100;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartForm {
    #[validate(range(min = 1, message = "The product is required."))]
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    #[validate(range(
        min = 1,
        max = 100,
        message = "The quantity must be between 1 and 100."
    ))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddToCartFormPayload {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl TryFrom<AddToCartForm> for AddToCartFormPayload {
    type Error = FormError;

    fn try_from(value: AddToCartForm) -> Result<Self, Self::Error> {
        let mut errors = validation_errors(&value);

        let product_id = check(&mut errors, "product_id", ProductId::new(value.product_id));
        let quantity = check(&mut errors, "quantity", Quantity::new(value.quantity));

        match (product_id, quantity) {
            (Some(product_id), Some(quantity)) if errors.is_empty() => Ok(Self {
                product_id,
                quantity: quantity.get().unsigned_abs(),
            }),
            _ => Err(errors.into()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartItemForm {
    #[validate(range(
        min = 1,
        max = 100,
        message = "The quantity must be between 1 and 100."
    ))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateCartItemFormPayload {
    pub quantity: u32,
}

impl TryFrom<UpdateCartItemForm> for UpdateCartItemFormPayload {
    type Error = FormError;

    fn try_from(value: UpdateCartItemForm) -> Result<Self, Self::Error> {
        let mut errors = validation_errors(&value);

        match check(&mut errors, "quantity", Quantity::new(value.quantity)) {
            Some(quantity) if errors.is_empty() => Ok(Self {
                quantity: quantity.get().unsigned_abs(),
            }),
            _ => Err(errors.into()),
        }
    }
}
