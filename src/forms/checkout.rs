use serde::Deserialize;
use validator::Validate;

use crate::domain::order::{Address, CheckoutDetails};
use crate::domain::types::Email;
use crate::forms::{FormError, check, non_blank, validation_errors};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressForm {
    #[validate(length(min = 1, max = 255, message = "The full name is required."))]
    pub full_name: String,
    #[validate(length(min = 1, max = 255, message = "The address line is required."))]
    pub line1: String,
    #[validate(length(max = 255))]
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "The city is required."))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "The state is required."))]
    pub state: String,
    #[validate(length(min = 1, max = 20, message = "The postal code is required."))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "The country is required."))]
    pub country: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

impl From<AddressForm> for Address {
    fn from(value: AddressForm) -> Self {
        Address {
            full_name: value.full_name.trim().to_string(),
            line1: value.line1.trim().to_string(),
            line2: non_blank(value.line2),
            city: value.city.trim().to_string(),
            state: value.state.trim().to_string(),
            postal_code: value.postal_code.trim().to_string(),
            country: value.country.trim().to_string(),
            phone: non_blank(value.phone),
        }
    }
}

/// Body of the checkout endpoint. Billing defaults to the shipping address.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(nested)]
    pub shipping_address: AddressForm,
    #[validate(nested)]
    pub billing_address: Option<AddressForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutFormPayload {
    pub details: CheckoutDetails,
}

impl TryFrom<CheckoutForm> for CheckoutFormPayload {
    type Error = FormError;

    fn try_from(value: CheckoutForm) -> Result<Self, Self::Error> {
        let mut errors = validation_errors(&value);

        let email = check(&mut errors, "email", Email::new(value.email));

        match email {
            Some(email) if errors.is_empty() => {
                let shipping_address = Address::from(value.shipping_address);
                let billing_address = value
                    .billing_address
                    .map(Address::from)
                    .unwrap_or_else(|| shipping_address.clone());
                Ok(Self {
                    details: CheckoutDetails {
                        email,
                        shipping_address,
                        billing_address,
                    },
                })
            }
            _ => Err(errors.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn address() -> Value {
        json!({
            "full_name": "Asha Rao",
            "line1": "12 MG Road",
            "city": "Bengaluru",
            "state": "KA",
            "postal_code": "560001",
            "country": "IN"
        })
    }

    #[test]
    fn billing_defaults_to_shipping() {
        let form: CheckoutForm = serde_json::from_value(json!({
            "email": "Asha@Example.com",
            "shipping_address": address(),
        }))
        .unwrap();

        let payload = CheckoutFormPayload::try_from(form).unwrap();
        assert_eq!(payload.details.email.as_str(), "asha@example.com");
        assert_eq!(
            payload.details.billing_address,
            payload.details.shipping_address
        );
    }

    #[test]
    fn reports_nested_address_fields() {
        let mut shipping = address();
        shipping["city"] = json!("");
        let form: CheckoutForm = serde_json::from_value(json!({
            "email": "not-an-email",
            "shipping_address": shipping,
        }))
        .unwrap();

        match CheckoutFormPayload::try_from(form) {
            Err(FormError::Validation(errors)) => {
                assert!(errors.contains("email"));
                assert!(errors.contains("shipping_address.city"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
