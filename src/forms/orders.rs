use serde::Deserialize;

use crate::domain::order::OrderStatusChange;
use crate::domain::types::{OrderStatus, PaymentStatus};
use crate::forms::{FormError, check};
use crate::specs::FieldErrors;

/// Staff request to move an order along. Exactly one of the two statuses
/// must be given.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderStatusFormPayload {
    pub change: OrderStatusChange,
}

impl TryFrom<OrderStatusForm> for OrderStatusFormPayload {
    type Error = FormError;

    fn try_from(value: OrderStatusForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();

        let change = match (value.order_status, value.payment_status) {
            (Some(status), None) => check(
                &mut errors,
                "order_status",
                OrderStatus::try_from(status).map(OrderStatusChange::Fulfilment),
            ),
            (None, Some(status)) => check(
                &mut errors,
                "payment_status",
                PaymentStatus::try_from(status).map(OrderStatusChange::Payment),
            ),
            _ => {
                errors.add(
                    "order_status",
                    "Provide either an order status or a payment status.",
                );
                None
            }
        };

        match change {
            Some(change) => Ok(Self { change }),
            None => Err(errors.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fulfilment_change() {
        let form = OrderStatusForm {
            order_status: Some("shipped".into()),
            payment_status: None,
        };

        let payload = OrderStatusFormPayload::try_from(form).unwrap();
        assert_eq!(
            payload.change,
            OrderStatusChange::Fulfilment(OrderStatus::Shipped)
        );
    }

    #[test]
    fn rejects_both_or_neither() {
        let both = OrderStatusForm {
            order_status: Some("shipped".into()),
            payment_status: Some("paid".into()),
        };
        let neither = OrderStatusForm {
            order_status: None,
            payment_status: None,
        };

        assert!(OrderStatusFormPayload::try_from(both).is_err());
        assert!(OrderStatusFormPayload::try_from(neither).is_err());
    }

    #[test]
    fn rejects_unknown_payment_status() {
        let form = OrderStatusForm {
            order_status: None,
            payment_status: Some("waived".into()),
        };

        match OrderStatusFormPayload::try_from(form) {
            Err(FormError::Validation(errors)) => assert!(errors.contains("payment_status")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
