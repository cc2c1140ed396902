use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::CartOwner;
use crate::domain::order::{NewOrder, Order};
use crate::domain::types::{OrderNumber, ProductId};
use crate::forms::checkout::CheckoutFormPayload;
use crate::models::config::ShippingConfig;
use crate::repository::{CartReader, OrderWriter, ProductReader, RepositoryError};
use crate::services::cart::{load_cart, recalculate};
use crate::specs::FieldErrors;

use super::{ServiceError, ServiceResult};

/// `ORD-` followed by the UTC date and eight random hex digits.
fn generate_order_number() -> ServiceResult<OrderNumber> {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    Ok(OrderNumber::new(format!(
        "ORD-{}-{suffix}",
        Utc::now().format("%Y%m%d")
    ))?)
}

/// Turn the owner's cart into an order.
///
/// The cart is recomputed first; the order snapshots those totals. Stock is
/// checked here for a friendly message and again by the repository inside
/// the transaction that writes the order.
pub fn place_order<R>(
    owner: &CartOwner,
    payload: CheckoutFormPayload,
    shipping: &ShippingConfig,
    repo: &R,
) -> ServiceResult<Order>
where
    R: CartReader + ProductReader + OrderWriter,
{
    let mut cart = load_cart(owner, repo)?;
    if cart.is_empty() {
        return Err(ServiceError::Form("Your cart is empty.".into()));
    }

    let ids: Vec<ProductId> = cart.items().keys().copied().collect();
    let products = match repo.get_products_by_ids(&ids) {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to load cart products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut errors = FieldErrors::new();
    for (product_id, line) in cart.items() {
        match products.iter().find(|p| p.id == *product_id) {
            Some(product) if product.can_sell(line.quantity) => {}
            Some(product) => errors.add(
                "items",
                format!("{} is no longer available in the requested quantity.", product.name),
            ),
            None => errors.add("items", "A product in your cart is no longer available."),
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    recalculate(&mut cart, shipping)?;
    let order = NewOrder::from_cart(generate_order_number()?, &cart, &products, payload.details);

    match repo.place_order(&order, &cart) {
        Ok(placed) => {
            log::info!(
                "Placed order {} totalling {:.2}",
                placed.order_number,
                placed.total
            );
            Ok(placed)
        }
        Err(RepositoryError::Conflict(message)) => {
            log::warn!("Checkout rejected: {message}");
            Err(ServiceError::Conflict(
                "Some items sold out while you were checking out.".into(),
            ))
        }
        Err(e) => {
            log::error!("Failed to place order: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Address, CheckoutDetails};
    use crate::domain::types::{Email, OrderStatus, SessionToken};
    use crate::forms::cart::AddToCartFormPayload;
    use crate::repository::ProductWriter;
    use crate::repository::test::TestRepository;
    use crate::services::cart::add_to_cart;
    use crate::services::test_support::sample_product;

    const SHIPPING: ShippingConfig = ShippingConfig {
        flat_rate: 50.0,
        free_shipping_threshold: 1000.0,
    };

    fn guest() -> CartOwner {
        CartOwner::Session(SessionToken::new("guest-token").unwrap())
    }

    fn details() -> CheckoutFormPayload {
        let address = Address {
            full_name: "Asha Rao".into(),
            line1: "12 MG Road".into(),
            line2: None,
            city: "Bengaluru".into(),
            state: "KA".into(),
            postal_code: "560001".into(),
            country: "IN".into(),
            phone: None,
        };
        CheckoutFormPayload {
            details: CheckoutDetails {
                email: Email::new("asha@example.com").unwrap(),
                shipping_address: address.clone(),
                billing_address: address,
            },
        }
    }

    fn add(repo: &TestRepository, product_id: i32, quantity: u32) {
        let payload = AddToCartFormPayload {
            product_id: ProductId::new(product_id).unwrap(),
            quantity,
        };
        add_to_cart(&guest(), payload, &SHIPPING, repo).unwrap();
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let repo = TestRepository::new();
        let err = place_order(&guest(), details(), &SHIPPING, &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn snapshots_cart_and_takes_stock() {
        let repo = TestRepository::new().with_products(vec![sample_product(1, 1)]);
        add(&repo, 1, 3);

        let order = place_order(&guest(), details(), &SHIPPING, &repo).unwrap();

        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].line_total, 300.0);
        assert_eq!(order.subtotal, 300.0);
        assert_eq!(order.tax, 54.0);
        assert_eq!(order.shipping, 50.0);
        assert_eq!(order.total, 404.0);

        let product = repo.product(ProductId::new(1).unwrap()).unwrap();
        assert_eq!(product.stock.get(), 7);
        let cart = repo.find_cart(&guest()).unwrap().unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn product_taken_off_sale_blocks_checkout() {
        let repo = TestRepository::new().with_products(vec![sample_product(1, 1)]);
        add(&repo, 1, 1);
        repo.delete_product(ProductId::new(1).unwrap()).unwrap();

        let err = place_order(&guest(), details(), &SHIPPING, &repo).unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("items"));
        assert!(repo.orders().is_empty());
    }
}
