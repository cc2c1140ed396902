//! Cart operations for guests and customers.
//!
//! Every mutation recomputes the cart's money fields before it is saved, so
//! stored totals always match the stored lines.

use crate::domain::cart::{Cart, CartOwner};
use crate::domain::product::Product;
use crate::domain::types::{Money, ProductId};
use crate::dto::cart::CartDto;
use crate::forms::cart::{AddToCartFormPayload, UpdateCartItemFormPayload};
use crate::models::config::ShippingConfig;
use crate::repository::{CartReader, CartWriter, ProductReader};
use crate::specs::FieldErrors;

use super::{ServiceError, ServiceResult};

/// Recompute subtotal and tax, then the shipping owed on the new subtotal,
/// then the total.
pub fn recalculate(cart: &mut Cart, shipping: &ShippingConfig) -> ServiceResult<()> {
    cart.calculate_totals();
    let cost = Money::new(shipping.cost_for(cart.totals().subtotal)).map_err(|e| {
        log::error!("Invalid shipping configuration: {e}");
        ServiceError::Internal
    })?;
    cart.set_shipping(cost);
    cart.calculate_totals();
    Ok(())
}

pub fn show_cart<R>(owner: &CartOwner, shipping: &ShippingConfig, repo: &R) -> ServiceResult<CartDto>
where
    R: CartReader + ProductReader,
{
    let mut cart = load_cart(owner, repo)?;
    recalculate(&mut cart, shipping)?;
    describe(&cart, repo)
}

pub fn add_to_cart<R>(
    owner: &CartOwner,
    payload: AddToCartFormPayload,
    shipping: &ShippingConfig,
    repo: &R,
) -> ServiceResult<CartDto>
where
    R: CartReader + CartWriter + ProductReader,
{
    let product = match repo.get_product_by_id(payload.product_id) {
        Ok(Some(product)) if product.is_active => product,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut cart = load_cart(owner, repo)?;
    let in_cart = cart.line(product.id).map_or(0, |line| line.quantity);
    ensure_stock(&product, in_cart.saturating_add(payload.quantity))?;

    cart.add_item(product.id, payload.quantity, product.effective_price());
    save(cart, shipping, repo)
}

/// Set a line's quantity. Products not in the cart are ignored.
pub fn update_cart_item<R>(
    owner: &CartOwner,
    product_id: ProductId,
    payload: UpdateCartItemFormPayload,
    shipping: &ShippingConfig,
    repo: &R,
) -> ServiceResult<CartDto>
where
    R: CartReader + CartWriter + ProductReader,
{
    let mut cart = load_cart(owner, repo)?;
    if cart.line(product_id).is_none() {
        recalculate(&mut cart, shipping)?;
        return describe(&cart, repo);
    }

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => ensure_stock(&product, payload.quantity)?,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    cart.update_item_quantity(product_id, payload.quantity);
    save(cart, shipping, repo)
}

pub fn remove_from_cart<R>(
    owner: &CartOwner,
    product_id: ProductId,
    shipping: &ShippingConfig,
    repo: &R,
) -> ServiceResult<CartDto>
where
    R: CartReader + CartWriter + ProductReader,
{
    let mut cart = load_cart(owner, repo)?;
    if cart.line(product_id).is_none() {
        recalculate(&mut cart, shipping)?;
        return describe(&cart, repo);
    }

    cart.remove_item(product_id);
    save(cart, shipping, repo)
}

pub fn clear_cart<R>(owner: &CartOwner, shipping: &ShippingConfig, repo: &R) -> ServiceResult<CartDto>
where
    R: CartReader + CartWriter + ProductReader,
{
    let mut cart = load_cart(owner, repo)?;
    if cart.id.is_none() {
        return describe(&cart, repo);
    }

    cart.clear();
    save(cart, shipping, repo)
}

/// Move a guest cart into the customer's cart after sign-in.
///
/// Lines already in the customer's cart keep their price; quantities add
/// up. The guest cart is left empty.
pub fn merge_guest_cart<R>(
    guest: &CartOwner,
    customer: &CartOwner,
    shipping: &ShippingConfig,
    repo: &R,
) -> ServiceResult<()>
where
    R: CartReader + CartWriter,
{
    let mut guest_cart = match repo.find_cart(guest) {
        Ok(Some(cart)) if !cart.is_empty() => cart,
        Ok(_) => return Ok(()),
        Err(e) => {
            log::error!("Failed to load cart: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let mut customer_cart = load_cart(customer, repo)?;

    for (product_id, line) in guest_cart.items() {
        customer_cart.add_item(*product_id, line.quantity, line.unit_price);
    }
    guest_cart.clear();

    persist(customer_cart, shipping, repo)?;
    persist(guest_cart, shipping, repo)?;
    Ok(())
}

/// Stored cart of `owner`, or a new unsaved one.
pub(crate) fn load_cart<R>(owner: &CartOwner, repo: &R) -> ServiceResult<Cart>
where
    R: CartReader,
{
    match repo.find_cart(owner) {
        Ok(Some(cart)) => Ok(cart),
        Ok(None) => Ok(Cart::new(owner.clone())),
        Err(e) => {
            log::error!("Failed to load cart: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_stock(product: &Product, quantity: u32) -> ServiceResult<()> {
    if product.can_sell(quantity) {
        return Ok(());
    }
    let mut errors = FieldErrors::new();
    errors.add(
        "quantity",
        format!("Only {} of {} are in stock.", product.stock, product.name),
    );
    Err(errors.into())
}

fn persist<R>(mut cart: Cart, shipping: &ShippingConfig, repo: &R) -> ServiceResult<Cart>
where
    R: CartWriter,
{
    recalculate(&mut cart, shipping)?;
    repo.save_cart(&cart).map_err(|e| {
        log::error!("Failed to save cart: {e}");
        ServiceError::Internal
    })
}

fn save<R>(cart: Cart, shipping: &ShippingConfig, repo: &R) -> ServiceResult<CartDto>
where
    R: CartWriter + ProductReader,
{
    let cart = persist(cart, shipping, repo)?;
    describe(&cart, repo)
}

fn describe<R>(cart: &Cart, repo: &R) -> ServiceResult<CartDto>
where
    R: ProductReader,
{
    let ids: Vec<ProductId> = cart.items().keys().copied().collect();
    match repo.get_products_by_ids(&ids) {
        Ok(products) => Ok(CartDto::new(cart, &products)),
        Err(e) => {
            log::error!("Failed to load cart products: {e}");
            Err(ServiceError::Internal)
        }
    }
}
