//! Shopping cart aggregate.
//!
//! A cart maps products to a quantity and the unit price captured when the
//! product was first added. Subtotal, tax and total are derived values: every
//! mutation leaves them stale until [`Cart::calculate_totals`] runs again.
//! Shipping and discount are set from outside and only read by the totals
//! computation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CartId, CustomerId, Money, ProductId, SessionToken, round_money};

/// Fixed sales tax rate applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: f64 = 18.0;

/// Who a cart belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CartOwner {
    /// Anonymous visitor identified by a session token.
    Session(SessionToken),
    /// Authenticated customer.
    Customer(CustomerId),
}

/// Quantity and captured unit price of one product in the cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub quantity: u32,
    pub unit_price: Money,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price.get() * f64::from(self.quantity)
    }
}

/// Derived and externally set money fields of a cart.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// `None` until the cart has been persisted.
    pub id: Option<CartId>,
    pub owner: CartOwner,
    items: BTreeMap<ProductId, CartLine>,
    totals: CartTotals,
}

impl Cart {
    /// Empty cart for `owner`.
    pub fn new(owner: CartOwner) -> Self {
        Self {
            id: None,
            owner,
            items: BTreeMap::new(),
            totals: CartTotals::default(),
        }
    }

    /// Rebuild a cart from persisted state without recomputing anything.
    pub fn restore(
        id: CartId,
        owner: CartOwner,
        items: BTreeMap<ProductId, CartLine>,
        totals: CartTotals,
    ) -> Self {
        Self {
            id: Some(id),
            owner,
            items,
            totals,
        }
    }

    /// Adds `quantity` units of a product.
    ///
    /// An existing line keeps the unit price it was first added at; only its
    /// quantity grows.
    pub fn add_item(&mut self, product_id: ProductId, quantity: u32, unit_price: Money) {
        self.items
            .entry(product_id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(quantity))
            .or_insert(CartLine {
                quantity,
                unit_price,
            });
    }

    /// Drops the product's line. Absent products are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.remove(&product_id);
    }

    /// Overwrites the quantity of an existing line. Never inserts.
    pub fn update_item_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self.items.get_mut(&product_id) {
            line.quantity = quantity;
        }
    }

    /// Removes every line and zeroes all money fields, shipping and discount
    /// included.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::default();
    }

    pub fn set_shipping(&mut self, shipping: Money) {
        self.totals.shipping = shipping.get();
    }

    pub fn set_discount(&mut self, discount: Money) {
        self.totals.discount = discount.get();
    }

    /// Recomputes subtotal, tax and total from the current lines.
    pub fn calculate_totals(&mut self) {
        let subtotal = round_money(self.items.values().map(CartLine::line_total).sum());
        let tax = round_money(subtotal * TAX_RATE_PERCENT / 100.0);
        self.totals.subtotal = subtotal;
        self.totals.tax = tax;
        self.totals.total =
            round_money(subtotal + tax + self.totals.shipping - self.totals.discount);
    }

    pub fn items(&self) -> &BTreeMap<ProductId, CartLine> {
        &self.items
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.items.get(&product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals as of the last [`Cart::calculate_totals`] call.
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn item_count(&self) -> u32 {
        self.items.values().map(|line| line.quantity).sum()
    }
}
