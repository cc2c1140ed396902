use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartOwner};
use crate::domain::product::Product;
use crate::domain::types::{
    CustomerId, Email, OrderId, OrderNumber, OrderStatus, PaymentStatus, ProductId, ProductName,
    ProductSku, SessionToken, round_money,
};

/// Postal address captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

/// Placed order. Items are a snapshot and never change after checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub customer_id: Option<CustomerId>,
    pub session_token: Option<SessionToken>,
    pub email: Email,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: ProductName,
    pub sku: ProductSku,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Order about to be written at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub customer_id: Option<CustomerId>,
    pub session_token: Option<SessionToken>,
    pub email: Email,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub items: Vec<OrderItem>,
}

/// Contact and address details supplied at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutDetails {
    pub email: Email,
    pub shipping_address: Address,
    pub billing_address: Address,
}

impl NewOrder {
    /// Snapshots a cart whose totals are current.
    ///
    /// `products` must contain every product in the cart; lines without a
    /// matching product are skipped.
    pub fn from_cart(
        order_number: OrderNumber,
        cart: &Cart,
        products: &[Product],
        details: CheckoutDetails,
    ) -> Self {
        let items = cart
            .items()
            .iter()
            .filter_map(|(product_id, line)| {
                let product = products.iter().find(|p| p.id == *product_id)?;
                Some(OrderItem {
                    product_id: *product_id,
                    product_name: product.name.clone(),
                    sku: product.sku.clone(),
                    unit_price: line.unit_price.get(),
                    quantity: line.quantity,
                    line_total: round_money(line.line_total()),
                })
            })
            .collect();

        let (customer_id, session_token) = match &cart.owner {
            CartOwner::Customer(id) => (Some(id.clone()), None),
            CartOwner::Session(token) => (None, Some(token.clone())),
        };

        let totals = cart.totals();
        Self {
            order_number,
            customer_id,
            session_token,
            email: details.email,
            shipping_address: details.shipping_address,
            billing_address: details.billing_address,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            items,
        }
    }
}

/// Staff-requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatusChange {
    Fulfilment(OrderStatus),
    Payment(PaymentStatus),
}
