use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    Address, NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem,
    OrderStatusChange,
};
use crate::domain::types::{
    CustomerId, Email, OrderNumber, OrderStatus, PaymentStatus, ProductName, ProductSku,
    SessionToken, TypeConstraintError,
};

/// Diesel model representing the `orders` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub customer_id: Option<String>,
    pub session_token: Option<String>,
    pub email: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub payment_status: String,
    pub order_status: String,
    pub paid_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Order`]. Addresses are stored as JSON text.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Option<String>,
    pub session_token: Option<String>,
    pub email: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
}

/// Diesel model representing the `order_items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub sku: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub sku: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

fn address_from_json(value: &str) -> Result<Address, TypeConstraintError> {
    serde_json::from_str(value)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("stored address: {e}")))
}

fn address_to_json(address: &Address) -> Result<String, TypeConstraintError> {
    serde_json::to_string(address)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("address: {e}")))
}

fn quantity_to_db(quantity: u32) -> Result<i32, TypeConstraintError> {
    i32::try_from(quantity)
        .map_err(|_| TypeConstraintError::InvalidValue(format!("quantity {quantity} too large")))
}

impl TryFrom<&DomainNewOrder> for NewOrder {
    type Error = TypeConstraintError;

    fn try_from(order: &DomainNewOrder) -> Result<Self, Self::Error> {
        Ok(Self {
            order_number: order.order_number.as_str().to_string(),
            customer_id: order.customer_id.as_ref().map(|c| c.as_str().to_string()),
            session_token: order.session_token.as_ref().map(|s| s.as_str().to_string()),
            email: order.email.as_str().to_string(),
            shipping_address: address_to_json(&order.shipping_address)?,
            billing_address: address_to_json(&order.billing_address)?,
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            discount: order.discount,
            total: order.total,
        })
    }
}

impl NewOrderItem {
    pub fn new(order_id: i32, item: &DomainOrderItem) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            order_id,
            product_id: item.product_id.get(),
            product_name: item.product_name.as_str().to_string(),
            sku: item.sku.as_str().to_string(),
            unit_price: item.unit_price,
            quantity: quantity_to_db(item.quantity)?,
            line_total: item.line_total,
        })
    }
}

impl TryFrom<OrderItem> for DomainOrderItem {
    type Error = TypeConstraintError;

    fn try_from(item: OrderItem) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: item.product_id.try_into()?,
            product_name: ProductName::new(item.product_name)?,
            sku: ProductSku::new(item.sku)?,
            unit_price: item.unit_price,
            quantity: u32::try_from(item.quantity).map_err(|_| {
                TypeConstraintError::NegativeNumber("quantity")
            })?,
            line_total: item.line_total,
        })
    }
}

impl Order {
    /// Converts into the domain entity with its already-loaded items.
    pub fn into_domain(self, items: Vec<OrderItem>) -> Result<DomainOrder, TypeConstraintError> {
        Ok(DomainOrder {
            id: self.id.try_into()?,
            order_number: OrderNumber::new(self.order_number)?,
            customer_id: self.customer_id.map(CustomerId::new).transpose()?,
            session_token: self.session_token.map(SessionToken::new).transpose()?,
            email: Email::new(self.email)?,
            shipping_address: address_from_json(&self.shipping_address)?,
            billing_address: address_from_json(&self.billing_address)?,
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            discount: self.discount,
            total: self.total,
            payment_status: PaymentStatus::try_from(self.payment_status)?,
            order_status: OrderStatus::try_from(self.order_status)?,
            paid_at: self.paid_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items: items
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// Columns touched when staff move an order along.
///
/// `None` fields are left untouched; the timestamp matching a newly reached
/// milestone is stamped once.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct OrderStatusChangeset {
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl From<OrderStatusChange> for OrderStatusChangeset {
    fn from(change: OrderStatusChange) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let mut changeset = Self {
            updated_at: now,
            ..Default::default()
        };
        match change {
            OrderStatusChange::Fulfilment(status) => {
                match status {
                    OrderStatus::Shipped => changeset.shipped_at = Some(now),
                    OrderStatus::Delivered => changeset.delivered_at = Some(now),
                    _ => {}
                }
                changeset.order_status = Some(status.to_string());
            }
            OrderStatusChange::Payment(status) => {
                if status == PaymentStatus::Paid {
                    changeset.paid_at = Some(now);
                }
                changeset.payment_status = Some(status.to_string());
            }
        }
        changeset
    }
}
