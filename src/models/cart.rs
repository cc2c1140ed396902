use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{CartOwner, CartTotals};
use crate::domain::types::{CustomerId, SessionToken, TypeConstraintError};

/// Diesel model representing the `carts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carts)]
pub struct Cart {
    pub id: i32,
    pub session_token: Option<String>,
    pub customer_id: Option<String>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Cart {
    pub fn owner(&self) -> Result<CartOwner, TypeConstraintError> {
        match (&self.customer_id, &self.session_token) {
            (Some(customer_id), _) => {
                Ok(CartOwner::Customer(CustomerId::new(customer_id.as_str())?))
            }
            (None, Some(token)) => Ok(CartOwner::Session(SessionToken::new(token.as_str())?)),
            (None, None) => Err(TypeConstraintError::InvalidValue(format!(
                "cart {} has no owner",
                self.id
            ))),
        }
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            discount: self.discount,
            total: self.total,
        }
    }
}

/// Insertable form of [`Cart`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart<'a> {
    pub session_token: Option<&'a str>,
    pub customer_id: Option<&'a str>,
}

impl<'a> From<&'a CartOwner> for NewCart<'a> {
    fn from(owner: &'a CartOwner) -> Self {
        match owner {
            CartOwner::Session(token) => Self {
                session_token: Some(token.as_str()),
                customer_id: None,
            },
            CartOwner::Customer(customer_id) => Self {
                session_token: None,
                customer_id: Some(customer_id.as_str()),
            },
        }
    }
}

/// Money columns rewritten on every save.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::carts)]
pub struct CartTotalsChangeset {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub updated_at: NaiveDateTime,
}

impl From<CartTotals> for CartTotalsChangeset {
    fn from(totals: CartTotals) -> Self {
        Self {
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Diesel model representing the `cart_items` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
}
