//! JSON shapes returned by the API.

pub mod cart;
pub mod categories;
pub mod products;
