pub mod auth;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod product_type;
pub mod spec;
pub mod types;
pub mod wishlist;
