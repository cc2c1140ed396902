pub mod cart;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod order;
pub mod product;
pub mod product_image;
pub mod product_type;
pub mod spec;
pub mod wishlist;
