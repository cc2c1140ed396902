//! Core library exports for the storefront service.
//!
//! The `data` feature exposes the domain model, Diesel models, repositories
//! and the product spec strategies. The `server` feature adds forms,
//! services and the Actix-web routes of the storefront and admin APIs.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod specs;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role granting access to the admin console and API.
pub const ADMIN_ROLE: &str = "storefront_admin";
