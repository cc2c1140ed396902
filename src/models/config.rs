use serde::Deserialize;

/// Runtime configuration of the storefront server.
///
/// Loaded from `config/default.yaml`, an optional `config/{APP_ENV}.yaml` and
/// `APP__*` environment variables, in that order.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// SQLite database file.
    pub database_url: String,
    /// Secret shared with the auth service for signing cookies. At least 64 bytes.
    pub secret: String,
    /// Cookie domain; empty for host-only cookies.
    #[serde(default)]
    pub domain: String,
    /// Glob passed to Tera.
    pub templates_dir: String,
    /// Directory uploaded product images are written to and served from.
    pub upload_dir: String,
    pub shipping: ShippingConfig,
}

/// Shipping charged on carts.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ShippingConfig {
    pub flat_rate: f64,
    /// Subtotal from which shipping is free.
    pub free_shipping_threshold: f64,
}

impl ShippingConfig {
    /// Shipping owed on a cart with the given subtotal.
    pub fn cost_for(&self, subtotal: f64) -> f64 {
        if subtotal <= 0.0 || subtotal >= self.free_shipping_threshold {
            0.0
        } else {
            self.flat_rate
        }
    }
}
