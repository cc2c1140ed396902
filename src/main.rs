use std::env;
use std::fs;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::{Config, Environment, File};
use tera::Tera;

use pushkind_storefront::db::establish_connection_pool;
use pushkind_storefront::models::config::ServerConfig;
use pushkind_storefront::repository::DieselRepository;
use pushkind_storefront::routes::{api, cart, categories, main as admin, orders, products, wishlist};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Cookie secret is unusable: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    fs::create_dir_all(&server_config.upload_dir)?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting storefront on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        let cookie_domain =
            Some(server_config.domain.clone()).filter(|domain| !domain.is_empty());

        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(cookie_domain)
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/uploads", &server_config.upload_dir))
            .service(
                web::scope("/api/v1")
                    .service(api::api_v1_categories)
                    .service(api::api_v1_products)
                    .service(api::api_v1_product)
                    .service(cart::show_cart)
                    .service(cart::add_to_cart)
                    .service(cart::update_cart_item)
                    .service(cart::remove_from_cart)
                    .service(cart::clear_cart)
                    .service(wishlist::show_wishlist)
                    .service(wishlist::add_to_wishlist)
                    .service(wishlist::remove_from_wishlist)
                    .service(orders::checkout)
                    .service(orders::show_my_orders)
                    .service(orders::show_my_order),
            )
            .service(
                web::scope("/admin")
                    .service(
                        web::scope("/api")
                            .service(categories::show_categories)
                            .service(categories::add_category)
                            .service(categories::update_category)
                            .service(categories::delete_category)
                            .service(products::show_product_types)
                            .service(products::show_products)
                            .service(products::show_product)
                            .service(products::add_product)
                            .service(products::update_product)
                            .service(products::delete_product)
                            .service(products::upload_product_image)
                            .service(products::delete_product_image)
                            .service(orders::admin_show_orders)
                            .service(orders::admin_export_orders)
                            .service(orders::admin_show_order)
                            .service(orders::admin_change_order_status),
                    )
                    .service(admin::admin_index),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
