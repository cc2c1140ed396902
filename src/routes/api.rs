//! Public catalog endpoints under `/api/v1`.

use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::catalog::{
    CatalogFilter, list_categories as list_categories_service,
    list_products as list_products_service, show_product as show_product_service,
};

#[derive(Deserialize, Debug)]
struct ApiV1ProductsQueryParams {
    category: Option<String>,
    featured: Option<bool>,
    search: Option<String>,
    page: Option<usize>,
}

#[get("/categories")]
pub async fn api_v1_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(err),
    }
}

#[get("/products")]
pub async fn api_v1_products(
    params: web::Query<ApiV1ProductsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let filter = CatalogFilter {
        category: params.category,
        featured: params.featured.unwrap_or(false),
        search: params.search,
        page: params.page.unwrap_or(1),
    };

    match list_products_service(filter, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/products/{slug}")]
pub async fn api_v1_product(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_product_service(&slug.into_inner(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}
