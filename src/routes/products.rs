use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{ProductId, ProductImageId};
use crate::forms::products::{ProductForm, ProductFormPayload};
use crate::forms::uploads::{UploadImageForm, image_extension};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::products::{
    add_product as add_product_service, add_product_image as add_product_image_service,
    delete_product as delete_product_service,
    delete_product_image as delete_product_image_service, reject_product_form,
    show_product as show_product_service,
    show_product_types as show_product_types_service, show_products as show_products_service,
    update_product as update_product_service,
};

#[derive(Deserialize)]
struct ProductsQueryParams {
    search: Option<String>,
    page: Option<usize>,
}

#[get("/product-types")]
pub async fn show_product_types(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_product_types_service(&user, repo.get_ref()) {
        Ok(product_types) => HttpResponse::Ok().json(product_types),
        Err(err) => error_response(err),
    }
}

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    match show_products_service(
        params.search,
        params.page.unwrap_or(1),
        &user,
        repo.get_ref(),
    ) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };

    match show_product_service(product_id, &user, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[post("/products")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let payload: ProductFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(rejected) => {
            return error_response(reject_product_form(rejected, None, &user, repo.get_ref()));
        }
    };

    match add_product_service(payload, &user, repo.get_ref()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };
    let payload: ProductFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(rejected) => {
            return error_response(reject_product_form(
                rejected,
                Some(product_id),
                &user,
                repo.get_ref(),
            ));
        }
    };

    match update_product_service(product_id, payload, &user, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };

    match delete_product_service(
        product_id,
        Path::new(&server_config.upload_dir),
        &user,
        repo.get_ref(),
    ) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[post("/products/{product_id}/images")]
pub async fn upload_product_image(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };
    let extension = match image_extension(&form.image) {
        Ok(extension) => extension,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match add_product_image_service(
        product_id,
        form.image.file.path(),
        extension,
        Path::new(&server_config.upload_dir),
        &user,
        repo.get_ref(),
    ) {
        Ok(image) => HttpResponse::Created().json(image),
        Err(err) => error_response(err),
    }
}

#[delete("/products/{product_id}/images/{image_id}")]
pub async fn delete_product_image(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let (product_id, image_id) = path.into_inner();
    let (Ok(product_id), Ok(image_id)) = (ProductId::new(product_id), ProductImageId::new(image_id))
    else {
        return error_response(ServiceError::NotFound);
    };

    match delete_product_image_service(
        product_id,
        image_id,
        Path::new(&server_config.upload_dir),
        &user,
        repo.get_ref(),
    ) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
