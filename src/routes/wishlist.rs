use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::ProductId;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::wishlist::{
    add_to_wishlist as add_to_wishlist_service,
    remove_from_wishlist as remove_from_wishlist_service, show_wishlist as show_wishlist_service,
};

#[derive(Deserialize)]
struct WishlistForm {
    product_id: i32,
}

#[get("/wishlist")]
pub async fn show_wishlist(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_wishlist_service(&user, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[post("/wishlist")]
pub async fn add_to_wishlist(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<WishlistForm>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(form.product_id) else {
        return error_response(ServiceError::NotFound);
    };

    match add_to_wishlist_service(product_id, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[delete("/wishlist/{product_id}")]
pub async fn remove_from_wishlist(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };

    match remove_from_wishlist_service(product_id, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
