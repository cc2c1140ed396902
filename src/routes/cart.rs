//! Cart endpoints for guests and signed-in customers.
//!
//! Guests are tracked by a random token kept in the cookie session. When a
//! guest signs in, the cart collected under that token is merged into the
//! customer's cart and the token is dropped.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};
use uuid::Uuid;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::cart::CartOwner;
use crate::domain::types::{CustomerId, ProductId, SessionToken};
use crate::forms::cart::{
    AddToCartForm, AddToCartFormPayload, UpdateCartItemForm, UpdateCartItemFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::cart::{
    add_to_cart as add_to_cart_service, clear_cart as clear_cart_service,
    merge_guest_cart as merge_guest_cart_service, remove_from_cart as remove_from_cart_service,
    show_cart as show_cart_service, update_cart_item as update_cart_item_service,
};

const CART_TOKEN_KEY: &str = "cart_token";

fn session_error(e: impl std::fmt::Display) -> ServiceError {
    log::error!("Failed to access cart session: {e}");
    ServiceError::Internal
}

/// Owner of the cart the request works on, creating a guest token when the
/// visitor has none yet.
pub fn resolve_cart_owner(
    user: Option<&AuthenticatedUser>,
    session: &Session,
    repo: &DieselRepository,
    server_config: &ServerConfig,
) -> Result<CartOwner, ServiceError> {
    let token = session
        .get::<String>(CART_TOKEN_KEY)
        .map_err(session_error)?
        .and_then(|token| SessionToken::new(token).ok());

    let Some(user) = user else {
        if let Some(token) = token {
            return Ok(CartOwner::Session(token));
        }
        let token = SessionToken::new(Uuid::new_v4().to_string())?;
        session
            .insert(CART_TOKEN_KEY, token.as_str())
            .map_err(session_error)?;
        return Ok(CartOwner::Session(token));
    };

    let customer = CartOwner::Customer(
        CustomerId::new(user.sub.as_str()).map_err(|_| ServiceError::Unauthorized)?,
    );
    if let Some(token) = token {
        merge_guest_cart_service(
            &CartOwner::Session(token),
            &customer,
            &server_config.shipping,
            repo,
        )?;
        session.remove(CART_TOKEN_KEY);
    }
    Ok(customer)
}

#[get("/cart")]
pub async fn show_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match show_cart_service(&owner, &server_config.shipping, repo.get_ref()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => error_response(err),
    }
}

#[post("/cart/items")]
pub async fn add_to_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<AddToCartForm>,
) -> impl Responder {
    let payload: AddToCartFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match add_to_cart_service(&owner, payload, &server_config.shipping, repo.get_ref()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => error_response(err),
    }
}

#[patch("/cart/items/{product_id}")]
pub async fn update_cart_item(
    product_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<UpdateCartItemForm>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };
    let payload: UpdateCartItemFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match update_cart_item_service(
        &owner,
        product_id,
        payload,
        &server_config.shipping,
        repo.get_ref(),
    ) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => error_response(err),
    }
}

#[delete("/cart/items/{product_id}")]
pub async fn remove_from_cart(
    product_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match remove_from_cart_service(&owner, product_id, &server_config.shipping, repo.get_ref()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => error_response(err),
    }
}

#[delete("/cart")]
pub async fn clear_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match clear_cart_service(&owner, &server_config.shipping, repo.get_ref()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => error_response(err),
    }
}
