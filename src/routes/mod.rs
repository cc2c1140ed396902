use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use serde_json::json;
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod api;
pub mod cart;
pub mod categories;
pub mod main;
pub mod orders;
pub mod products;
pub mod wishlist;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

/// JSON response for a failed service call.
///
/// Field errors become `422 {"errors": {field: [messages]}}`; everything
/// else carries a single message.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({"message": "Unauthorized."}))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({"message": "Not found."})),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(json!({"message": message})),
        ServiceError::Validation(errors) => {
            HttpResponse::UnprocessableEntity().json(json!({"errors": errors}))
        }
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(json!({"message": message})),
        ServiceError::UnknownProductType(slug) => HttpResponse::BadRequest()
            .json(json!({"message": format!("Unknown product type: {slug}.")})),
        ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({"message": message}))
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

/// Claims stored as the identity id by the auth service.
fn identity_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let id = identity.id().map_err(|e| {
        log::warn!("Unreadable identity: {e}");
        ErrorUnauthorized("not signed in")
    })?;
    let user: AuthenticatedUser = serde_json::from_str(&id).map_err(|e| {
        log::warn!("Rejected malformed identity claims: {e}");
        ErrorUnauthorized("not signed in")
    })?;

    if user.is_expired(chrono::Utc::now().timestamp()) {
        log::warn!("Rejected expired identity of {}", user.sub);
        identity.logout();
        return Err(ErrorUnauthorized("session expired"));
    }
    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_user(req))
    }
}
