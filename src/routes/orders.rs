use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::OrderId;
use crate::forms::checkout::{CheckoutForm, CheckoutFormPayload};
use crate::forms::orders::{OrderStatusForm, OrderStatusFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::cart::resolve_cart_owner;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::checkout::place_order as place_order_service;
use crate::services::orders::{
    change_order_status as change_order_status_service, export_orders as export_orders_service,
    show_my_order as show_my_order_service, show_my_orders as show_my_orders_service,
    show_order as show_order_service, show_orders as show_orders_service,
};

#[derive(Deserialize)]
struct OrdersQueryParams {
    status: Option<String>,
    page: Option<usize>,
}

#[post("/checkout")]
pub async fn checkout(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CheckoutForm>,
) -> impl Responder {
    let payload: CheckoutFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };
    let owner = match resolve_cart_owner(user.as_ref(), &session, &repo, &server_config) {
        Ok(owner) => owner,
        Err(err) => return error_response(err),
    };

    match place_order_service(&owner, payload, &server_config.shipping, repo.get_ref()) {
        Ok(order) => HttpResponse::Created().json(order),
        Err(err) => error_response(err),
    }
}

#[get("/orders")]
pub async fn show_my_orders(
    params: web::Query<OrdersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_my_orders_service(params.page.unwrap_or(1), &user, repo.get_ref()) {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(err) => error_response(err),
    }
}

#[get("/orders/{order_id}")]
pub async fn show_my_order(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(order_id) = OrderId::new(order_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };

    match show_my_order_service(order_id, &user, repo.get_ref()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err),
    }
}

#[get("/orders")]
pub async fn admin_show_orders(
    params: web::Query<OrdersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    match show_orders_service(
        params.status,
        params.page.unwrap_or(1),
        &user,
        repo.get_ref(),
    ) {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(err) => error_response(err),
    }
}

#[get("/orders/export")]
pub async fn admin_export_orders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_orders_service(&user, repo.get_ref()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(err) => error_response(err),
    }
}

#[get("/orders/{order_id}")]
pub async fn admin_show_order(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(order_id) = OrderId::new(order_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };

    match show_order_service(order_id, &user, repo.get_ref()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err),
    }
}

#[post("/orders/{order_id}/status")]
pub async fn admin_change_order_status(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<OrderStatusForm>,
) -> impl Responder {
    let Ok(order_id) = OrderId::new(order_id.into_inner()) else {
        return error_response(ServiceError::NotFound);
    };
    let payload: OrderStatusFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match change_order_status_service(order_id, payload, &user, repo.get_ref()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err),
    }
}
