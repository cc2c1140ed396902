use actix_web::{Responder, get, web};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::routes::{error_response, render_template};
use crate::services::ensure_admin;

/// Host page of the staff console; the console itself talks to
/// `/admin/api`.
#[get("")]
pub async fn admin_index(user: AuthenticatedUser, tera: web::Data<Tera>) -> impl Responder {
    if let Err(err) = ensure_admin(&user) {
        return error_response(err);
    }

    let mut context = Context::new();
    context.insert("current_user", &user);
    context.insert("current_page", "admin");
    context.insert("api_url", "/admin/api");
    render_template(&tera, "admin/index.html", &context)
}
