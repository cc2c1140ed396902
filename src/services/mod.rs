use crate::ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;

pub mod cart;
pub mod catalog;
pub mod categories;
pub mod checkout;
pub mod errors;
pub mod orders;
pub mod products;
pub mod wishlist;

pub use errors::{ServiceError, ServiceResult};

/// Fail with [`ServiceError::Unauthorized`] unless `user` is store staff.
pub fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.has_role(ADMIN_ROLE) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
