use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{CustomerId, ProductId};
use crate::dto::products::ProductDto;
use crate::repository::{ProductReader, WishlistReader, WishlistWriter};

use super::{ServiceError, ServiceResult};

fn customer_id(user: &AuthenticatedUser) -> ServiceResult<CustomerId> {
    CustomerId::new(user.sub.as_str()).map_err(|_| ServiceError::Unauthorized)
}

/// Saved products that are still on sale, newest first.
pub fn show_wishlist<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ProductDto>>
where
    R: WishlistReader + ProductReader,
{
    let customer_id = customer_id(user)?;

    let items = match repo.list_wishlist(&customer_id) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to list wishlist: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();

    let products = match repo.get_products_by_ids(&ids) {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to load wishlist products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(ids
        .iter()
        .filter_map(|id| products.iter().find(|p| p.id == *id && p.is_active))
        .cloned()
        .map(ProductDto::from)
        .collect())
}

/// Adding a product that is already saved is a no-op.
pub fn add_to_wishlist<R>(
    product_id: ProductId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: WishlistWriter + ProductReader,
{
    let customer_id = customer_id(user)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) if product.is_active => {}
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.add_to_wishlist(&customer_id, product_id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to add to wishlist: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn remove_from_wishlist<R>(
    product_id: ProductId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: WishlistWriter,
{
    let customer_id = customer_id(user)?;

    match repo.remove_from_wishlist(&customer_id, product_id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to remove from wishlist: {e}");
            Err(ServiceError::Internal)
        }
    }
}
