use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult, ensure_admin};

pub fn show_categories<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    ensure_admin(user)?;

    match repo.list_categories(CategoryListQuery::default()) {
        Ok((_total, categories)) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_category<R>(
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    match repo.create_category(&payload.category) {
        Ok(category) => Ok(category.into()),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(
            "The slug has already been taken.".into(),
        )),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn update_category<R>(
    category_id: CategoryId,
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_category(category_id, &payload.category) {
        Ok(_) => {}
        Err(RepositoryError::Conflict(_)) => {
            return Err(ServiceError::Conflict(
                "The slug has already been taken.".into(),
            ));
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories still holding products cannot be deleted.
pub fn delete_category<R>(
    category_id: CategoryId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    match repo.delete_category(category_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(RepositoryError::ForeignKey(_)) => Err(ServiceError::Form(
            "The category still has products and cannot be deleted.".into(),
        )),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
