//! Staff product management.
//!
//! Products are written together with the spec record chosen by their
//! product type. The product form, its references and the spec are all
//! validated before anything is written, and their errors are reported
//! together.

use std::fs;
use std::path::Path;

use uuid::Uuid;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::product::Product;
use crate::domain::product_type::ProductType;
use crate::domain::types::{CategoryId, ImagePath, ProductId, ProductImageId, ProductTypeId};
use crate::dto::products::{ProductDetailDto, ProductDto, ProductImageDto};
use crate::forms::products::{ProductFormPayload, RejectedProductForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CategoryReader, ProductListQuery, ProductReader, ProductTypeReader, ProductWriter,
    RepositoryError, SpecReader, SpecWriter,
};
use crate::services::catalog::product_detail;
use crate::specs::{FieldErrors, ProductSpecKind, RawSpecData, SpecError, ValidatedSpec};

use super::{ServiceError, ServiceResult, ensure_admin};

/// Sub-directory of the upload root holding product images.
const PRODUCT_IMAGE_DIR: &str = "products";

pub fn show_products<R>(
    search: Option<String>,
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<ProductDto>>
where
    R: ProductReader,
{
    ensure_admin(user)?;

    let page = page.max(1);
    let mut query = ProductListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }

    match repo.list_products(query) {
        Ok((total, products)) => Ok(Paginated::new(
            products.into_iter().map(ProductDto::from).collect(),
            page,
            total,
            DEFAULT_ITEMS_PER_PAGE,
        )),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn show_product<R>(
    product_id: ProductId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductDetailDto>
where
    R: ProductReader + ProductTypeReader + SpecReader,
{
    ensure_admin(user)?;

    let product = find_product(product_id, repo)?;
    product_detail(product, repo)
}

pub fn show_product_types<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ProductType>>
where
    R: ProductTypeReader,
{
    ensure_admin(user)?;

    repo.list_product_types().map_err(|e| {
        log::error!("Failed to list product types: {e}");
        ServiceError::Internal
    })
}

pub fn add_product<R>(
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductDetailDto>
where
    R: CategoryReader + ProductReader + ProductWriter + ProductTypeReader + SpecReader + SpecWriter,
{
    ensure_admin(user)?;

    let spec = validate_submission(&payload, None, repo)?;

    let product = match repo.create_product(&payload.product) {
        Ok(product) => product,
        Err(RepositoryError::Conflict(message)) => {
            return Err(ServiceError::Conflict(conflict_message(&message)));
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    // A spec that fails to store leaves no half-created product behind.
    if let Err(e) = spec.store(&product, repo) {
        if let Err(cleanup) = repo.delete_product(product.id) {
            log::error!("Failed to remove product {} after spec error: {cleanup}", product.id);
        }
        return Err(match e {
            SpecError::Conflict(message) => ServiceError::Conflict(conflict_message(&message)),
            other => other.into(),
        });
    }

    log::info!("Created product {} ({})", product.id, product.sku);
    product_detail(product, repo)
}

pub fn update_product<R>(
    product_id: ProductId,
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductDetailDto>
where
    R: CategoryReader + ProductReader + ProductWriter + ProductTypeReader + SpecReader,
{
    ensure_admin(user)?;

    let existing = find_product(product_id, repo)?;
    let spec = validate_submission(&payload, Some(&existing), repo)?;

    match repo.update_product_with_spec(product_id, &payload.product, &spec) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(RepositoryError::Conflict(message)) => {
            return Err(ServiceError::Conflict(conflict_message(&message)));
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let product = find_product(product_id, repo)?;
    product_detail(product, repo)
}

/// Turn a product form that failed its own checks into a 422 that also
/// carries the errors of its references and spec.
///
/// `product_id` is the product being edited, `None` on create.
pub fn reject_product_form<R>(
    rejected: RejectedProductForm,
    product_id: Option<ProductId>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceError
where
    R: CategoryReader + ProductReader + ProductTypeReader + SpecReader,
{
    if let Err(e) = ensure_admin(user) {
        return e;
    }

    let existing = match product_id.map(|id| find_product(id, repo)).transpose() {
        Ok(existing) => existing,
        Err(e) => return e,
    };

    match check_submission(
        rejected.category_id,
        rejected.product_type_id,
        rejected.spec.as_ref(),
        existing.as_ref(),
        rejected.errors,
        repo,
    ) {
        Ok((errors, _)) => ServiceError::Validation(errors),
        Err(e) => e,
    }
}

/// Delete a product with its spec and images, removing the image files.
pub fn delete_product<R>(
    product_id: ProductId,
    upload_dir: &Path,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;

    let product = find_product(product_id, repo)?;

    match repo.delete_product(product_id) {
        Ok(_) => {}
        Err(RepositoryError::ForeignKey(_)) => {
            return Err(ServiceError::Form(
                "The product is referenced by other records and cannot be deleted.".into(),
            ));
        }
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    for image in &product.images {
        remove_image_file(upload_dir, &image.path);
    }
    Ok(())
}

/// Copy an uploaded file into the upload directory and attach it to the
/// product after its existing images.
pub fn add_product_image<R>(
    product_id: ProductId,
    source: &Path,
    extension: &str,
    upload_dir: &Path,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductImageDto>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;

    find_product(product_id, repo)?;

    let relative = format!("{PRODUCT_IMAGE_DIR}/{}.{extension}", Uuid::new_v4());
    let path = ImagePath::new(relative)?;
    let destination = upload_dir.join(path.as_str());

    if let Some(parent) = destination.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        log::error!("Failed to create upload directory {}: {e}", parent.display());
        return Err(ServiceError::Internal);
    }
    if let Err(e) = fs::copy(source, &destination) {
        log::error!("Failed to store uploaded image: {e}");
        return Err(ServiceError::Internal);
    }

    match repo.add_product_image(product_id, &path) {
        Ok(image) => Ok(image.into()),
        Err(e) => {
            log::error!("Failed to add product image: {e}");
            remove_image_file(upload_dir, &path);
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_product_image<R>(
    product_id: ProductId,
    image_id: ProductImageId,
    upload_dir: &Path,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductWriter,
{
    ensure_admin(user)?;

    match repo.delete_product_image(product_id, image_id) {
        Ok(Some(path)) => {
            remove_image_file(upload_dir, &path);
            Ok(())
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete product image: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn find_product<R>(product_id: ProductId, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validate a well-formed product payload against the database and the
/// strategy of its type.
fn validate_submission<R>(
    payload: &ProductFormPayload,
    existing: Option<&Product>,
    repo: &R,
) -> ServiceResult<ValidatedSpec>
where
    R: CategoryReader + ProductTypeReader + SpecReader,
{
    let (errors, spec) = check_submission(
        Some(payload.product.category_id),
        Some(payload.product.product_type_id),
        Some(&payload.spec),
        existing,
        FieldErrors::new(),
        repo,
    )?;

    match spec {
        Some(spec) if errors.is_empty() => Ok(spec),
        _ => Err(ServiceError::Validation(errors)),
    }
}

/// Check that the category and product type exist and run the type's spec
/// strategy, adding every failure to `errors`.
///
/// References that did not parse are skipped; the form already reported
/// them. The spec is only validated once its type is known.
fn check_submission<R>(
    category_id: Option<CategoryId>,
    product_type_id: Option<ProductTypeId>,
    spec: Option<&RawSpecData>,
    existing: Option<&Product>,
    mut errors: FieldErrors,
    repo: &R,
) -> ServiceResult<(FieldErrors, Option<ValidatedSpec>)>
where
    R: CategoryReader + ProductTypeReader + SpecReader,
{
    if let Some(category_id) = category_id {
        match repo.get_category_by_id(category_id) {
            Ok(Some(_)) => {}
            Ok(None) => errors.add("category_id", "The selected category is invalid."),
            Err(e) => {
                log::error!("Failed to get category: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    let kind = match product_type_id.map(|id| repo.get_product_type_by_id(id)) {
        None => None,
        Some(Ok(Some(product_type))) => Some(ProductSpecKind::resolve(product_type.slug.as_str())?),
        Some(Ok(None)) => {
            errors.add("product_type_id", "The selected product type is invalid.");
            None
        }
        Some(Err(e)) => {
            log::error!("Failed to get product type: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let validated = match (kind, spec) {
        (Some(kind), Some(raw)) => match kind.validate(raw, existing, repo) {
            Ok(validated) => Some(validated),
            Err(SpecError::Validation(spec_errors)) => {
                errors.merge(spec_errors);
                None
            }
            Err(e) => return Err(e.into()),
        },
        _ => None,
    };

    Ok((errors, validated))
}

/// Client-facing message for a unique index violation.
fn conflict_message(message: &str) -> String {
    if message.contains("huid") {
        "The huid has already been taken.".into()
    } else {
        "The slug or sku has already been taken.".into()
    }
}

fn remove_image_file(upload_dir: &Path, path: &ImagePath) {
    let file = upload_dir.join(path.as_str());
    if let Err(e) = fs::remove_file(&file) {
        log::warn!("Failed to remove image file {}: {e}", file.display());
    }
}
