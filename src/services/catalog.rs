//! Public catalog: what anonymous visitors may browse.

use crate::domain::product::Product;
use crate::domain::types::{CategorySlug, ProductSlug};
use crate::dto::categories::CategoryDto;
use crate::dto::products::{ProductDetailDto, ProductDto};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CategoryListQuery, CategoryReader, ProductListQuery, ProductReader, ProductTypeReader,
    SpecReader,
};
use crate::specs::ProductSpecKind;

use super::{ServiceError, ServiceResult};

/// Filters accepted by the storefront product listing.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub featured: bool,
    pub search: Option<String>,
    pub page: usize,
}

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryListQuery::default().active()) {
        Ok((_total, categories)) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_products<R>(filter: CatalogFilter, repo: &R) -> ServiceResult<Paginated<ProductDto>>
where
    R: CategoryReader + ProductReader,
{
    let page = filter.page.max(1);
    let mut query = ProductListQuery::default()
        .active()
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(slug) = filter.category.as_deref() {
        let slug = CategorySlug::new(slug).map_err(|_| ServiceError::NotFound)?;
        match repo.get_category_by_slug(&slug) {
            Ok(Some(category)) if category.is_active => query = query.category(category.id),
            Ok(_) => return Err(ServiceError::NotFound),
            Err(e) => {
                log::error!("Failed to get category: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }
    if filter.featured {
        query = query.featured();
    }
    if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
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

pub fn show_product<R>(slug: &str, repo: &R) -> ServiceResult<ProductDetailDto>
where
    R: ProductReader + ProductTypeReader + SpecReader,
{
    let slug = ProductSlug::new(slug).map_err(|_| ServiceError::NotFound)?;

    let product = match repo.get_product_by_slug(&slug) {
        Ok(Some(product)) if product.is_active => product,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    product_detail(product, repo)
}

/// Attach the product's type and spec record.
///
/// A product whose type has no strategy is shown without a spec.
pub fn product_detail<R>(product: Product, repo: &R) -> ServiceResult<ProductDetailDto>
where
    R: ProductTypeReader + SpecReader,
{
    let product_type = match repo.get_product_type_by_id(product.product_type_id) {
        Ok(Some(product_type)) => product_type,
        Ok(None) => {
            log::error!("Product {} references a missing product type", product.id);
            return Err(ServiceError::Internal);
        }
        Err(e) => {
            log::error!("Failed to get product type: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let spec = match ProductSpecKind::resolve(product_type.slug.as_str()) {
        Ok(kind) => kind.load(product.id, repo).map_err(|e| {
            log::error!("Failed to load product spec: {e}");
            ServiceError::Internal
        })?,
        Err(_) => None,
    };

    Ok(ProductDetailDto {
        product: ProductDto::from(product),
        product_type: product_type.slug.into_inner(),
        spec,
    })
}
