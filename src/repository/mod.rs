use crate::db::{DbConnection, DbPool};
use crate::domain::cart::{Cart, CartOwner};
use crate::domain::category::{Category, NewCategory};
use crate::domain::order::{NewOrder, Order, OrderStatusChange};
use crate::domain::product::{NewProduct, Product, ProductImage};
use crate::domain::product_type::ProductType;
use crate::domain::spec::{
    DiamondSpec, DiamondSpecFields, JewelrySpec, JewelrySpecFields, ValidatedSpec, WatchSpec,
    WatchSpecFields,
};
use crate::domain::types::{
    CategoryId, CategorySlug, CustomerId, ImagePath, OrderId, OrderStatus, ProductId,
    ProductImageId, ProductSlug, ProductTypeId,
};
use crate::domain::wishlist::WishlistItem;
use crate::pagination::Pagination;

pub mod cart;
pub mod category;
pub mod errors;
pub mod order;
pub mod product;
pub mod product_type;
pub mod spec;
#[cfg(test)]
pub mod test;
pub mod wishlist;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Hide inactive categories.
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn active(mut self) -> Self {
        self.active_only = true;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing or searching products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Hide inactive products.
    pub active_only: bool,
    /// Only featured products.
    pub featured_only: bool,
    /// Case-insensitive match on name or SKU.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn active(mut self) -> Self {
        self.active_only = true;
        self
    }
    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Restrict to one customer's orders.
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories using the supplied query options.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace every attribute of a category.
    fn update_category(&self, id: CategoryId, category: &NewCategory) -> RepositoryResult<usize>;
    /// Fails with [`RepositoryError::ForeignKey`] while products reference it.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

pub trait ProductTypeReader {
    fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>>;
    fn get_product_type_by_id(&self, id: ProductTypeId) -> RepositoryResult<Option<ProductType>>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    fn get_product_by_slug(&self, slug: &ProductSlug) -> RepositoryResult<Option<Product>>;
    /// Fetch several products at once; missing ids are skipped.
    fn get_products_by_ids(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>>;
}

/// Write operations for product entities and their images.
pub trait ProductWriter {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace every attribute of a product. Images and specs are untouched.
    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize>;
    /// Replace a product's attributes and upsert its spec as one unit. When
    /// the spec write fails the product row is left as it was.
    ///
    /// An empty spec writes only the product.
    fn update_product_with_spec(
        &self,
        id: ProductId,
        product: &NewProduct,
        spec: &ValidatedSpec,
    ) -> RepositoryResult<usize>;
    /// Delete a product together with its images and spec record.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
    /// Append an image after the product's existing ones.
    fn add_product_image(
        &self,
        product_id: ProductId,
        path: &ImagePath,
    ) -> RepositoryResult<ProductImage>;
    /// Remove an image, returning its path so the file can be deleted.
    fn delete_product_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<Option<ImagePath>>;
}

/// Read-only access to product spec records.
pub trait SpecReader {
    fn get_jewelry_spec(&self, product_id: ProductId) -> RepositoryResult<Option<JewelrySpec>>;
    fn get_watch_spec(&self, product_id: ProductId) -> RepositoryResult<Option<WatchSpec>>;
    fn get_diamond_spec(&self, product_id: ProductId) -> RepositoryResult<Option<DiamondSpec>>;
    /// Whether a jewelry spec belonging to any product other than `except`
    /// already carries `huid`.
    fn huid_taken(&self, huid: &str, except: Option<ProductId>) -> RepositoryResult<bool>;
}

/// Write access to product spec records.
///
/// `create_*` insert the first record of a product. `upsert_*` write the
/// record in a single statement, inserting it if missing and otherwise
/// updating only the submitted columns.
pub trait SpecWriter {
    fn create_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize>;
    fn upsert_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize>;
    fn create_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize>;
    fn upsert_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize>;
    fn create_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize>;
    fn upsert_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize>;
}

pub trait CartReader {
    fn find_cart(&self, owner: &CartOwner) -> RepositoryResult<Option<Cart>>;
}

pub trait CartWriter {
    /// Persist the cart's lines and money fields as they are, creating the
    /// cart row on first save. Returns the cart with its id set.
    fn save_cart(&self, cart: &Cart) -> RepositoryResult<Cart>;
}

pub trait WishlistReader {
    fn list_wishlist(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<WishlistItem>>;
}

pub trait WishlistWriter {
    /// Adding a product twice is not an error.
    fn add_to_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize>;
    fn remove_from_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize>;
}

pub trait OrderReader {
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>>;
}

pub trait OrderWriter {
    /// Write the order and its items, take the items out of stock and empty
    /// the cart, all in one transaction.
    ///
    /// Fails with [`RepositoryError::Conflict`] when any product no longer
    /// has enough stock.
    fn place_order(&self, order: &NewOrder, cart: &Cart) -> RepositoryResult<Order>;
    fn apply_status_change(&self, id: OrderId, change: OrderStatusChange)
    -> RepositoryResult<usize>;
}
