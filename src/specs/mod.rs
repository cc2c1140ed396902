//! Type-specific product attributes.
//!
//! Every product type slug resolves to exactly one [`ProductSpecKind`]. Each
//! kind has a stateless strategy that validates the raw `spec` object of a
//! product submission and writes the matching child record. Product flows
//! stay type-agnostic: they resolve the kind, call
//! [`ProductSpecKind::validate`] and then [`ValidatedSpec::store`] on create
//! or [`ValidatedSpec::update`] on edit.

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::spec::ProductSpec;
use crate::domain::types::ProductId;
use crate::repository::{RepositoryResult, SpecReader, SpecWriter};

pub mod diamond;
pub mod errors;
pub mod jewelry;
pub mod raw;
pub mod watch;

pub use crate::domain::spec::ValidatedSpec;
pub use diamond::DiamondStrategy;
pub use errors::{FieldErrors, SpecError, SpecResult};
pub use jewelry::JewelryStrategy;
pub use raw::RawSpecData;
pub use watch::WatchStrategy;

/// Closed set of product types that carry a spec record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSpecKind {
    Jewelry,
    Watch,
    Diamond,
}

impl ProductSpecKind {
    pub const ALL: [ProductSpecKind; 3] = [Self::Jewelry, Self::Watch, Self::Diamond];

    /// Strategy registered for a product type slug.
    pub fn resolve(slug: &str) -> SpecResult<Self> {
        match slug {
            "jewelry" => Ok(Self::Jewelry),
            "watch" => Ok(Self::Watch),
            "diamond" => Ok(Self::Diamond),
            other => Err(SpecError::UnknownProductType(other.to_string())),
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Jewelry => "jewelry",
            Self::Watch => "watch",
            Self::Diamond => "diamond",
        }
    }

    /// Validate the raw spec against this kind's strategy.
    ///
    /// `existing` is the product being edited, `None` on create.
    pub fn validate<R>(
        self,
        raw: &RawSpecData,
        existing: Option<&Product>,
        repo: &R,
    ) -> SpecResult<ValidatedSpec>
    where
        R: SpecReader,
    {
        Ok(match self {
            Self::Jewelry => {
                ValidatedSpec::Jewelry(JewelryStrategy::validate(raw, existing, repo)?)
            }
            Self::Watch => ValidatedSpec::Watch(WatchStrategy::validate(raw, existing, repo)?),
            Self::Diamond => {
                ValidatedSpec::Diamond(DiamondStrategy::validate(raw, existing, repo)?)
            }
        })
    }

    /// Stored spec record of a product of this kind, if any.
    pub fn load<R>(self, product_id: ProductId, repo: &R) -> RepositoryResult<Option<ProductSpec>>
    where
        R: SpecReader,
    {
        Ok(match self {
            Self::Jewelry => repo.get_jewelry_spec(product_id)?.map(ProductSpec::Jewelry),
            Self::Watch => repo.get_watch_spec(product_id)?.map(ProductSpec::Watch),
            Self::Diamond => repo.get_diamond_spec(product_id)?.map(ProductSpec::Diamond),
        })
    }
}

impl ValidatedSpec {
    pub fn kind(&self) -> ProductSpecKind {
        match self {
            Self::Jewelry(_) => ProductSpecKind::Jewelry,
            Self::Watch(_) => ProductSpecKind::Watch,
            Self::Diamond(_) => ProductSpecKind::Diamond,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Jewelry(fields) => JewelryStrategy::is_empty(fields),
            Self::Watch(fields) => WatchStrategy::is_empty(fields),
            Self::Diamond(fields) => DiamondStrategy::is_empty(fields),
        }
    }

    /// Create the spec record of a freshly created product.
    pub fn store<R>(&self, product: &Product, repo: &R) -> SpecResult<()>
    where
        R: SpecWriter,
    {
        match self {
            Self::Jewelry(fields) => JewelryStrategy::store(product, fields, repo),
            Self::Watch(fields) => WatchStrategy::store(product, fields, repo),
            Self::Diamond(fields) => DiamondStrategy::store(product, fields, repo),
        }
    }

    /// Create or update the spec record of an edited product.
    pub fn update<R>(&self, product: &Product, repo: &R) -> SpecResult<()>
    where
        R: SpecWriter,
    {
        match self {
            Self::Jewelry(fields) => JewelryStrategy::update(product, fields, repo),
            Self::Watch(fields) => WatchStrategy::update(product, fields, repo),
            Self::Diamond(fields) => DiamondStrategy::update(product, fields, repo),
        }
    }
}

/// Validation and persistence of one product type's spec.
pub trait SpecStrategy {
    type Fields;

    /// Filter and check the attributes of this type. Unknown keys are
    /// ignored; every attribute may be missing or `null`.
    fn validate<R>(
        raw: &RawSpecData,
        existing: Option<&Product>,
        repo: &R,
    ) -> SpecResult<Self::Fields>
    where
        R: SpecReader;

    fn is_empty(fields: &Self::Fields) -> bool;

    fn create<R>(product_id: ProductId, fields: &Self::Fields, repo: &R) -> RepositoryResult<usize>
    where
        R: SpecWriter;

    fn upsert<R>(product_id: ProductId, fields: &Self::Fields, repo: &R) -> RepositoryResult<usize>
    where
        R: SpecWriter;

    /// Insert the record on product creation. Empty fields write nothing.
    fn store<R>(product: &Product, fields: &Self::Fields, repo: &R) -> SpecResult<()>
    where
        R: SpecWriter,
    {
        if Self::is_empty(fields) {
            return Ok(());
        }
        Self::create(product.id, fields, repo)?;
        Ok(())
    }

    /// Insert or update the record on product edit. Empty fields write
    /// nothing.
    fn update<R>(product: &Product, fields: &Self::Fields, repo: &R) -> SpecResult<()>
    where
        R: SpecWriter,
    {
        if Self::is_empty(fields) {
            return Ok(());
        }
        Self::upsert(product.id, fields, repo)?;
        Ok(())
    }
}
