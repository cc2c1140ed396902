use crate::domain::product::Product;
use crate::domain::spec::JewelrySpecFields;
use crate::domain::types::{MakingChargeType, ProductId};
use crate::repository::{RepositoryResult, SpecReader, SpecWriter};
use crate::specs::raw::MAX_TEXT_LENGTH;
use crate::specs::{FieldErrors, RawSpecData, SpecError, SpecResult, SpecStrategy};

/// Hallmark unique identification numbers are six characters.
pub const HUID_MAX_LENGTH: usize = 6;

pub struct JewelryStrategy;

impl SpecStrategy for JewelryStrategy {
    type Fields = JewelrySpecFields;

    fn validate<R>(
        raw: &RawSpecData,
        existing: Option<&Product>,
        repo: &R,
    ) -> SpecResult<JewelrySpecFields>
    where
        R: SpecReader,
    {
        let mut errors = FieldErrors::new();

        let fields = JewelrySpecFields {
            metal_type: raw.text("metal_type", MAX_TEXT_LENGTH, &mut errors),
            purity: raw.text("purity", MAX_TEXT_LENGTH, &mut errors),
            gross_weight: raw.number("gross_weight", &mut errors),
            net_weight: raw.number("net_weight", &mut errors),
            stone_weight: raw.number("stone_weight", &mut errors),
            making_charge: raw.number("making_charge", &mut errors),
            making_charge_type: raw.choice(
                "making_charge_type",
                MakingChargeType::ALL,
                &mut errors,
            ),
            huid: raw.text("huid", HUID_MAX_LENGTH, &mut errors),
            size: raw.text("size", MAX_TEXT_LENGTH, &mut errors),
        };

        // The unique index on `jewelry_specs.huid` still guards the write.
        if let Some(Some(huid)) = &fields.huid
            && repo.huid_taken(huid, existing.map(|product| product.id))?
        {
            errors.add("huid", "The huid has already been taken.");
        }

        errors.into_result(fields).map_err(SpecError::Validation)
    }

    fn is_empty(fields: &JewelrySpecFields) -> bool {
        fields.is_empty()
    }

    fn create<R>(
        product_id: ProductId,
        fields: &JewelrySpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.create_jewelry_spec(product_id, fields)
    }

    fn upsert<R>(
        product_id: ProductId,
        fields: &JewelrySpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.upsert_jewelry_spec(product_id, fields)
    }
}
