use crate::domain::product::Product;
use crate::domain::spec::DiamondSpecFields;
use crate::domain::types::ProductId;
use crate::repository::{RepositoryResult, SpecReader, SpecWriter};
use crate::specs::raw::MAX_TEXT_LENGTH;
use crate::specs::{FieldErrors, RawSpecData, SpecError, SpecResult, SpecStrategy};

pub struct DiamondStrategy;

impl SpecStrategy for DiamondStrategy {
    type Fields = DiamondSpecFields;

    fn validate<R>(
        raw: &RawSpecData,
        _existing: Option<&Product>,
        _repo: &R,
    ) -> SpecResult<DiamondSpecFields>
    where
        R: SpecReader,
    {
        let mut errors = FieldErrors::new();

        let fields = DiamondSpecFields {
            shape: raw.text("shape", MAX_TEXT_LENGTH, &mut errors),
            carat: raw.number("carat", &mut errors),
            cut: raw.text("cut", MAX_TEXT_LENGTH, &mut errors),
            color: raw.text("color", MAX_TEXT_LENGTH, &mut errors),
            clarity: raw.text("clarity", MAX_TEXT_LENGTH, &mut errors),
            certification_lab: raw.text("certification_lab", MAX_TEXT_LENGTH, &mut errors),
            certificate_number: raw.text("certificate_number", MAX_TEXT_LENGTH, &mut errors),
            polish: raw.text("polish", MAX_TEXT_LENGTH, &mut errors),
            symmetry: raw.text("symmetry", MAX_TEXT_LENGTH, &mut errors),
            fluorescence: raw.text("fluorescence", MAX_TEXT_LENGTH, &mut errors),
        };

        errors.into_result(fields).map_err(SpecError::Validation)
    }

    fn is_empty(fields: &DiamondSpecFields) -> bool {
        fields.is_empty()
    }

    fn create<R>(
        product_id: ProductId,
        fields: &DiamondSpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.create_diamond_spec(product_id, fields)
    }

    fn upsert<R>(
        product_id: ProductId,
        fields: &DiamondSpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.upsert_diamond_spec(product_id, fields)
    }
}
