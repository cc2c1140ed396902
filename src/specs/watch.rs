use crate::domain::product::Product;
use crate::domain::spec::WatchSpecFields;
use crate::domain::types::ProductId;
use crate::repository::{RepositoryResult, SpecReader, SpecWriter};
use crate::specs::raw::MAX_TEXT_LENGTH;
use crate::specs::{FieldErrors, RawSpecData, SpecError, SpecResult, SpecStrategy};

pub struct WatchStrategy;

impl SpecStrategy for WatchStrategy {
    type Fields = WatchSpecFields;

    fn validate<R>(
        raw: &RawSpecData,
        _existing: Option<&Product>,
        _repo: &R,
    ) -> SpecResult<WatchSpecFields>
    where
        R: SpecReader,
    {
        let mut errors = FieldErrors::new();

        let fields = WatchSpecFields {
            brand: raw.text("brand", MAX_TEXT_LENGTH, &mut errors),
            model_number: raw.text("model_number", MAX_TEXT_LENGTH, &mut errors),
            movement_type: raw.text("movement_type", MAX_TEXT_LENGTH, &mut errors),
            case_material: raw.text("case_material", MAX_TEXT_LENGTH, &mut errors),
            case_size_mm: raw.number("case_size_mm", &mut errors),
            strap_material: raw.text("strap_material", MAX_TEXT_LENGTH, &mut errors),
            dial_color: raw.text("dial_color", MAX_TEXT_LENGTH, &mut errors),
            water_resistance_m: raw.number("water_resistance_m", &mut errors),
            warranty_months: raw.integer("warranty_months", &mut errors),
        };

        errors.into_result(fields).map_err(SpecError::Validation)
    }

    fn is_empty(fields: &WatchSpecFields) -> bool {
        fields.is_empty()
    }

    fn create<R>(
        product_id: ProductId,
        fields: &WatchSpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.create_watch_spec(product_id, fields)
    }

    fn upsert<R>(
        product_id: ProductId,
        fields: &WatchSpecFields,
        repo: &R,
    ) -> RepositoryResult<usize>
    where
        R: SpecWriter,
    {
        repo.upsert_watch_spec(product_id, fields)
    }
}
