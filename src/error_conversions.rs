//! Conversions between the error types of different layers.
//!
//! Lower layers do not know about the layers above them, so the glue lives
//! here instead of next to each error type.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::FormError;
    use crate::services::ServiceError;
    use crate::specs::{FieldErrors, SpecError};

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            match val {
                FormError::Validation(errors) => ServiceError::Validation(errors),
                FormError::TypeConstraint(message) => ServiceError::TypeConstraint(message),
            }
        }
    }

    impl From<FieldErrors> for ServiceError {
        fn from(val: FieldErrors) -> Self {
            ServiceError::Validation(val)
        }
    }

    impl From<SpecError> for ServiceError {
        fn from(val: SpecError) -> Self {
            match val {
                SpecError::UnknownProductType(slug) => ServiceError::UnknownProductType(slug),
                SpecError::Validation(errors) => ServiceError::Validation(errors),
                SpecError::Conflict(message) => ServiceError::Conflict(message),
                SpecError::Repository(e) => {
                    log::error!("Failed to persist product spec: {e}");
                    ServiceError::Internal
                }
            }
        }
    }
}
