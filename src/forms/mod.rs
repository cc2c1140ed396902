//! Request bodies and their conversion into typed payloads.
//!
//! Each form derives [`validator::Validate`] for the shape checks and is
//! turned into a payload of domain types with `TryFrom`. Failures of either
//! step are collected per field into [`FieldErrors`].

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::TypeConstraintError;
use crate::specs::FieldErrors;

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod uploads;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form validation failed")]
    Validation(FieldErrors),
    #[error("form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for FormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.into())
    }
}

impl From<FieldErrors> for FormError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<TypeConstraintError> for FormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Run the derived validators, returning their failures as a starting
/// point for further per-field checks.
fn validation_errors(form: &impl Validate) -> FieldErrors {
    match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Record a failed domain conversion against `field`.
fn check<T>(
    errors: &mut FieldErrors,
    field: &str,
    result: Result<T, TypeConstraintError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            if !errors.contains(field) {
                errors.add(field, e.to_string());
            }
            None
        }
    }
}

/// Treat blank optional text as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
