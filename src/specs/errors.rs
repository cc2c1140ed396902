use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::repository::RepositoryError;

/// Field name to human-readable messages, accumulated over a whole
/// submission so that every failing field is reported at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Flatten nested validator output into dotted field names such as
/// `shipping_address.city` or `items.0.quantity`.
fn collect_validation_errors(errors: &ValidationErrors, prefix: &str, result: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("The {field} is invalid ({}).", error.code),
                    };
                    result.add(path.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(errors) => {
                collect_validation_errors(errors, &path, result);
            }
            ValidationErrorsKind::List(items) => {
                for (index, errors) in items {
                    collect_validation_errors(errors, &format!("{path}.{index}"), result);
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut result = FieldErrors::new();
        collect_validation_errors(&errors, "", &mut result);
        result
    }
}

/// Errors raised while resolving, validating or persisting a product spec.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The product type slug has no strategy.
    #[error("unknown product type: {0}")]
    UnknownProductType(String),
    #[error("spec validation failed")]
    Validation(FieldErrors),
    /// A unique index rejected the write, e.g. a duplicate HUID.
    #[error("spec conflicts with an existing record: {0}")]
    Conflict(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SpecError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict(message) => SpecError::Conflict(message),
            other => SpecError::Repository(other),
        }
    }
}

impl From<FieldErrors> for SpecError {
    fn from(errors: FieldErrors) -> Self {
        SpecError::Validation(errors)
    }
}

pub type SpecResult<T> = Result<T, SpecError>;
