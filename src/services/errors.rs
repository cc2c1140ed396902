use thiserror::Error;

use crate::specs::FieldErrors;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not signed in or lacks the required role.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The request is well-formed but not acceptable in the current state,
    /// e.g. an invalid status transition or an empty cart at checkout.
    #[error("{0}")]
    Form(String),
    /// One or more submitted fields failed validation.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The product type has no spec strategy.
    #[error("unknown product type: {0}")]
    UnknownProductType(String),
    #[error("invalid data: {0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
