//! Typed access to the untyped `spec` object of a product submission.
//!
//! Every accessor follows the same convention: a key missing from the object
//! yields `None` (leave the stored value alone), `null` or an empty string
//! yields `Some(None)` (clear it), and anything else is checked and yields
//! `Some(Some(value))`. A failed check records a message and yields `None`.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::domain::spec::SpecField;
use crate::specs::FieldErrors;

/// Longest text accepted for a free-form spec attribute.
pub const MAX_TEXT_LENGTH: usize = 255;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSpecData(Map<String, Value>);

impl RawSpecData {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts a JSON object or `null`; any other value is reported against
    /// the `spec` field.
    pub fn from_json(value: Value) -> Result<Self, FieldErrors> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            Value::Null => Ok(Self::default()),
            _ => {
                let mut errors = FieldErrors::new();
                errors.add("spec", "The spec must be an object.");
                Err(errors)
            }
        }
    }

    fn present(&self, field: &str) -> Option<&Value> {
        match self.0.get(field)? {
            Value::String(s) if s.trim().is_empty() => Some(&NULL),
            value => Some(value),
        }
    }

    /// Optional text of at most `max` characters, trimmed.
    pub fn text(&self, field: &str, max: usize, errors: &mut FieldErrors) -> SpecField<String> {
        match self.present(field)? {
            Value::Null => Some(None),
            Value::String(s) => {
                let s = s.trim();
                if s.chars().count() > max {
                    errors.add(
                        field,
                        format!("The {field} may not be greater than {max} characters."),
                    );
                    None
                } else {
                    Some(Some(s.to_string()))
                }
            }
            _ => {
                errors.add(field, format!("The {field} must be a string."));
                None
            }
        }
    }

    /// Optional finite, non-negative number. Numeric strings are accepted.
    pub fn number(&self, field: &str, errors: &mut FieldErrors) -> SpecField<f64> {
        let parsed = match self.present(field)? {
            Value::Null => return Some(None),
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() && n >= 0.0 => Some(Some(n)),
            Some(n) if n.is_finite() => {
                errors.add(field, format!("The {field} must be at least 0."));
                None
            }
            _ => {
                errors.add(field, format!("The {field} must be a number."));
                None
            }
        }
    }

    /// Optional non-negative whole number.
    pub fn integer(&self, field: &str, errors: &mut FieldErrors) -> SpecField<i32> {
        let parsed = match self.present(field)? {
            Value::Null => return Some(None),
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed.map(i32::try_from) {
            Some(Ok(n)) if n >= 0 => Some(Some(n)),
            Some(Ok(_)) => {
                errors.add(field, format!("The {field} must be at least 0."));
                None
            }
            _ => {
                errors.add(field, format!("The {field} must be an integer."));
                None
            }
        }
    }

    /// Optional value restricted to `allowed`, matched by its display form.
    /// The same list is quoted back when the value is rejected.
    pub fn choice<T>(&self, field: &str, allowed: &[T], errors: &mut FieldErrors) -> SpecField<T>
    where
        T: Copy + Display,
    {
        let matched = match self.present(field)? {
            Value::Null => return Some(None),
            Value::String(s) => {
                let s = s.trim();
                allowed.iter().copied().find(|value| value.to_string() == s)
            }
            _ => None,
        };
        if matched.is_none() {
            let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            errors.add(
                field,
                format!("The selected {field} is invalid. Allowed: {}.", names.join(", ")),
            );
        }
        matched.map(Some)
    }
}
