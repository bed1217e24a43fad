//! Error types for schema generation and validation

use crate::types::StringFormat;
use std::fmt;
use thiserror::Error;
use vitae_config::FieldPath;
use vitae_source_map::SourceInfo;

/// A defect in a base schema or its variant tables.
///
/// These are programming errors: [`crate::SchemaRegistry::build`] surfaces
/// them before any document is validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaBuildError {
    #[error("unknown variant '{variant}' (declared: {})", .declared.join(", "))]
    UnknownVariant {
        variant: String,
        declared: Vec<String>,
    },

    #[error("variant '{variant}' has no entry for: {}", .missing.join(", "))]
    IncompleteVariant {
        variant: String,
        /// Every variant-sensitive property lacking an entry
        missing: Vec<String>,
    },

    #[error("'{path}' has an entry for undeclared variant '{variant}'")]
    UndeclaredVariant { variant: String, path: String },

    #[error("default for '{path}' in variant '{variant}' is invalid: {message}")]
    InvalidDefault {
        variant: String,
        path: String,
        message: String,
    },

    #[error("pattern for '{path}' is not a valid regular expression: {message}")]
    InvalidPattern { path: String, message: String },
}

impl SchemaBuildError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaBuildError::UnknownVariant { .. } => "V-3-1",
            SchemaBuildError::IncompleteVariant { .. } => "V-3-2",
            SchemaBuildError::UndeclaredVariant { .. } => "V-3-3",
            SchemaBuildError::InvalidDefault { .. } | SchemaBuildError::InvalidPattern { .. } => {
                "V-3-4"
            }
        }
    }
}

/// One problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field_path}: {kind}")]
pub struct ValidationError {
    /// Path of the offending field (for a missing field, the field itself)
    pub field_path: FieldPath,
    pub kind: ValidationErrorKind,
    /// Where to point: the offending node, or the nearest enclosing node
    /// with a position when the field is missing. `None` when the value came
    /// from a command-line override.
    pub origin: Option<SourceInfo>,
}

impl ValidationError {
    pub fn new(field_path: FieldPath, kind: ValidationErrorKind, origin: Option<SourceInfo>) -> Self {
        ValidationError {
            field_path,
            kind,
            origin,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("missing required field '{field}'")]
    MissingRequired { field: String },

    #[error("expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("cannot convert '{value}' to {expected}")]
    InvalidCoercion {
        value: String,
        expected: &'static str,
    },

    #[error("{value} is out of range (must be {})", Bounds(.minimum, .maximum))]
    NumberOutOfRange {
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },

    #[error("length {length} is out of range (must be {} characters)", Bounds(.min_length, .max_length))]
    StringLength {
        length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    #[error("'{value}' does not match pattern '{pattern}'")]
    PatternMismatch { value: String, pattern: String },

    #[error("'{value}' is not a valid {format}")]
    InvalidFormat { value: String, format: StringFormat },

    #[error("'{value}' is not one of: {}", .allowed.join(", "))]
    InvalidEnumValue { value: String, allowed: Vec<String> },

    #[error("{length} items is out of range (must be {} items)", Bounds(.min_items, .max_items))]
    ArrayLength {
        length: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },

    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("'{later}' ({later_value}) is before '{earlier}' ({earlier_value})")]
    OrderViolation {
        earlier: String,
        later: String,
        earlier_value: String,
        later_value: String,
    },

    #[error("'{first}' and '{second}' cannot both be set")]
    MutuallyExclusive { first: String, second: String },
}

impl ValidationErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequired { .. } => "V-4-1",
            ValidationErrorKind::TypeMismatch { .. } => "V-4-2",
            ValidationErrorKind::InvalidCoercion { .. } => "V-4-3",
            ValidationErrorKind::NumberOutOfRange { .. } => "V-4-4",
            ValidationErrorKind::StringLength { .. } => "V-4-5",
            ValidationErrorKind::PatternMismatch { .. } => "V-4-6",
            ValidationErrorKind::InvalidFormat { .. } => "V-4-7",
            ValidationErrorKind::InvalidEnumValue { .. } => "V-4-8",
            ValidationErrorKind::ArrayLength { .. } => "V-4-9",
            ValidationErrorKind::UnknownField { .. } => "V-4-10",
            ValidationErrorKind::OrderViolation { .. } => "V-4-11",
            ValidationErrorKind::MutuallyExclusive { .. } => "V-4-12",
        }
    }
}

/// Displays an inclusive range such as "at least 1" or "between 6 and 16".
struct Bounds<'a, T>(&'a Option<T>, &'a Option<T>);

impl<T: fmt::Display> fmt::Display for Bounds<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, self.1) {
            (Some(min), Some(max)) => write!(f, "between {} and {}", min, max),
            (Some(min), None) => write!(f, "at least {}", min),
            (None, Some(max)) => write!(f, "at most {}", max),
            (None, None) => write!(f, "unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let kind = ValidationErrorKind::NumberOutOfRange {
            value: 30.0,
            minimum: Some(6.0),
            maximum: Some(16.0),
        };
        assert_eq!(kind.to_string(), "30 is out of range (must be between 6 and 16)");

        let kind = ValidationErrorKind::ArrayLength {
            length: 0,
            min_items: Some(1),
            max_items: None,
        };
        assert_eq!(kind.to_string(), "0 items is out of range (must be at least 1 items)");

        let kind = ValidationErrorKind::InvalidFormat {
            value: "nope".into(),
            format: StringFormat::Email,
        };
        assert_eq!(kind.to_string(), "'nope' is not a valid email address");
    }

    #[test]
    fn test_error_display_includes_path() {
        let err = ValidationError::new(
            FieldPath::new().key("cv").key("email"),
            ValidationErrorKind::MissingRequired {
                field: "email".into(),
            },
            None,
        );
        assert_eq!(err.to_string(), "cv.email: missing required field 'email'");
        assert_eq!(err.error_code(), "V-4-1");
    }

    #[test]
    fn test_build_error_lists_every_missing_entry() {
        let err = SchemaBuildError::IncompleteVariant {
            variant: "sb2nov".into(),
            missing: vec!["design.font".into(), "design.page_size".into()],
        };
        assert_eq!(
            err.to_string(),
            "variant 'sb2nov' has no entry for: design.font, design.page_size"
        );
    }
}
