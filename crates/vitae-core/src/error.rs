//! Error type for the vitae pipeline

use thiserror::Error;
use vitae_config::{ConfigError, PathError};
use vitae_schema::{SchemaBuildError, ValidationError};
use vitae_source_map::SourceInfo;

/// Everything that can stop [`crate::Pipeline::resolve`].
///
/// All variants except [`ResolveError::Validation`] stop the pipeline at the
/// stage that raised them. Validation always finishes its pass and carries
/// every error it found.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Load(#[from] vitae_yaml::Error),

    #[error(transparent)]
    Tag(#[from] ConfigError),

    #[error(transparent)]
    Override(#[from] PathError),

    #[error("unknown theme '{theme}' (available: {})", .known.join(", "))]
    UnknownTheme {
        theme: String,
        known: Vec<String>,
        /// Where the theme was named, when it came from a document
        location: Option<SourceInfo>,
    },

    #[error(transparent)]
    Schema(#[from] SchemaBuildError),

    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

impl ResolveError {
    /// Error code of the first problem.
    pub fn error_code(&self) -> &'static str {
        match self {
            ResolveError::Load(err) => err.error_code(),
            ResolveError::Tag(err) => err.error_code(),
            ResolveError::Override(err) => err.error_code(),
            ResolveError::UnknownTheme { .. } => "V-3-1",
            ResolveError::Schema(err) => err.error_code(),
            ResolveError::Validation(errors) => errors.first().map_or("V-4-1", |e| e.error_code()),
        }
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            ResolveError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
