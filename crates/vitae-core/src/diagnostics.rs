//! Conversion of pipeline errors into diagnostics and error records.
//!
//! Each error maps to one [`DiagnosticMessage`] titled from the catalog
//! entry of its code, and to one [`ErrorRecord`].

use crate::error::ResolveError;
use vitae_config::{ConfigError, PathError};
use vitae_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, ErrorRecord};
use vitae_schema::{SchemaBuildError, ValidationError, ValidationErrorKind};
use vitae_source_map::{SourceContext, SourceInfo};

const OVERRIDE_NOTE: &str = "This value was set on the command line with --set";

impl ResolveError {
    /// One diagnostic per problem, in the order they were found.
    pub fn to_diagnostics(&self) -> Vec<DiagnosticMessage> {
        match self {
            ResolveError::Load(err) => vec![load_diagnostic(err)],
            ResolveError::Tag(err) => vec![tag_diagnostic(err)],
            ResolveError::Override(err) => vec![override_diagnostic(err)],
            ResolveError::UnknownTheme {
                theme,
                known,
                location,
            } => vec![
                DiagnosticMessageBuilder::from_code("V-3-1", "Unknown theme")
                    .problem(format!("There is no theme named '{}'", theme))
                    .with_optional_location(location.clone())
                    .add_info(format!("Available themes: {}", known.join(", ")))
                    .build(),
            ],
            ResolveError::Schema(err) => vec![schema_diagnostic(err)],
            ResolveError::Validation(errors) => errors.iter().map(validation_diagnostic).collect(),
        }
    }

    /// Flat records for `--json` output, resolved against `ctx`.
    pub fn to_records(&self, ctx: &SourceContext) -> Vec<ErrorRecord> {
        let record = |path: Option<String>, origin: Option<&SourceInfo>| {
            ErrorRecord::new(self.error_code(), path, self.to_string(), origin, ctx)
        };
        match self {
            ResolveError::Load(err) => vec![record(None, err.location())],
            ResolveError::Tag(err) => vec![record(None, Some(err.location()))],
            ResolveError::Override(_) | ResolveError::Schema(_) => vec![record(None, None)],
            ResolveError::UnknownTheme { location, .. } => {
                vec![record(Some("design.theme".to_string()), location.as_ref())]
            }
            ResolveError::Validation(errors) => errors
                .iter()
                .map(|e| {
                    ErrorRecord::new(
                        e.error_code(),
                        Some(e.field_path.to_string()),
                        e.message(),
                        e.origin.as_ref(),
                        ctx,
                    )
                })
                .collect(),
        }
    }
}

fn load_diagnostic(err: &vitae_yaml::Error) -> DiagnosticMessage {
    let builder = DiagnosticMessageBuilder::from_code(err.error_code(), "YAML error")
        .problem(err.to_string())
        .with_optional_location(err.location().cloned());

    match err {
        vitae_yaml::Error::DuplicateKey { first, .. } => builder
            .add_info_at("First defined here", first.clone())
            .add_hint("Remove one of the two entries?")
            .build(),
        vitae_yaml::Error::UnsupportedAlias { .. } => builder
            .add_hint("Repeat the value instead of referencing an anchor")
            .build(),
        _ => builder.build(),
    }
}

fn tag_diagnostic(err: &ConfigError) -> DiagnosticMessage {
    DiagnosticMessageBuilder::from_code(err.error_code(), "Invalid merge tag")
        .problem(err.to_string())
        .with_location(err.location().clone())
        .add_hint("Use !concat on a sequence, or !prefer on a sequence or mapping")
        .build()
}

fn override_diagnostic(err: &PathError) -> DiagnosticMessage {
    let builder = DiagnosticMessageBuilder::from_code(err.error_code(), "Invalid override")
        .problem(err.to_string())
        .add_note(OVERRIDE_NOTE);

    match err {
        PathError::Syntax { .. } => builder
            .add_hint("Write overrides as `path.to.field=value`, with `[n]` for sequence items")
            .build(),
        PathError::IndexOutOfRange { len, .. } => builder
            .add_hint(format!("Use an index up to {} (the current length appends)", len))
            .build(),
        PathError::Ambiguous { escaped, .. } => builder
            .add_hint(format!("Write `{}` to set the key that contains a dot", escaped))
            .build(),
        PathError::NotAContainer { .. } => builder.build(),
    }
}

fn schema_diagnostic(err: &SchemaBuildError) -> DiagnosticMessage {
    DiagnosticMessageBuilder::from_code(err.error_code(), "Invalid schema")
        .problem(err.to_string())
        .add_note("This is a defect in the theme definitions, not in the document")
        .build()
}

/// The diagnostic for one validation error.
pub fn validation_diagnostic(err: &ValidationError) -> DiagnosticMessage {
    let mut builder = DiagnosticMessageBuilder::from_code(err.error_code(), "Validation error")
        .problem(format!("`{}`: {}", err.field_path, err.message()))
        .with_optional_location(err.origin.clone());

    if err.origin.is_none() {
        builder = builder.add_note(OVERRIDE_NOTE);
    }

    match &err.kind {
        ValidationErrorKind::MissingRequired { field } => {
            builder = builder.add_hint(format!("Add a `{}:` entry here?", field));
        }
        ValidationErrorKind::UnknownField { .. } => {
            builder = builder.add_hint("Check the spelling, or pass --lenient to ignore unknown fields");
        }
        ValidationErrorKind::InvalidEnumValue { allowed, .. } => {
            builder = builder.add_info(format!("Allowed values: {}", allowed.join(", ")));
        }
        ValidationErrorKind::MutuallyExclusive { first, .. } => {
            builder = builder.add_hint(format!("Keep only one of the two, for example remove `{}`", first));
        }
        _ => {}
    }

    builder.build()
}
