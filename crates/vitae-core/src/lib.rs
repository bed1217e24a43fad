//! The vitae pipeline.
//!
//! [`Pipeline::resolve`] takes a main document plus [`ResolveOptions`]
//! (overlays, overrides, theme, strictness) and runs every stage:
//!
//! 1. load each document into a position-tracked tree
//! 2. merge the layers left to right
//! 3. apply `--set` overrides
//! 4. select the theme schema
//! 5. validate, producing a [`vitae_schema::ValidatedModel`]
//!
//! Failures come back as a [`ResolveError`], which converts to
//! diagnostics ([`ResolveError::to_diagnostics`]) and flat error records
//! ([`ResolveError::to_records`]).

pub mod diagnostics;
pub mod error;
pub mod pipeline;

pub use diagnostics::validation_diagnostic;
pub use error::ResolveError;
pub use pipeline::{Input, Pipeline, ResolveOptions};

pub use vitae_schema::UnknownFields;
