//! Theme-aware schemas and validation for vitae documents.
//!
//! A single [`BaseSchema`] describes the CV for every theme. Properties that
//! differ between themes carry a table of per-theme adjustments, which
//! [`generate`] resolves into a [`ConcreteSchema`]. The [`SchemaRegistry`]
//! holds the concrete schema of every theme, and [`validate`] checks a merged
//! tree against one of them, producing a [`ValidatedModel`] or every
//! [`ValidationError`] at once.
//!
//! ```
//! use vitae_config::{ConfigValue, Override, apply_overrides};
//! use vitae_schema::{SchemaRegistry, ValidationOptions, validate};
//!
//! let registry = SchemaRegistry::builtin().unwrap();
//! let tree = apply_overrides(
//!     ConfigValue::empty_map(),
//!     &[
//!         Override::parse("cv.name=Ada").unwrap(),
//!         Override::parse("cv.email=ada@example.org").unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let model = validate(registry.get("moderncv").unwrap(), &tree, &ValidationOptions::strict()).unwrap();
//! assert_eq!(model.get(&["design", "font"]).unwrap().as_str(), Some("Helvetica"));
//! ```

pub mod cv;
pub mod error;
pub mod json_schema;
pub mod model;
pub mod registry;
pub mod types;
pub mod validator;
pub mod variant;

pub use error::{SchemaBuildError, ValidationError, ValidationErrorKind};
pub use model::{ModelValue, ValidatedModel};
pub use registry::SchemaRegistry;
pub use types::{
    ArraySchema, BaseSchema, ConcreteSchema, CrossFieldRule, EnumSchema, NumberSchema, ObjectSchema,
    Property, PropertyOverride, Schema, StringFormat, StringSchema, VariantKey, VariantTable,
};
pub use validator::{UnknownFields, ValidationOptions, validate};
pub use variant::generate;
