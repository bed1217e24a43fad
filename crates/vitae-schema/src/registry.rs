//! Theme registry: every variant of a base schema, generated up front.

use crate::cv;
use crate::error::SchemaBuildError;
use crate::types::{BaseSchema, ConcreteSchema, VariantKey};
use crate::variant::generate;
use indexmap::IndexMap;

/// Concrete schemas for every declared variant.
///
/// Construction generates all of them, so a broken variant table fails
/// here rather than when some document happens to select that theme.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: IndexMap<VariantKey, ConcreteSchema>,
    default_variant: VariantKey,
}

impl SchemaRegistry {
    pub fn build(base: &BaseSchema) -> Result<Self, SchemaBuildError> {
        if !base.variants.contains(&base.default_variant) {
            return Err(SchemaBuildError::UnknownVariant {
                variant: base.default_variant.to_string(),
                declared: base.variants.iter().map(|v| v.to_string()).collect(),
            });
        }

        let mut schemas = IndexMap::new();
        for variant in &base.variants {
            schemas.insert(variant.clone(), generate(base, variant.as_str())?);
        }
        tracing::debug!(variants = schemas.len(), "built schema registry");

        Ok(SchemaRegistry {
            schemas,
            default_variant: base.default_variant.clone(),
        })
    }

    /// The registry for the built-in CV schema.
    pub fn builtin() -> Result<Self, SchemaBuildError> {
        Self::build(&cv::base_schema())
    }

    pub fn get(&self, variant: &str) -> Option<&ConcreteSchema> {
        self.schemas.get(variant)
    }

    pub fn default_variant(&self) -> &VariantKey {
        &self.default_variant
    }

    /// Declared variants in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = &VariantKey> {
        self.schemas.keys()
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.schemas.contains_key(variant)
    }
}
