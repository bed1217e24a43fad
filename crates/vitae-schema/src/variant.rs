//! Resolve a [`BaseSchema`] into the [`ConcreteSchema`] of one variant.

use crate::error::SchemaBuildError;
use crate::types::{ArraySchema, BaseSchema, ConcreteSchema, ObjectSchema, Property, Schema, VariantKey};
use crate::validator::{check_pattern, check_value};
use indexmap::IndexMap;

/// Generate the concrete schema for variant `key`.
///
/// Every variant table in the base must name only declared variants and
/// must have an entry for `key`. All missing entries are reported together.
pub fn generate(base: &BaseSchema, key: &str) -> Result<ConcreteSchema, SchemaBuildError> {
    let Some(variant) = base.variants.iter().find(|v| v.as_str() == key) else {
        return Err(SchemaBuildError::UnknownVariant {
            variant: key.to_string(),
            declared: base.variants.iter().map(|v| v.to_string()).collect(),
        });
    };

    let mut generator = Generator {
        base,
        variant,
        path: Vec::new(),
        missing: Vec::new(),
        undeclared: None,
    };

    generator.check_object(&base.root);
    if let Some(err) = generator.undeclared.take() {
        return Err(err);
    }
    if !generator.missing.is_empty() {
        return Err(SchemaBuildError::IncompleteVariant {
            variant: key.to_string(),
            missing: std::mem::take(&mut generator.missing),
        });
    }

    let root = generator.resolve_object(&base.root)?;
    tracing::debug!(variant = %variant, properties = root.properties.len(), "generated schema");
    Ok(ConcreteSchema {
        variant: variant.clone(),
        root,
    })
}

struct Generator<'a> {
    base: &'a BaseSchema,
    variant: &'a VariantKey,
    /// Current property path; `[]` stands for array items, `*` for extra keys
    path: Vec<String>,
    missing: Vec<String>,
    undeclared: Option<SchemaBuildError>,
}

impl Generator<'_> {
    fn display_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !out.is_empty() && segment != "[]" {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    fn within<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let result = f(self);
        self.path.pop();
        result
    }

    /// First pass: table keys and completeness, across the whole base.
    fn check_object(&mut self, object: &ObjectSchema) {
        for (name, property) in &object.properties {
            self.within(name, |g| {
                if let Some(table) = &property.variants {
                    for key in table.keys() {
                        if g.undeclared.is_none() && !g.base.variants.contains(key) {
                            g.undeclared = Some(SchemaBuildError::UndeclaredVariant {
                                variant: key.to_string(),
                                path: g.display_path(),
                            });
                        }
                    }
                    match table.get(g.variant) {
                        Some(entry) => {
                            // A swapped-in shape carries tables of its own
                            if let Some(schema) = &entry.schema {
                                g.check_schema(schema);
                            }
                        }
                        None => g.missing.push(g.display_path()),
                    }
                }
                g.check_schema(&property.schema);
            });
        }
        if let Some(extra) = &object.additional_properties {
            self.within("*", |g| g.check_schema(extra));
        }
    }

    fn check_schema(&mut self, schema: &Schema) {
        match schema {
            Schema::Object(object) => self.check_object(object),
            Schema::Array(array) => self.within("[]", |g| g.check_schema(&array.items)),
            _ => {}
        }
    }

    fn resolve_object(&mut self, object: &ObjectSchema) -> Result<ObjectSchema, SchemaBuildError> {
        let mut properties = IndexMap::new();
        for (name, property) in &object.properties {
            if let Some(resolved) = self.within(name, |g| g.resolve_property(property))? {
                properties.insert(name.clone(), resolved);
            }
        }

        let additional_properties = match &object.additional_properties {
            Some(extra) => Some(Box::new(self.within("*", |g| g.resolve_schema(extra))?)),
            None => None,
        };

        Ok(ObjectSchema {
            properties,
            rules: object.rules.clone(),
            additional_properties,
        })
    }

    /// `None` when the property is disabled for this variant.
    fn resolve_property(&mut self, base: &Property) -> Result<Option<Property>, SchemaBuildError> {
        let mut property = Property {
            variants: None,
            ..base.clone()
        };

        if let Some(entry) = base.variants.as_ref().and_then(|t| t.get(self.variant)) {
            if let Some(schema) = &entry.schema {
                property.schema = schema.clone();
            }
            if let Some(required) = entry.required {
                property.required = required;
            }
            if let Some(default) = &entry.default {
                property.default = Some(default.clone());
            }
            if let Some(enabled) = entry.enabled {
                property.enabled = enabled;
            }
        }

        if !property.enabled {
            return Ok(None);
        }

        property.schema = self.resolve_schema(&property.schema)?;

        if let Some(default) = &property.default
            && let Some(message) = check_value(&property.schema, default)
        {
            return Err(SchemaBuildError::InvalidDefault {
                variant: self.variant.to_string(),
                path: self.display_path(),
                message,
            });
        }

        Ok(Some(property))
    }

    fn resolve_schema(&mut self, schema: &Schema) -> Result<Schema, SchemaBuildError> {
        match schema {
            Schema::Object(object) => Ok(Schema::Object(self.resolve_object(object)?)),
            Schema::Array(array) => {
                let items = self.within("[]", |g| g.resolve_schema(&array.items))?;
                Ok(Schema::Array(ArraySchema {
                    items: Box::new(items),
                    ..array.clone()
                }))
            }
            Schema::String(string) => {
                if let Some(pattern) = &string.pattern
                    && let Err(err) = check_pattern(pattern)
                {
                    return Err(SchemaBuildError::InvalidPattern {
                        path: self.display_path(),
                        message: err.to_string(),
                    });
                }
                Ok(schema.clone())
            }
            other => Ok(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelValue;
    use crate::types::PropertyOverride;
    use pretty_assertions::assert_eq;

    fn base(design: ObjectSchema) -> BaseSchema {
        BaseSchema {
            variants: vec!["classic".into(), "moderncv".into()],
            default_variant: "classic".into(),
            root: ObjectSchema::new().property("design", Property::optional(design.into())),
        }
    }

    fn font() -> Property {
        Property::optional(Schema::string())
            .with_default("Times")
            .variant("classic", PropertyOverride::inherit())
            .variant("moderncv", PropertyOverride::default_to("Helvetica"))
    }

    #[test]
    fn test_each_variant_gets_its_default() {
        let base = base(ObjectSchema::new().property("font", font()));
        let classic = generate(&base, "classic").unwrap();
        let moderncv = generate(&base, "moderncv").unwrap();

        let default_of = |schema: &ConcreteSchema| schema.property(&["design", "font"]).unwrap().default.clone();
        assert_eq!(default_of(&classic), Some(ModelValue::from("Times")));
        assert_eq!(default_of(&moderncv), Some(ModelValue::from("Helvetica")));
        assert!(moderncv.property(&["design", "font"]).unwrap().variants.is_none());
    }

    #[test]
    fn test_unknown_variant() {
        let base = base(ObjectSchema::new().property("font", font()));
        let err = generate(&base, "fancy").unwrap_err();
        assert_eq!(err.error_code(), "V-3-1");
        assert_eq!(err.to_string(), "unknown variant 'fancy' (declared: classic, moderncv)");
    }

    #[test]
    fn test_incomplete_tables_listed_exhaustively() {
        let size = Property::optional(Schema::number()).variant("classic", PropertyOverride::default_to(10.0));
        let color = Property::optional(Schema::string()).variant("classic", PropertyOverride::inherit());
        let base = base(
            ObjectSchema::new()
                .property("font", font())
                .property("size", size)
                .property("color", color),
        );

        assert!(generate(&base, "classic").is_ok());
        assert_eq!(
            generate(&base, "moderncv").unwrap_err(),
            SchemaBuildError::IncompleteVariant {
                variant: "moderncv".into(),
                missing: vec!["design.size".into(), "design.color".into()],
            }
        );
    }

    #[test]
    fn test_incomplete_table_inside_swapped_schema() {
        let nested = ObjectSchema::new().property(
            "font",
            Property::optional(Schema::string())
                .with_default("Base")
                .variant("classic", PropertyOverride::inherit()),
        );
        let header = Property::optional(ObjectSchema::new().into())
            .variant("classic", PropertyOverride::inherit())
            .variant("moderncv", PropertyOverride::inherit().with_schema(nested.into()));
        let base = base(ObjectSchema::new().property("header", header));

        assert!(generate(&base, "classic").is_ok());
        assert_eq!(
            generate(&base, "moderncv").unwrap_err(),
            SchemaBuildError::IncompleteVariant {
                variant: "moderncv".into(),
                missing: vec!["design.header.font".into()],
            }
        );
    }

    #[test]
    fn test_undeclared_variant_in_table() {
        let font = font().variant("fancy", PropertyOverride::inherit());
        let base = base(ObjectSchema::new().property("font", font));
        assert_eq!(
            generate(&base, "classic").unwrap_err(),
            SchemaBuildError::UndeclaredVariant {
                variant: "fancy".into(),
                path: "design.font".into(),
            }
        );
    }

    #[test]
    fn test_disable_and_reenable() {
        let alignment = Property::optional(Schema::string())
            .variant("classic", PropertyOverride::inherit())
            .variant("moderncv", PropertyOverride::disabled());
        let separator = Property::optional(Schema::string())
            .disabled()
            .variant("classic", PropertyOverride::inherit())
            .variant("moderncv", PropertyOverride::enabled_with_default("|"));
        let base = base(
            ObjectSchema::new()
                .property("alignment", alignment)
                .property("separator", separator),
        );

        let classic = generate(&base, "classic").unwrap();
        assert!(classic.property(&["design", "alignment"]).is_some());
        assert!(classic.property(&["design", "separator"]).is_none());

        let moderncv = generate(&base, "moderncv").unwrap();
        assert!(moderncv.property(&["design", "alignment"]).is_none());
        let separator = moderncv.property(&["design", "separator"]).unwrap();
        assert_eq!(separator.default, Some(ModelValue::from("|")));
    }

    #[test]
    fn test_invalid_default_rejected() {
        let page = Property::optional(Schema::one_of(&["a4", "us-letter"]))
            .variant("classic", PropertyOverride::default_to("a4"))
            .variant("moderncv", PropertyOverride::default_to("a5"));
        let base = base(ObjectSchema::new().property("page", page));

        assert!(generate(&base, "classic").is_ok());
        let err = generate(&base, "moderncv").unwrap_err();
        assert_eq!(err.error_code(), "V-3-4");
        assert!(matches!(err, SchemaBuildError::InvalidDefault { ref path, .. } if path == "design.page"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let base = base(ObjectSchema::new().property(
            "tags",
            Property::optional(Schema::array_of(Schema::pattern("[a-z"))),
        ));
        let err = generate(&base, "classic").unwrap_err();
        assert!(matches!(err, SchemaBuildError::InvalidPattern { ref path, .. } if path == "design.tags[]"));
    }

    #[test]
    fn test_schema_override_replaces_shape() {
        let size = Property::optional(Schema::number())
            .variant("classic", PropertyOverride::inherit())
            .variant(
                "moderncv",
                PropertyOverride::inherit()
                    .with_schema(Schema::number_between(8.0, 12.0))
                    .with_required(true),
            );
        let base = base(ObjectSchema::new().property("size", size));
        let moderncv = generate(&base, "moderncv").unwrap();
        let size = moderncv.property(&["design", "size"]).unwrap();
        assert!(size.required);
        assert_eq!(size.schema, Schema::number_between(8.0, 12.0));
    }
}
