//! Schema type definitions
//!
//! A [`BaseSchema`] is shared by every theme. Properties that differ between
//! themes carry a [`VariantTable`]; [`crate::generate`] resolves those tables
//! into a [`ConcreteSchema`] for one theme.

use crate::model::ModelValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a variant (a theme name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(String);

impl VariantKey {
    pub fn new(key: impl Into<String>) -> Self {
        VariantKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for VariantKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VariantKey {
    fn from(key: &str) -> Self {
        VariantKey(key.to_string())
    }
}

/// The expected shape of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Accepts anything; the value is kept as written
    Any,
    Boolean,
    Integer(NumberSchema),
    Number(NumberSchema),
    String(StringSchema),
    Enum(EnumSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    /// A string with a well-known format.
    pub fn format(format: StringFormat) -> Self {
        Schema::String(StringSchema {
            format: Some(format),
            ..StringSchema::default()
        })
    }

    pub fn pattern(pattern: &str) -> Self {
        Schema::String(StringSchema {
            pattern: Some(pattern.to_string()),
            ..StringSchema::default()
        })
    }

    pub fn integer() -> Self {
        Schema::Integer(NumberSchema::default())
    }

    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    pub fn number_between(minimum: f64, maximum: f64) -> Self {
        Schema::Number(NumberSchema {
            minimum: Some(minimum),
            maximum: Some(maximum),
        })
    }

    pub fn one_of(values: &[&str]) -> Self {
        Schema::Enum(EnumSchema {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn array_of(items: Schema) -> Self {
        Schema::Array(ArraySchema {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Any => "any value",
            Schema::Boolean => "boolean",
            Schema::Integer(_) => "integer",
            Schema::Number(_) => "number",
            Schema::String(_) => "string",
            Schema::Enum(_) => "string",
            Schema::Array(_) => "sequence",
            Schema::Object(_) => "mapping",
        }
    }
}

/// Bounds for integers and numbers (inclusive)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    /// Minimum length in characters
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match
    pub pattern: Option<String>,
    pub format: Option<StringFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    Email,
    Url,
    /// `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `present`
    Date,
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFormat::Email => write!(f, "email address"),
            StringFormat::Url => write!(f, "URL"),
            StringFormat::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// A mapping with known properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Properties in the order they are validated and exported
    pub properties: IndexMap<String, Property>,

    /// Checks spanning several properties, run after the properties themselves
    pub rules: Vec<CrossFieldRule>,

    /// Schema for keys not listed in `properties`.
    ///
    /// `None` means such keys are unknown fields.
    pub additional_properties: Option<Box<Schema>>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, property: Property) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    pub fn rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Accept any other key, validated against `schema`.
    pub fn additional(mut self, schema: Schema) -> Self {
        self.additional_properties = Some(Box::new(schema));
        self
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

/// A rule over sibling properties of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `earlier` must not come after `later` (dates, numbers or strings)
    Ordered { earlier: String, later: String },

    /// At most one of the fields may be set
    MutuallyExclusive(Vec<String>),
}

impl CrossFieldRule {
    pub fn ordered(earlier: &str, later: &str) -> Self {
        CrossFieldRule::Ordered {
            earlier: earlier.to_string(),
            later: later.to_string(),
        }
    }

    pub fn exclusive(fields: &[&str]) -> Self {
        CrossFieldRule::MutuallyExclusive(fields.iter().map(|f| f.to_string()).collect())
    }

    pub fn fields(&self) -> Vec<&str> {
        match self {
            CrossFieldRule::Ordered { earlier, later } => vec![earlier.as_str(), later.as_str()],
            CrossFieldRule::MutuallyExclusive(fields) => fields.iter().map(String::as_str).collect(),
        }
    }
}

pub type VariantTable = IndexMap<VariantKey, PropertyOverride>;

/// One property of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub schema: Schema,
    pub required: bool,
    /// Value used when the property is absent (or `null`)
    pub default: Option<ModelValue>,
    pub description: Option<String>,
    /// Disabled properties do not exist in the concrete schema
    pub enabled: bool,
    /// Per-variant adjustments. When present, every declared variant needs
    /// an entry.
    pub variants: Option<VariantTable>,
}

impl Property {
    pub fn required(schema: Schema) -> Self {
        Property {
            schema,
            required: true,
            default: None,
            description: None,
            enabled: true,
            variants: None,
        }
    }

    pub fn optional(schema: Schema) -> Self {
        Property {
            required: false,
            ..Property::required(schema)
        }
    }

    pub fn with_default(mut self, default: impl Into<ModelValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Add (or replace) the entry for `key` in the variant table.
    pub fn variant(mut self, key: &str, entry: PropertyOverride) -> Self {
        self.variants
            .get_or_insert_with(IndexMap::new)
            .insert(VariantKey::new(key), entry);
        self
    }

    pub fn is_variant_sensitive(&self) -> bool {
        self.variants.is_some()
    }
}

/// What one variant changes about a property. `None` fields keep the base
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyOverride {
    pub default: Option<ModelValue>,
    pub required: Option<bool>,
    pub schema: Option<Schema>,
    pub enabled: Option<bool>,
}

impl PropertyOverride {
    /// An entry that keeps the base property as is.
    pub fn inherit() -> Self {
        <Self as Default>::default()
    }

    /// An entry that only changes the default.
    pub fn default_to(value: impl Into<ModelValue>) -> Self {
        PropertyOverride {
            default: Some(value.into()),
            ..Self::inherit()
        }
    }

    pub fn disabled() -> Self {
        PropertyOverride {
            enabled: Some(false),
            ..Self::inherit()
        }
    }

    pub fn enabled_with_default(value: impl Into<ModelValue>) -> Self {
        PropertyOverride {
            default: Some(value.into()),
            enabled: Some(true),
            ..Self::inherit()
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// A schema shared by all variants, with per-variant tables on the
/// properties that differ.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSchema {
    /// Declared variants, in presentation order
    pub variants: Vec<VariantKey>,
    pub default_variant: VariantKey,
    pub root: ObjectSchema,
}

/// A schema with every variant table resolved for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteSchema {
    pub variant: VariantKey,
    pub root: ObjectSchema,
}

impl ConcreteSchema {
    /// Look up a property by key path, descending through nested objects.
    pub fn property(&self, path: &[&str]) -> Option<&Property> {
        let (last, parents) = path.split_last()?;
        let mut object = &self.root;
        for key in parents {
            match &object.properties.get(*key)?.schema {
                Schema::Object(child) => object = child,
                _ => return None,
            }
        }
        object.properties.get(*last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_key_borrows_as_str() {
        let mut table: IndexMap<VariantKey, u8> = IndexMap::new();
        table.insert(VariantKey::new("classic"), 1);
        assert_eq!(table.get("classic"), Some(&1));
        assert_eq!(VariantKey::from("sb2nov").to_string(), "sb2nov");
    }

    #[test]
    fn test_property_builders() {
        let prop = Property::optional(Schema::string())
            .with_default("Times")
            .variant("moderncv", PropertyOverride::default_to("Helvetica"))
            .variant("sb2nov", PropertyOverride::disabled());

        assert!(!prop.required);
        assert!(prop.is_variant_sensitive());
        let table = prop.variants.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["sb2nov"].enabled, Some(false));
    }

    #[test]
    fn test_concrete_property_lookup() {
        let schema = ConcreteSchema {
            variant: VariantKey::new("classic"),
            root: ObjectSchema::new().property(
                "design",
                Property::optional(ObjectSchema::new().property("font", Property::optional(Schema::string())).into()),
            ),
        };
        assert!(schema.property(&["design", "font"]).is_some());
        assert!(schema.property(&["design", "missing"]).is_none());
        assert!(schema.property(&[]).is_none());
    }

    #[test]
    fn test_rule_fields() {
        assert_eq!(
            CrossFieldRule::ordered("start_date", "end_date").fields(),
            vec!["start_date", "end_date"]
        );
    }
}
