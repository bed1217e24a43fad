//! The validated document model handed to renderers.

use crate::types::VariantKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vitae_config::{ConfigValue, ConfigValueKind, FieldPath};
use yaml_rust2::{Yaml, YamlEmitter};

/// A typed value of the validated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Array(Vec<ModelValue>),
    Object(IndexMap<String, ModelValue>),
}

impl ModelValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ModelValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ModelValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ModelValue::Integer(n) => Some(*n as f64),
            ModelValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ModelValue>> {
        match self {
            ModelValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ModelValue>> {
        match self {
            ModelValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModelValue> {
        self.as_object()?.get(key)
    }

    pub fn get_path(&self, path: &[&str]) -> Option<&ModelValue> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn to_yaml(&self) -> Yaml {
        match self {
            ModelValue::Null => Yaml::Null,
            ModelValue::Bool(b) => Yaml::Boolean(*b),
            ModelValue::Integer(n) => Yaml::Integer(*n),
            ModelValue::Number(n) => Yaml::Real(format_number(*n)),
            ModelValue::String(s) => Yaml::String(s.clone()),
            ModelValue::Array(items) => Yaml::Array(items.iter().map(ModelValue::to_yaml).collect()),
            ModelValue::Object(entries) => Yaml::Hash(
                entries
                    .iter()
                    .map(|(k, v)| (Yaml::String(k.clone()), v.to_yaml()))
                    .collect(),
            ),
        }
    }

    /// A merge tree node with no origin holding this value.
    pub fn to_config(&self) -> ConfigValue {
        match self {
            ModelValue::Array(items) => {
                let mut array = ConfigValue::empty_array();
                array.value = ConfigValueKind::Array(items.iter().map(ModelValue::to_config).collect());
                array
            }
            ModelValue::Object(entries) => {
                let mut map = ConfigValue::empty_map();
                map.value = ConfigValueKind::Map(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_config()))
                        .collect(),
                );
                map
            }
            scalar => ConfigValue::synthetic(scalar.to_yaml()),
        }
    }
}

/// Shortest text that reads back as the same number, always with a
/// fractional part so it stays a YAML float.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        ModelValue::String(s.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        ModelValue::String(s)
    }
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        ModelValue::Bool(b)
    }
}

impl From<i64> for ModelValue {
    fn from(n: i64) -> Self {
        ModelValue::Integer(n)
    }
}

impl From<f64> for ModelValue {
    fn from(n: f64) -> Self {
        ModelValue::Number(n)
    }
}

/// The result of a successful validation.
///
/// Every property of the schema is present in `root`; optional properties
/// without a value or default are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedModel {
    root: ModelValue,
    variant: VariantKey,
    #[serde(skip)]
    defaulted: Vec<FieldPath>,
}

impl ValidatedModel {
    pub(crate) fn new(root: ModelValue, variant: VariantKey, defaulted: Vec<FieldPath>) -> Self {
        ValidatedModel {
            root,
            variant,
            defaulted,
        }
    }

    pub fn root(&self) -> &ModelValue {
        &self.root
    }

    pub fn variant(&self) -> &VariantKey {
        &self.variant
    }

    /// Paths that were filled in from schema defaults, in traversal order.
    pub fn defaulted(&self) -> &[FieldPath] {
        &self.defaulted
    }

    pub fn get(&self, path: &[&str]) -> Option<&ModelValue> {
        self.root.get_path(path)
    }

    pub fn into_root(self) -> ModelValue {
        self.root
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.root).unwrap_or(serde_json::Value::Null)
    }

    /// Serialize the model as a YAML document.
    pub fn to_yaml_string(&self) -> Result<String, yaml_rust2::EmitError> {
        let mut out = String::new();
        YamlEmitter::new(&mut out).dump(&self.root.to_yaml())?;
        out.push('\n');
        Ok(out)
    }
}
