//! Validation of a merged tree against a concrete schema.
//!
//! One pass over the tree collects every error. On success the same pass
//! has produced the typed [`ValidatedModel`], with defaults filled in and
//! leaves coerced to their declared types.

use crate::error::{ValidationError, ValidationErrorKind};
use crate::model::{ModelValue, ValidatedModel};
use crate::types::{
    ArraySchema, ConcreteSchema, CrossFieldRule, EnumSchema, NumberSchema, ObjectSchema, Property,
    Schema, StringFormat, StringSchema,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use vitae_config::{ConfigValue, ConfigValueKind, FieldPath};
use vitae_source_map::SourceInfo;
use yaml_rust2::Yaml;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(?:-(0[1-9]|1[0-2])(?:-(0[1-9]|[12]\d|3[01]))?)?$").expect("valid date regex")
});

/// What to do with keys the schema does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFields {
    Ignore,
    Report,
}

/// Validation settings. There is no default: callers always say how strict
/// to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub unknown_fields: UnknownFields,
}

impl ValidationOptions {
    pub fn new(unknown_fields: UnknownFields) -> Self {
        ValidationOptions { unknown_fields }
    }

    /// Unknown fields are errors.
    pub fn strict() -> Self {
        Self::new(UnknownFields::Report)
    }

    /// Unknown fields are dropped.
    pub fn lenient() -> Self {
        Self::new(UnknownFields::Ignore)
    }
}

/// Validate `tree` against `schema`.
///
/// Returns every error found, in traversal order: properties in schema
/// order, then unknown keys in document order, then cross-field rules.
pub fn validate(
    schema: &ConcreteSchema,
    tree: &ConfigValue,
    options: &ValidationOptions,
) -> Result<ValidatedModel, Vec<ValidationError>> {
    let mut context = ValidationContext::new(options);
    let root = context.validate_object(&schema.root, Some(tree), None);

    match root {
        Some(root) if context.errors.is_empty() => Ok(ValidatedModel::new(
            root,
            schema.variant.clone(),
            context.defaulted,
        )),
        _ => Err(context.errors),
    }
}

/// Check a schema default against its own schema. Returns the first problem.
pub(crate) fn check_value(schema: &Schema, value: &ModelValue) -> Option<String> {
    let options = ValidationOptions::strict();
    let mut context = ValidationContext::new(&options);
    let node = value.to_config();
    context.validate_value(schema, &node, None);
    context.errors.first().map(|e| e.message())
}

/// Validation state: where we are and what went wrong so far
struct ValidationContext<'a> {
    options: &'a ValidationOptions,
    path: FieldPath,
    errors: Vec<ValidationError>,
    defaulted: Vec<FieldPath>,
}

impl<'a> ValidationContext<'a> {
    fn new(options: &'a ValidationOptions) -> Self {
        Self {
            options,
            path: FieldPath::new(),
            errors: Vec::new(),
            defaulted: Vec::new(),
        }
    }

    fn add_error(&mut self, kind: ValidationErrorKind, origin: Option<&SourceInfo>) {
        self.errors
            .push(ValidationError::new(self.path.clone(), kind, origin.cloned()));
    }

    fn with_key<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_key(key);
        let result = f(self);
        self.path.pop();
        result
    }

    fn with_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_index(index);
        let result = f(self);
        self.path.pop();
        result
    }

    /// `anchor` is the nearest enclosing position, used for missing fields.
    fn validate_value<'t>(
        &mut self,
        schema: &Schema,
        node: &'t ConfigValue,
        anchor: Option<&'t SourceInfo>,
    ) -> Option<ModelValue> {
        match schema {
            Schema::Any => Some(any_value(node)),
            Schema::Boolean => self.validate_boolean(node),
            Schema::Integer(s) => self.validate_integer(s, node),
            Schema::Number(s) => self.validate_number(s, node),
            Schema::String(s) => self.validate_string(s, node),
            Schema::Enum(s) => self.validate_enum(s, node),
            Schema::Array(s) => self.validate_array(s, node, anchor),
            Schema::Object(s) => self.validate_object(s, Some(node), anchor),
        }
    }

    /// `node` is `None` for an optional object nobody wrote; its defaults
    /// still apply.
    fn validate_object<'t>(
        &mut self,
        schema: &ObjectSchema,
        node: Option<&'t ConfigValue>,
        anchor: Option<&'t SourceInfo>,
    ) -> Option<ModelValue> {
        let entries = match node.map(|n| (n, &n.value)) {
            None => None,
            Some((_, ConfigValueKind::Map(entries))) => Some(entries),
            Some((node, _)) => return self.type_mismatch("mapping", node),
        };
        let anchor = node.and_then(|n| n.source_info.as_ref()).or(anchor);

        let mut out = IndexMap::new();
        let mut ok = true;
        let mut passed: HashSet<&str> = HashSet::new();

        for (name, property) in &schema.properties {
            let child = entries.and_then(|e| e.get(name));
            let result = self.with_key(name, |ctx| match child {
                Some(value) if !value.is_null() => ctx
                    .validate_value(&property.schema, value, anchor)
                    .map(|v| (v, true)),
                _ => ctx.absent(name, property, child, anchor).map(|v| (v, false)),
            });
            match result {
                Some((value, present)) => {
                    if present {
                        passed.insert(name.as_str());
                    }
                    out.insert(name.clone(), value);
                }
                None => ok = false,
            }
        }

        if let Some(entries) = entries {
            for (key, value) in entries {
                if schema.properties.contains_key(key) {
                    continue;
                }
                match &schema.additional_properties {
                    Some(extra) => {
                        match self.with_key(key, |ctx| ctx.validate_value(extra, value, anchor)) {
                            Some(v) => {
                                out.insert(key.clone(), v);
                            }
                            None => ok = false,
                        }
                    }
                    None if self.options.unknown_fields == UnknownFields::Report => {
                        let origin = value.source_info.as_ref().or(anchor);
                        self.with_key(key, |ctx| {
                            ctx.add_error(ValidationErrorKind::UnknownField { field: key.clone() }, origin)
                        });
                        ok = false;
                    }
                    None => {}
                }
            }
        }

        for rule in &schema.rules {
            if !self.check_rule(rule, entries, &passed, &out, anchor) {
                ok = false;
            }
        }

        ok.then_some(ModelValue::Object(out))
    }

    /// A property that is missing or explicitly `null`.
    fn absent<'t>(
        &mut self,
        name: &str,
        property: &Property,
        null_node: Option<&'t ConfigValue>,
        anchor: Option<&'t SourceInfo>,
    ) -> Option<ModelValue> {
        if let Some(default) = &property.default {
            self.defaulted.push(self.path.clone());
            return Some(default.clone());
        }

        let origin = null_node.and_then(|n| n.source_info.as_ref()).or(anchor);
        if property.required {
            self.add_error(
                ValidationErrorKind::MissingRequired {
                    field: name.to_string(),
                },
                origin,
            );
            return None;
        }

        match &property.schema {
            Schema::Object(object) => self.validate_object(object, None, origin),
            _ => Some(ModelValue::Null),
        }
    }

    /// Run one cross-field rule. Fields that are absent or failed their own
    /// checks make the rule not apply.
    fn check_rule(
        &mut self,
        rule: &CrossFieldRule,
        entries: Option<&IndexMap<String, ConfigValue>>,
        passed: &HashSet<&str>,
        out: &IndexMap<String, ModelValue>,
        anchor: Option<&SourceInfo>,
    ) -> bool {
        let Some(entries) = entries else {
            return true;
        };
        let present: Vec<&str> = rule
            .fields()
            .into_iter()
            .filter(|f| entries.get(*f).is_some_and(|v| !v.is_null()))
            .collect();
        if !present.iter().all(|f| passed.contains(f)) {
            return true;
        }

        let origin_of = |field: &str| entries.get(field).and_then(|v| v.source_info.as_ref()).or(anchor);

        match rule {
            CrossFieldRule::Ordered { earlier, later } => {
                if present.len() < 2 {
                    return true;
                }
                let (Some(first), Some(second)) = (out.get(earlier), out.get(later)) else {
                    return true;
                };
                if compare(first, second) != Some(Ordering::Greater) {
                    return true;
                }
                let kind = ValidationErrorKind::OrderViolation {
                    earlier: earlier.clone(),
                    later: later.clone(),
                    earlier_value: display_value(first),
                    later_value: display_value(second),
                };
                let origin = origin_of(later);
                self.with_key(later, |ctx| ctx.add_error(kind, origin));
                false
            }
            CrossFieldRule::MutuallyExclusive(_) => {
                let [first, second, ..] = present.as_slice() else {
                    return true;
                };
                let kind = ValidationErrorKind::MutuallyExclusive {
                    first: first.to_string(),
                    second: second.to_string(),
                };
                let origin = origin_of(*second);
                self.with_key(second, |ctx| ctx.add_error(kind, origin));
                false
            }
        }
    }

    fn validate_array<'t>(
        &mut self,
        schema: &ArraySchema,
        node: &'t ConfigValue,
        anchor: Option<&'t SourceInfo>,
    ) -> Option<ModelValue> {
        let ConfigValueKind::Array(items) = &node.value else {
            return self.type_mismatch("sequence", node);
        };
        let anchor = node.source_info.as_ref().or(anchor);

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, item) in items.iter().enumerate() {
            match self.with_index(index, |ctx| ctx.validate_value(&schema.items, item, anchor)) {
                Some(value) => out.push(value),
                None => ok = false,
            }
        }

        let length = items.len();
        if schema.min_items.is_some_and(|min| length < min) || schema.max_items.is_some_and(|max| length > max) {
            self.add_error(
                ValidationErrorKind::ArrayLength {
                    length,
                    min_items: schema.min_items,
                    max_items: schema.max_items,
                },
                node.source_info.as_ref(),
            );
            ok = false;
        }

        ok.then_some(ModelValue::Array(out))
    }

    fn validate_boolean(&mut self, node: &ConfigValue) -> Option<ModelValue> {
        match node.as_yaml() {
            Some(Yaml::Boolean(b)) => Some(ModelValue::Bool(*b)),
            Some(Yaml::String(s)) => match s.trim() {
                "true" | "True" | "TRUE" => Some(ModelValue::Bool(true)),
                "false" | "False" | "FALSE" => Some(ModelValue::Bool(false)),
                _ => self.coercion_failed(s, "boolean", node),
            },
            _ => self.type_mismatch("boolean", node),
        }
    }

    fn validate_integer(&mut self, schema: &NumberSchema, node: &ConfigValue) -> Option<ModelValue> {
        let n = match node.as_yaml() {
            Some(Yaml::Integer(n)) => *n,
            Some(Yaml::String(s)) => match s.trim().parse::<i64>() {
                Ok(n) => n,
                Err(_) => return self.coercion_failed(s, "integer", node),
            },
            _ => return self.type_mismatch("integer", node),
        };
        self.check_range(schema, n as f64, node)
            .then_some(ModelValue::Integer(n))
    }

    fn validate_number(&mut self, schema: &NumberSchema, node: &ConfigValue) -> Option<ModelValue> {
        let n = match node.as_yaml() {
            Some(Yaml::Integer(n)) => *n as f64,
            Some(Yaml::Real(text)) => match text.parse::<f64>() {
                Ok(n) => n,
                Err(_) => return self.coercion_failed(text, "number", node),
            },
            Some(Yaml::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => return self.coercion_failed(s, "number", node),
            },
            _ => return self.type_mismatch("number", node),
        };
        self.check_range(schema, n, node)
            .then_some(ModelValue::Number(n))
    }

    fn check_range(&mut self, schema: &NumberSchema, value: f64, node: &ConfigValue) -> bool {
        let below = schema.minimum.is_some_and(|min| value < min);
        let above = schema.maximum.is_some_and(|max| value > max);
        if below || above {
            self.add_error(
                ValidationErrorKind::NumberOutOfRange {
                    value,
                    minimum: schema.minimum,
                    maximum: schema.maximum,
                },
                node.source_info.as_ref(),
            );
            return false;
        }
        true
    }

    fn validate_string(&mut self, schema: &StringSchema, node: &ConfigValue) -> Option<ModelValue> {
        let text = self.scalar_text(node)?;
        let origin = node.source_info.as_ref();

        let length = text.chars().count();
        if schema.min_length.is_some_and(|min| length < min)
            || schema.max_length.is_some_and(|max| length > max)
        {
            self.add_error(
                ValidationErrorKind::StringLength {
                    length,
                    min_length: schema.min_length,
                    max_length: schema.max_length,
                },
                origin,
            );
            return None;
        }

        if let Some(pattern) = &schema.pattern
            && let Ok(re) = anchored(pattern)
            && !re.is_match(&text)
        {
            self.add_error(
                ValidationErrorKind::PatternMismatch {
                    value: text,
                    pattern: pattern.clone(),
                },
                origin,
            );
            return None;
        }

        if let Some(format) = schema.format
            && !matches_format(format, &text)
        {
            self.add_error(ValidationErrorKind::InvalidFormat { value: text, format }, origin);
            return None;
        }

        Some(ModelValue::String(text))
    }

    fn validate_enum(&mut self, schema: &EnumSchema, node: &ConfigValue) -> Option<ModelValue> {
        let text = self.scalar_text(node)?;
        if schema.values.contains(&text) {
            return Some(ModelValue::String(text));
        }
        self.add_error(
            ValidationErrorKind::InvalidEnumValue {
                value: text,
                allowed: schema.values.clone(),
            },
            node.source_info.as_ref(),
        );
        None
    }

    /// A string, or a number written where a string is expected.
    fn scalar_text(&mut self, node: &ConfigValue) -> Option<String> {
        match node.as_yaml() {
            Some(Yaml::String(s)) => Some(s.clone()),
            Some(Yaml::Integer(n)) => Some(n.to_string()),
            Some(Yaml::Real(text)) => Some(text.clone()),
            _ => self.type_mismatch("string", node),
        }
    }

    fn type_mismatch<T>(&mut self, expected: &'static str, node: &ConfigValue) -> Option<T> {
        self.add_error(
            ValidationErrorKind::TypeMismatch {
                expected,
                got: node.kind_name(),
            },
            node.source_info.as_ref(),
        );
        None
    }

    fn coercion_failed<T>(&mut self, value: &str, expected: &'static str, node: &ConfigValue) -> Option<T> {
        self.add_error(
            ValidationErrorKind::InvalidCoercion {
                value: value.to_string(),
                expected,
            },
            node.source_info.as_ref(),
        );
        None
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Check that a pattern compiles the way the validator will use it.
pub(crate) fn check_pattern(pattern: &str) -> Result<(), regex::Error> {
    anchored(pattern).map(|_| ())
}

fn matches_format(format: StringFormat, text: &str) -> bool {
    match format {
        StringFormat::Email => EMAIL.is_match(text),
        StringFormat::Url => URL.is_match(text),
        StringFormat::Date => date_key(text).is_some(),
    }
}

/// Sort key for a date: `YYYY[-MM[-DD]]`, with `present` after every date.
fn date_key(text: &str) -> Option<(u32, u32, u32)> {
    if text.eq_ignore_ascii_case("present") {
        return Some((u32::MAX, 0, 0));
    }
    let caps = DATE.captures(text)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some((part(1), part(2), part(3)))
}

fn compare(a: &ModelValue, b: &ModelValue) -> Option<Ordering> {
    match (a, b) {
        (ModelValue::String(x), ModelValue::String(y)) => match (date_key(x), date_key(y)) {
            (Some(p), Some(q)) => Some(p.cmp(&q)),
            _ => Some(x.cmp(y)),
        },
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn display_value(value: &ModelValue) -> String {
    match value {
        ModelValue::String(s) => s.clone(),
        ModelValue::Integer(n) => n.to_string(),
        ModelValue::Number(n) => n.to_string(),
        ModelValue::Bool(b) => b.to_string(),
        other => format!("{:?}", other),
    }
}

/// Keep a value as written, for [`Schema::Any`].
fn any_value(node: &ConfigValue) -> ModelValue {
    match &node.value {
        ConfigValueKind::Scalar(yaml) => match yaml {
            Yaml::Boolean(b) => ModelValue::Bool(*b),
            Yaml::Integer(n) => ModelValue::Integer(*n),
            Yaml::Real(text) => text
                .parse()
                .map(ModelValue::Number)
                .unwrap_or_else(|_| ModelValue::String(text.clone())),
            Yaml::String(s) => ModelValue::String(s.clone()),
            _ => ModelValue::Null,
        },
        ConfigValueKind::Array(items) => ModelValue::Array(items.iter().map(any_value).collect()),
        ConfigValueKind::Map(entries) => ModelValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), any_value(v)))
                .collect(),
        ),
    }
}
