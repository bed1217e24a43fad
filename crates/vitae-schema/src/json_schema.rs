//! JSON Schema (draft-07) export.
//!
//! Cross-field rules have no draft-07 equivalent and are not exported.

use crate::types::{ConcreteSchema, ObjectSchema, Schema, StringFormat};
use serde_json::{Map, Value, json};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

impl ConcreteSchema {
    /// A complete JSON Schema document for this variant.
    pub fn to_json_schema(&self) -> Value {
        let mut document = Map::new();
        document.insert("$schema".into(), json!(DRAFT_07));
        document.insert("title".into(), json!(format!("vitae CV ({})", self.variant)));
        if let Value::Object(body) = object_schema(&self.root) {
            document.extend(body);
        }
        Value::Object(document)
    }
}

impl Schema {
    /// This schema as a JSON Schema fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::Any => json!({}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Integer(bounds) | Schema::Number(bounds) => {
                let mut out = Map::new();
                let ty = if matches!(self, Schema::Integer(_)) { "integer" } else { "number" };
                out.insert("type".into(), json!(ty));
                insert_some(&mut out, "minimum", bounds.minimum);
                insert_some(&mut out, "maximum", bounds.maximum);
                Value::Object(out)
            }
            Schema::String(string) => {
                let mut out = Map::new();
                out.insert("type".into(), json!("string"));
                insert_some(&mut out, "minLength", string.min_length);
                insert_some(&mut out, "maxLength", string.max_length);
                match string.format {
                    Some(StringFormat::Email) => {
                        out.insert("format".into(), json!("email"));
                    }
                    Some(StringFormat::Url) => {
                        out.insert("format".into(), json!("uri"));
                    }
                    // draft-07 "date" requires a full date; ours allows YYYY and YYYY-MM
                    Some(StringFormat::Date) => {
                        out.insert(
                            "pattern".into(),
                            json!(r"^(\d{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?)?|present)$"),
                        );
                    }
                    None => {}
                }
                if let Some(pattern) = &string.pattern {
                    let anchored = json!(format!("^(?:{})$", pattern));
                    // A value must match both the date pattern and its own
                    match out.remove("pattern") {
                        Some(date) => {
                            out.insert("allOf".into(), json!([{"pattern": date}, {"pattern": anchored}]));
                        }
                        None => {
                            out.insert("pattern".into(), anchored);
                        }
                    }
                }
                Value::Object(out)
            }
            Schema::Enum(choices) => json!({"type": "string", "enum": choices.values}),
            Schema::Array(array) => {
                let mut out = Map::new();
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), array.items.to_json_schema());
                insert_some(&mut out, "minItems", array.min_items);
                insert_some(&mut out, "maxItems", array.max_items);
                Value::Object(out)
            }
            Schema::Object(object) => object_schema(object),
        }
    }
}

fn object_schema(object: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, property) in &object.properties {
        let mut schema = property.schema.to_json_schema();
        if let Value::Object(fields) = &mut schema {
            if let Some(description) = &property.description {
                fields.insert("description".into(), json!(description));
            }
            if let Some(default) = &property.default {
                fields.insert("default".into(), json!(default));
            }
        }
        if property.required {
            required.push(json!(name));
        }
        properties.insert(name.clone(), schema);
    }

    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".into(), Value::Array(required));
    }
    let additional = match &object.additional_properties {
        Some(extra) => extra.to_json_schema(),
        None => Value::Bool(false),
    };
    out.insert("additionalProperties".into(), additional);
    Value::Object(out)
}

fn insert_some<T: Into<Value>>(out: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value.into());
    }
}
