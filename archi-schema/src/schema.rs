//! Canonical schema representation.
//!
//! A [`Schema`] renders to the JSON Schema that is both compiled into the
//! validator and sent to the model as its structured-output contract.

use archi_core::{ArchiError, Result};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object(ObjectSchema),
    Array { items: Box<Schema>, min_items: usize },
    String,
    Integer { minimum: Option<i64>, maximum: Option<i64> },
    Boolean,
    /// String restricted to the listed values.
    Enum(Vec<String>),
    /// The inner schema, or JSON `null`.
    Nullable(Box<Schema>),
}

/// Object with fields in declaration order. Validation visits fields in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub additional_properties: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
    pub description: Option<String>,
}

impl Schema {
    pub fn string() -> Self {
        Self::String
    }

    pub fn integer() -> Self {
        Self::Integer { minimum: None, maximum: None }
    }

    pub fn non_negative_integer() -> Self {
        Self::Integer { minimum: Some(0), maximum: None }
    }

    /// Integer within `minimum..=maximum`, e.g. the range of the Rust field it lands in.
    pub fn bounded_integer(minimum: i64, maximum: i64) -> Self {
        Self::Integer { minimum: Some(minimum), maximum: Some(maximum) }
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn array(items: Schema) -> Self {
        Self::Array { items: Box::new(items), min_items: 0 }
    }

    pub fn non_empty_array(items: Schema) -> Self {
        Self::Array { items: Box::new(items), min_items: 1 }
    }

    pub fn nullable(inner: Schema) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    /// Name of the JSON type this schema accepts, as used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array { .. } => "array",
            Self::String | Self::Enum(_) => "string",
            Self::Integer { .. } => "integer",
            Self::Boolean => "boolean",
            Self::Nullable(inner) => inner.type_name(),
        }
    }

    /// Rejects schemas the validator cannot apply meaningfully.
    pub fn check(&self) -> Result<()> {
        self.check_at("root")
    }

    fn check_at(&self, path: &str) -> Result<()> {
        match self {
            Self::Object(object) => {
                let mut seen = HashSet::new();
                for field in &object.fields {
                    if field.name.is_empty() {
                        return Err(ArchiError::config(format!(
                            "malformed schema at '{path}': empty field name"
                        )));
                    }
                    if !seen.insert(field.name.as_str()) {
                        return Err(ArchiError::config(format!(
                            "malformed schema at '{path}': duplicate field '{}'",
                            field.name
                        )));
                    }
                    let child = if path == "root" {
                        field.name.clone()
                    } else {
                        format!("{path}.{}", field.name)
                    };
                    field.schema.check_at(&child)?;
                }
                Ok(())
            }
            Self::Array { items, .. } => items.check_at(path),
            Self::Enum(values) if values.is_empty() => Err(ArchiError::config(format!(
                "malformed schema at '{path}': enumeration has no values"
            ))),
            Self::Integer { minimum: Some(min), maximum: Some(max) } if min > max => {
                Err(ArchiError::config(format!(
                    "malformed schema at '{path}': minimum {min} exceeds maximum {max}"
                )))
            }
            Self::Nullable(inner) if matches!(**inner, Self::Nullable(_)) => Err(
                ArchiError::config(format!("malformed schema at '{path}': nested nullable")),
            ),
            Self::Nullable(inner) => inner.check_at(path),
            _ => Ok(()),
        }
    }

    /// JSON Schema rendering used as the model's response format.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Object(object) => object.to_json_schema(),
            Self::Array { items, min_items } => {
                let mut schema = json!({ "type": "array", "items": items.to_json_schema() });
                if *min_items > 0 {
                    schema["minItems"] = json!(min_items);
                }
                schema
            }
            Self::String => json!({ "type": "string" }),
            Self::Integer { minimum, maximum } => {
                let mut schema = json!({ "type": "integer" });
                if let Some(min) = minimum {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = maximum {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Enum(values) => json!({ "type": "string", "enum": values }),
            Self::Nullable(inner) => {
                let mut schema = inner.to_json_schema();
                match schema.get("type").and_then(Value::as_str).map(str::to_string) {
                    Some(ty) => {
                        schema["type"] = json!([ty, "null"]);
                        if let Some(values) = schema.get_mut("enum").and_then(Value::as_array_mut) {
                            values.push(Value::Null);
                        }
                        schema
                    }
                    None => json!({ "anyOf": [schema, { "type": "null" }] }),
                }
            }
        }
    }
}

impl ObjectSchema {
    pub fn required(mut self, name: impl Into<String>, schema: Schema, description: &str) -> Self {
        self.fields.push(Field::new(name, schema, true, description));
        self
    }

    pub fn optional(mut self, name: impl Into<String>, schema: Schema, description: &str) -> Self {
        self.fields.push(Field::new(name, schema, false, description));
        self
    }

    pub fn deny_unknown(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        self.additional_properties = true;
        self
    }

    pub fn build(self) -> Schema {
        Schema::Object(self)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut schema = field.schema.to_json_schema();
            if let (Some(desc), Some(obj)) = (&field.description, schema.as_object_mut()) {
                obj.insert("description".to_string(), json!(desc));
            }
            properties.insert(field.name.clone(), schema);
        }
        let required: Vec<&str> =
            self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": self.additional_properties,
        })
    }
}

impl Field {
    fn new(name: impl Into<String>, schema: Schema, required: bool, description: &str) -> Self {
        Self {
            name: name.into(),
            schema,
            required,
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}
