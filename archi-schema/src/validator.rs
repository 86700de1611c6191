//! First-failure document validation.
//!
//! The canonical [`Schema`] is rendered to JSON Schema and compiled with
//! `jsonschema`. Of the errors it reports, the one that comes first in schema
//! declaration order wins: array items in index order, unknown keys after all
//! declared fields. Nothing is aggregated.

use crate::schema::{ObjectSchema, Schema};
use archi_core::{ArchiError, Result};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::OnceLock;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
}

/// The first offending location and what was wrong there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dotted path from the document root, or `root`.
    pub path: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    WrongType { expected: String, found: String },
    NotInEnum { value: String, allowed: Vec<String> },
    EmptyArray { min_items: usize, found: usize },
    BelowMinimum { minimum: i64, found: i64 },
    AboveMaximum { maximum: i64, found: Number },
    UnknownField,
    /// Reported by the JSON Schema engine at a location the canonical schema does not describe.
    Invalid { reason: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("missing required field"),
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::NotInEnum { value, allowed } => {
                write!(f, "value '{value}' is not one of [{}]", allowed.join(", "))
            }
            Self::EmptyArray { min_items: 1, .. } => f.write_str("array must not be empty"),
            Self::EmptyArray { min_items, found } => {
                write!(f, "array needs at least {min_items} items, found {found}")
            }
            Self::BelowMinimum { minimum, found } => {
                write!(f, "value {found} is below minimum {minimum}")
            }
            Self::AboveMaximum { maximum, found } => {
                write!(f, "value {found} is above maximum {maximum}")
            }
            Self::UnknownField => f.write_str("unknown field"),
            Self::Invalid { reason } => f.write_str(reason),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.path, self.kind)
    }
}

impl Validation {
    fn pass() -> Self {
        Self { ok: true, message: "document conforms to schema".to_string(), violation: None }
    }

    fn fail(violation: Violation) -> Self {
        Self { ok: false, message: violation.to_string(), violation: Some(violation) }
    }

    /// Converts a failed validation into a format error.
    pub fn into_result(self) -> Result<()> {
        if self.ok { Ok(()) } else { Err(ArchiError::format(self.message)) }
    }
}

/// A [`Schema`] compiled once for repeated validation.
pub struct SchemaValidator {
    schema: Schema,
    compiled: jsonschema::Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").field("schema", &self.schema).finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compiles `schema`. A malformed schema is a configuration error.
    pub fn new(schema: &Schema) -> Result<Self> {
        schema.check()?;
        let compiled = jsonschema::Validator::new(&schema.to_json_schema())
            .map_err(|e| ArchiError::config(format!("malformed schema: {e}")))?;
        Ok(Self { schema: schema.clone(), compiled })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validate(&self, document: &Value) -> Validation {
        let first = self
            .compiled
            .iter_errors(document)
            .map(|error| {
                let pointer = error.instance_path().to_string();
                self.locate(document, &pointer)
                    .unwrap_or_else(|| Located::unmapped(&pointer, error.to_string()))
            })
            .min_by(|a, b| a.rank.cmp(&b.rank));

        match first {
            Some(located) => Validation::fail(located.violation),
            None => Validation::pass(),
        }
    }

    /// Walks the canonical schema alongside the document to the node a
    /// JSON pointer names, then explains what is wrong there.
    fn locate(&self, document: &Value, pointer: &str) -> Option<Located> {
        let mut schema = &self.schema;
        let mut value = document;
        let mut path = Vec::new();
        let mut rank = Vec::new();

        for token in pointer.split('/').skip(1) {
            let token = unescape(token);
            match (strip_nullable(schema), value) {
                (Schema::Array { items, .. }, Value::Array(elements)) => {
                    let index: usize = token.parse().ok()?;
                    value = elements.get(index)?;
                    schema = &**items;
                    path.push(Segment::Index(index));
                    rank.push(Rank::Item(index));
                }
                (Schema::Object(object), Value::Object(map)) => {
                    let position = object.fields.iter().position(|f| f.name == token)?;
                    value = map.get(&token)?;
                    schema = &object.fields[position].schema;
                    path.push(Segment::Key(token));
                    rank.push(Rank::Field(position));
                }
                _ => return None,
            }
        }

        let (step, kind) = describe(schema, value)?;
        if let Some((segment, step_rank)) = step {
            path.push(segment);
            rank.push(step_rank);
        }
        Some(Located { rank, violation: Violation { path: render_path(&path), kind } })
    }
}

/// Compiles `schema` on first use and keeps it in `cell`.
pub fn cached_validator(
    cell: &'static OnceLock<Result<SchemaValidator>>,
    schema: &Schema,
) -> Result<&'static SchemaValidator> {
    cell.get_or_init(|| SchemaValidator::new(schema))
        .as_ref()
        .map_err(|e| ArchiError::config(e.detail()))
}

/// Validates `document` against `schema`.
///
/// Returns `Err` only when the schema itself is malformed.
pub fn validate(document: &Value, schema: &Schema) -> Result<Validation> {
    Ok(SchemaValidator::new(schema)?.validate(document))
}

/// Validates a document supplied as JSON text.
///
/// Text that does not parse as JSON is a caller error, not a validation failure.
pub fn validate_str(input: &str, schema: &Schema) -> Result<Validation> {
    let document: Value = serde_json::from_str(input)
        .map_err(|e| ArchiError::config(format!("input is not a JSON document: {e}")))?;
    validate(&document, schema)
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Position in declaration order. Declared fields sort before unknown keys,
/// and a node sorts before anything beneath it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Field(usize),
    Unknown(String),
    Item(usize),
}

struct Located {
    rank: Vec<Rank>,
    violation: Violation,
}

impl Located {
    fn unmapped(pointer: &str, reason: String) -> Self {
        let path = pointer.split('/').skip(1).map(unescape).collect::<Vec<_>>();
        let path = if path.is_empty() { "root".to_string() } else { path.join(".") };
        Self {
            rank: vec![Rank::Unknown(pointer.to_string())],
            violation: Violation { path, kind: ViolationKind::Invalid { reason } },
        }
    }
}

type Finding = (Option<(Segment, Rank)>, ViolationKind);

fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn strip_nullable(schema: &Schema) -> &Schema {
    match schema {
        Schema::Nullable(inner) => strip_nullable(inner),
        other => other,
    }
}

fn render_path(path: &[Segment]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    path.iter()
        .map(|segment| match segment {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What is wrong at one node, without looking at its children.
fn describe(schema: &Schema, value: &Value) -> Option<Finding> {
    match (schema, value) {
        (Schema::Nullable(_), Value::Null) => None,
        (Schema::Nullable(inner), _) => describe(inner, value),
        (Schema::Object(object), Value::Object(map)) => describe_object(object, map),
        (Schema::Array { min_items, .. }, Value::Array(elements)) => {
            (elements.len() < *min_items).then(|| {
                let kind = ViolationKind::EmptyArray { min_items: *min_items, found: elements.len() };
                (None, kind)
            })
        }
        (Schema::String, Value::String(_)) | (Schema::Boolean, Value::Bool(_)) => None,
        (Schema::Enum(allowed), Value::String(s)) => (!allowed.contains(s)).then(|| {
            (None, ViolationKind::NotInEnum { value: s.clone(), allowed: allowed.clone() })
        }),
        (Schema::Integer { minimum, maximum }, Value::Number(n)) if n.is_i64() || n.is_u64() => {
            out_of_range(n, *minimum, *maximum).map(|kind| (None, kind))
        }
        _ => Some((
            None,
            ViolationKind::WrongType {
                expected: schema.type_name().to_string(),
                found: json_type(value).to_string(),
            },
        )),
    }
}

fn describe_object(object: &ObjectSchema, map: &Map<String, Value>) -> Option<Finding> {
    let missing = object
        .fields
        .iter()
        .enumerate()
        .find(|(_, field)| field.required && !map.contains_key(&field.name));
    if let Some((index, field)) = missing {
        let step = (Segment::Key(field.name.clone()), Rank::Field(index));
        return Some((Some(step), ViolationKind::MissingField));
    }
    if object.additional_properties {
        return None;
    }
    map.keys().filter(|key| object.field(key).is_none()).min().map(|key| {
        let step = (Segment::Key(key.clone()), Rank::Unknown(key.clone()));
        (Some(step), ViolationKind::UnknownField)
    })
}

fn out_of_range(n: &Number, minimum: Option<i64>, maximum: Option<i64>) -> Option<ViolationKind> {
    match n.as_i64() {
        Some(found) => {
            if let Some(min) = minimum.filter(|min| found < *min) {
                return Some(ViolationKind::BelowMinimum { minimum: min, found });
            }
            maximum
                .filter(|max| found > *max)
                .map(|max| ViolationKind::AboveMaximum { maximum: max, found: n.clone() })
        }
        // above i64::MAX, so only an upper bound rejects it
        None => maximum.map(|max| ViolationKind::AboveMaximum { maximum: max, found: n.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn story_schema() -> Schema {
        Schema::object()
            .required(
                "stories",
                Schema::non_empty_array(
                    Schema::object()
                        .required("role", Schema::string(), "")
                        .required("acceptance_criteria", Schema::non_empty_array(Schema::string()), "")
                        .build(),
                ),
                "",
            )
            .build()
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({"stories": [{"role": "admin", "acceptance_criteria": ["works"]}]});
        let result = validate(&doc, &story_schema()).unwrap();
        assert!(result.ok);
        assert!(result.violation.is_none());
    }

    #[test]
    fn test_root_type_mismatch() {
        let result = validate(&json!([1, 2]), &story_schema()).unwrap();
        assert!(!result.ok);
        assert_eq!(result.message, "field 'root': expected object, found array");
    }

    #[test]
    fn test_missing_nested_field_path() {
        let doc = json!({"stories": [
            {"role": "a", "acceptance_criteria": ["x"]},
            {"role": "b"}
        ]});
        let result = validate(&doc, &story_schema()).unwrap();
        let violation = result.violation.unwrap();
        assert_eq!(violation.path, "stories.1.acceptance_criteria");
        assert_eq!(violation.kind, ViolationKind::MissingField);
    }

    #[test]
    fn test_empty_array() {
        let result = validate(&json!({"stories": []}), &story_schema()).unwrap();
        assert_eq!(result.message, "field 'stories': array must not be empty");
    }

    #[test]
    fn test_first_failure_follows_declaration_order() {
        // both fields are wrong; "role" is declared first
        let doc = json!({"stories": [{"acceptance_criteria": [], "role": 5}]});
        let violation = validate(&doc, &story_schema()).unwrap().violation.unwrap();
        assert_eq!(violation.path, "stories.0.role");
    }

    #[test]
    fn test_unknown_field_after_declared_fields() {
        let doc = json!({"stories": [{"role": "a", "acceptance_criteria": ["x"], "extra": 1}]});
        let violation = validate(&doc, &story_schema()).unwrap().violation.unwrap();
        assert_eq!(violation.path, "stories.0.extra");
        assert_eq!(violation.kind, ViolationKind::UnknownField);
    }

    #[test]
    fn test_enum_and_minimum() {
        let schema = Schema::object()
            .required("type", Schema::enumeration(["table", "view", "logical"]), "")
            .required("length", Schema::non_negative_integer(), "")
            .build();

        let bad_enum = validate(&json!({"type": "index", "length": 1}), &schema).unwrap();
        assert_eq!(bad_enum.message, "field 'type': value 'index' is not one of [table, view, logical]");

        let negative = validate(&json!({"type": "view", "length": -1}), &schema).unwrap();
        assert_eq!(negative.message, "field 'length': value -1 is below minimum 0");

        let float = validate(&json!({"type": "view", "length": 2.5}), &schema).unwrap();
        assert_eq!(float.message, "field 'length': expected integer, found number");
    }

    #[test]
    fn test_nullable_accepts_null() {
        let schema = Schema::object()
            .optional("description", Schema::nullable(Schema::string()), "")
            .build();
        assert!(validate(&json!({"description": null}), &schema).unwrap().ok);
        assert!(validate(&json!({}), &schema).unwrap().ok);
        assert!(!validate(&json!({"description": 3}), &schema).unwrap().ok);
    }

    #[test]
    fn test_validate_str_rejects_non_json() {
        let err = validate_str("As a user I want...", &story_schema()).unwrap_err();
        assert_eq!(err.kind(), archi_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_malformed_schema_is_error_not_failure() {
        let schema = Schema::object().required("kind", Schema::Enum(vec![]), "").build();
        assert!(validate(&json!({"kind": "x"}), &schema).is_err());
    }

    #[test]
    fn test_input_not_mutated() {
        let doc = json!({"stories": [{"role": 1}]});
        let before = doc.clone();
        let _ = validate(&doc, &story_schema()).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_above_maximum_names_the_field() {
        let schema = Schema::object()
            .required("length", Schema::bounded_integer(0, i64::from(u32::MAX)), "")
            .build();
        assert!(validate(&json!({"length": 4_294_967_295u64}), &schema).unwrap().ok);

        let result = validate(&json!({"length": 5_000_000_000u64}), &schema).unwrap();
        assert_eq!(result.message, "field 'length': value 5000000000 is above maximum 4294967295");

        let huge = validate(&json!({"length": u64::MAX}), &schema).unwrap();
        assert!(matches!(huge.violation.unwrap().kind, ViolationKind::AboveMaximum { .. }));
    }

    #[test]
    fn test_missing_fields_reported_in_declaration_order() {
        let doc = json!({"stories": [{}]});
        let violation = validate(&doc, &story_schema()).unwrap().violation.unwrap();
        assert_eq!(violation.path, "stories.0.role");
    }

    #[test]
    fn test_compiled_validator_is_reusable() {
        let validator = SchemaValidator::new(&story_schema()).unwrap();
        let good = json!({"stories": [{"role": "a", "acceptance_criteria": ["x"]}]});
        assert!(validator.validate(&good).ok);
        assert!(!validator.validate(&json!({})).ok);
        assert!(validator.validate(&good).ok);
    }

    #[test]
    fn test_cached_validator_compiles_once() {
        static CELL: OnceLock<Result<SchemaValidator>> = OnceLock::new();
        let first = cached_validator(&CELL, &story_schema()).unwrap();
        let second = cached_validator(&CELL, &story_schema()).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_cached_validator_reports_malformed_schema() {
        static CELL: OnceLock<Result<SchemaValidator>> = OnceLock::new();
        let schema = Schema::object().required("kind", Schema::Enum(vec![]), "").build();
        let err = cached_validator(&CELL, &schema).unwrap_err();
        assert_eq!(err.kind(), archi_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_into_result() {
        let failed = validate(&json!({}), &story_schema()).unwrap();
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Format error: field 'stories': missing required field");
    }
}
