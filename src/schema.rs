//! Declarative parameter schemas
//!
//! Each registered endpoint carries a [`Schema`] describing the shape of its
//! parameters. [`Schema::validate`] checks a loosely-typed JSON object
//! against it, applies declared defaults, and reports every violated
//! constraint at once.
//!
//! Constraint semantics:
//! - `pattern`, `one_of` and numeric bounds apply to scalar values; on an
//!   array field they apply to each element
//! - `min_len` / `max_len` apply to the value itself (string chars or array
//!   elements)
//! - `null` is treated as absent and never appears in validated output

use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Declared type of a field
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<FieldType>),
    Object(Schema),
    /// Any JSON value; only presence is checked
    Any,
}

impl FieldType {
    pub fn array(of: FieldType) -> Self {
        FieldType::Array(Box::new(of))
    }

    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Object(_) => "object",
            FieldType::Any => "any",
        }
    }
}

/// One declared field and its constraints
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    ty: FieldType,
    required: bool,
    default: Option<Value>,
    pattern: Option<&'static Regex>,
    min: Option<f64>,
    max: Option<f64>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    allowed: Option<&'static [&'static str]>,
}

impl Field {
    fn new(name: &'static str, ty: FieldType, required: bool) -> Self {
        Self {
            name,
            ty,
            required,
            default: None,
            pattern: None,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
            allowed: None,
        }
    }

    pub fn required(name: &'static str, ty: FieldType) -> Self {
        Self::new(name, ty, true)
    }

    pub fn optional(name: &'static str, ty: FieldType) -> Self {
        Self::new(name, ty, false)
    }

    /// Value substituted when the field is absent; makes the field optional
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn pattern(mut self, re: &'static Regex) -> Self {
        self.pattern = Some(re);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Restrict values to a closed vocabulary
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn check(&self, path: &str, value: &Value, out: &mut Vec<Violation>) -> Value {
        let Some(checked) = check_type(&self.ty, path, value, out) else {
            return value.clone();
        };

        match &checked {
            Value::String(s) => self.check_len(path, s.chars().count(), out),
            Value::Array(items) => self.check_len(path, items.len(), out),
            _ => {}
        }

        match &checked {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_scalar(&format!("{path}[{i}]"), item, out);
                }
            }
            other => self.check_scalar(path, other, out),
        }

        checked
    }

    fn check_len(&self, path: &str, len: usize, out: &mut Vec<Violation>) {
        if let Some(min) = self.min_len {
            if len < min {
                out.push(Violation::new(path, format!("length must be at least {min}")));
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                out.push(Violation::new(path, format!("length must be at most {max}")));
            }
        }
    }

    fn check_scalar(&self, path: &str, value: &Value, out: &mut Vec<Violation>) {
        match value {
            Value::String(s) => {
                if let Some(re) = self.pattern {
                    if !re.is_match(s) {
                        out.push(Violation::new(
                            path,
                            format!("'{s}' does not match pattern {}", re.as_str()),
                        ));
                    }
                }
                if let Some(allowed) = self.allowed {
                    if !allowed.contains(&s.as_str()) {
                        out.push(Violation::new(
                            path,
                            format!("'{s}' is not one of: {}", allowed.join(", ")),
                        ));
                    }
                }
            }
            Value::Number(n) => {
                let Some(n) = n.as_f64() else { return };
                if let Some(min) = self.min {
                    if n < min {
                        out.push(Violation::new(path, format!("must be >= {min}")));
                    }
                }
                if let Some(max) = self.max {
                    if n > max {
                        out.push(Violation::new(path, format!("must be <= {max}")));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Shape of a parameter object
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    any_of: Vec<&'static [&'static str]>,
    allow_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Require at least one of `names` to be present
    pub fn require_any(mut self, names: &'static [&'static str]) -> Self {
        self.any_of.push(names);
        self
    }

    /// Pass undeclared fields through instead of rejecting them
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate `params`, returning the object with defaults applied.
    ///
    /// `null` is accepted as an empty object so parameterless calls can pass
    /// `Value::Null`.
    pub fn validate(&self, params: &Value) -> Result<Value, ValidationError> {
        let mut violations = Vec::new();
        let validated = match params {
            Value::Null => Value::Object(self.check_object("", &Map::new(), &mut violations)),
            Value::Object(map) => Value::Object(self.check_object("", map, &mut violations)),
            other => {
                violations.push(Violation::new(
                    "$",
                    format!("expected object, got {}", json_type(other)),
                ));
                Value::Null
            }
        };

        if violations.is_empty() {
            Ok(validated)
        } else {
            Err(ValidationError::new(violations))
        }
    }

    fn check_object(
        &self,
        prefix: &str,
        input: &Map<String, Value>,
        out: &mut Vec<Violation>,
    ) -> Map<String, Value> {
        let mut result = Map::new();

        for field in &self.fields {
            let path = join_path(prefix, field.name);
            match input.get(field.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    result.insert(field.name.to_string(), field.check(&path, value, out));
                }
                None => {
                    if let Some(default) = &field.default {
                        result.insert(field.name.to_string(), default.clone());
                    } else if field.required {
                        out.push(Violation::new(path, "is required"));
                    }
                }
            }
        }

        for names in &self.any_of {
            let present = names
                .iter()
                .any(|name| input.get(*name).is_some_and(|v| !v.is_null()));
            if !present {
                let at = if prefix.is_empty() { "$" } else { prefix };
                out.push(Violation::new(
                    at,
                    format!("at least one of {} is required", names.join(", ")),
                ));
            }
        }

        for (key, value) in input {
            if self.get(key).is_some() || value.is_null() {
                continue;
            }
            if self.allow_unknown {
                result.insert(key.clone(), value.clone());
            } else {
                out.push(Violation::new(join_path(prefix, key), "unknown field"));
            }
        }

        result
    }
}

fn check_type(ty: &FieldType, path: &str, value: &Value, out: &mut Vec<Violation>) -> Option<Value> {
    let ok = match (ty, value) {
        (FieldType::Any, _) => true,
        (FieldType::String, Value::String(_)) => true,
        (FieldType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (FieldType::Number, Value::Number(_)) => true,
        (FieldType::Boolean, Value::Bool(_)) => true,
        (FieldType::Array(of), Value::Array(items)) => {
            let mut checked = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                checked.push(check_type(of, &item_path, item, out).unwrap_or_else(|| item.clone()));
            }
            return Some(Value::Array(checked));
        }
        (FieldType::Object(schema), Value::Object(map)) => {
            return Some(Value::Object(schema.check_object(path, map, out)));
        }
        _ => false,
    };

    if ok {
        Some(value.clone())
    } else {
        out.push(Violation::new(
            path,
            format!("expected {}, got {}", ty.name(), json_type(value)),
        ));
        None
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the offending value, e.g. `items[2].item_id`
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found while validating one parameter object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", render(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if some violation sits at exactly `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use serde_json::json;

    static COMPOSITE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[a-z0-9_]+\.[A-Za-z0-9_\-]+$").expect("valid pattern"));

    fn item_schema() -> Schema {
        Schema::new()
            .field(Field::required("item_id", FieldType::String).pattern(&COMPOSITE))
            .field(Field::optional("text", FieldType::String).max_len(10))
    }

    fn schema() -> Schema {
        Schema::new()
            .field(Field::optional("user_id", FieldType::String))
            .field(Field::optional("wallet_address", FieldType::String))
            .field(Field::optional("top_k", FieldType::Integer).default(25).range(1.0, 500.0))
            .field(Field::optional("ratio_min", FieldType::Number).range(0.0, 1.0))
            .field(
                Field::optional("label_category", FieldType::String)
                    .default("all")
                    .one_of(&["all", "topics", "sentiment"]),
            )
            .field(
                Field::optional("items", FieldType::array(FieldType::Object(item_schema())))
                    .min_len(1),
            )
            .require_any(&["user_id", "wallet_address"])
    }

    #[test]
    fn test_valid_params_pass_with_defaults() {
        let out = schema().validate(&json!({"user_id": "16085"})).unwrap();
        assert_eq!(
            out,
            json!({"user_id": "16085", "top_k": 25, "label_category": "all"})
        );
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let input = json!({"user_id": "1", "top_k": 10, "label_category": "topics"});
        assert_eq!(schema().validate(&input).unwrap(), input);
    }

    #[test]
    fn test_null_is_treated_as_absent() {
        let out = schema()
            .validate(&json!({"user_id": "1", "wallet_address": null, "label_category": null}))
            .unwrap();
        assert!(out.get("wallet_address").is_none());
        assert_eq!(out["label_category"], "all");
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let s = Schema::new().field(Field::required("query", FieldType::String));
        let err = s.validate(&json!({})).unwrap_err();
        assert!(err.has_path("query"));
        assert_eq!(err.violations()[0].message, "is required");
    }

    #[test]
    fn test_all_violations_are_reported() {
        let err = schema()
            .validate(&json!({
                "top_k": 0,
                "ratio_min": 1.5,
                "label_category": "weather",
                "bogus": true
            }))
            .unwrap_err();
        assert!(err.has_path("$"));
        assert!(err.has_path("top_k"));
        assert!(err.has_path("ratio_min"));
        assert!(err.has_path("label_category"));
        assert!(err.has_path("bogus"));
        assert_eq!(err.violations().len(), 5);
    }

    #[test]
    fn test_type_mismatch() {
        let err = schema()
            .validate(&json!({"user_id": 16085, "top_k": 2.5}))
            .unwrap_err();
        assert!(err.has_path("user_id"));
        assert!(err.has_path("top_k"));
        assert!(err.to_string().contains("expected string, got number"));
    }

    #[test]
    fn test_nested_array_of_struct_paths() {
        let err = schema()
            .validate(&json!({
                "user_id": "1",
                "items": [
                    {"item_id": "farcaster.0xabc"},
                    {"item_id": "no-protocol"},
                    {"text": "far too long text"}
                ]
            }))
            .unwrap_err();
        assert!(err.has_path("items[1].item_id"));
        assert!(err.has_path("items[2].item_id"));
        assert!(err.has_path("items[2].text"));
        assert!(!err.has_path("items[0].item_id"));
    }

    #[test]
    fn test_empty_array_violates_min_len() {
        let err = schema()
            .validate(&json!({"user_id": "1", "items": []}))
            .unwrap_err();
        assert!(err.has_path("items"));
    }

    #[test]
    fn test_enum_applies_to_array_elements() {
        let s = Schema::new().field(
            Field::required("labels", FieldType::array(FieldType::String)).one_of(&["joy", "fear"]),
        );
        assert!(s.validate(&json!({"labels": ["joy"]})).is_ok());
        let err = s.validate(&json!({"labels": ["joy", "boredom"]})).unwrap_err();
        assert!(err.has_path("labels[1]"));
    }

    #[test]
    fn test_allow_unknown_passes_through() {
        let s = Schema::new().allow_unknown();
        let input = json!({"anything": {"nested": 1}});
        assert_eq!(s.validate(&input).unwrap(), input);
    }

    #[test]
    fn test_null_params_for_empty_schema() {
        assert_eq!(Schema::new().validate(&Value::Null).unwrap(), json!({}));
        let err = Schema::new().validate(&json!([1, 2])).unwrap_err();
        assert!(err.has_path("$"));
    }
}
