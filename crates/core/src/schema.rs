//! Schema-driven payload validation.
//!
//! A schema is a plain Rust struct (compile-time field types) plus a static
//! field table describing how incoming JSON is checked and cast before it is
//! deserialized into that struct. Keys outside the table are dropped, which
//! also keeps clients from setting `_id` or the timestamps.

use core::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Loosely-typed JSON object as it arrives over the wire.
pub type Document = Map<String, Value>;

/// Scalar type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "Number",
        }
    }

    /// Cast a raw JSON value to this kind.
    ///
    /// `Ok(None)` means "no value" (null, or an empty string), which the
    /// caller treats as missing.
    fn cast(self, field: &str, value: &Value) -> Result<Option<Value>, String> {
        match (self, value) {
            (_, Value::Null) => Ok(None),
            (FieldKind::String, Value::String(s)) if s.is_empty() => Ok(None),
            (FieldKind::String, Value::String(_)) => Ok(Some(value.clone())),
            (FieldKind::String, Value::Number(n)) => Ok(Some(Value::String(n.to_string()))),
            (FieldKind::String, Value::Bool(b)) => Ok(Some(Value::String(b.to_string()))),
            (FieldKind::Number, Value::Number(_)) => Ok(Some(value.clone())),
            // true and false cast to 1 and 0.
            (FieldKind::Number, Value::Bool(b)) => Ok(Some(Value::from(u8::from(*b)))),
            (FieldKind::Number, Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(Some(Value::from(n)));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(|n| Some(Value::Number(n)))
                    .ok_or_else(|| self.cast_failure(field, value))
            }
            _ => Err(self.cast_failure(field, value)),
        }
    }

    fn cast_failure(self, field: &str, value: &Value) -> String {
        format!(
            "Cast to {} failed for value {} (type {}) at path \"{}\"",
            self.name(),
            value,
            json_type_name(value),
            field
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

/// One entry of a schema's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("Path `{field}` is required."))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one payload, tagged with the record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    kind: &'static str,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(kind: &'static str, errors: Vec<FieldError>) -> Self {
        Self { kind, errors }
    }

    pub fn single(
        kind: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, vec![FieldError::new(field, message)])
    }

    fn not_an_object(kind: &'static str, value: &Value) -> Self {
        Self::single(
            kind,
            "body",
            format!("expected a JSON object, got {}", json_type_name(value)),
        )
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed: ", self.kind)?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A record kind: typed fields plus the table used to validate raw payloads.
pub trait Schema:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Display name used in messages ("Student").
    const KIND: &'static str;

    /// Name of the collection records of this kind are stored in.
    const COLLECTION: &'static str;

    /// Field table, in the order errors are reported.
    const FIELDS: &'static [FieldSpec];

    /// Check a raw payload against the field table and build the typed value.
    fn validate(payload: &Value) -> Result<Self, ValidationErrors> {
        let Value::Object(input) = payload else {
            return Err(ValidationErrors::not_an_object(Self::KIND, payload));
        };

        let mut errors = Vec::new();
        let mut doc = Document::new();
        for field in Self::FIELDS {
            let cast = match input.get(field.name) {
                Some(raw) => field.kind.cast(field.name, raw),
                None => Ok(None),
            };
            match cast {
                Ok(Some(value)) => {
                    doc.insert(field.name.to_string(), value);
                }
                Ok(None) if field.required => errors.push(FieldError::required(field.name)),
                Ok(None) => {}
                Err(message) => errors.push(FieldError::new(field.name, message)),
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(Self::KIND, errors));
        }

        serde_json::from_value(Value::Object(doc))
            .map_err(|e| ValidationErrors::single(Self::KIND, "body", e.to_string()))
    }

    /// Field values as a JSON object (schema structs always serialize to one).
    fn to_document(&self) -> Document {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Document::new(),
        }
    }

    /// Overwrite the fields named in `patch`, then re-validate the result.
    ///
    /// `self` is never modified; on error the caller keeps the old value.
    fn apply_patch(&self, patch: &Value) -> Result<Self, ValidationErrors> {
        let Value::Object(changes) = patch else {
            return Err(ValidationErrors::not_an_object(Self::KIND, patch));
        };

        let mut doc = self.to_document();
        for field in Self::FIELDS {
            if let Some(value) = changes.get(field.name) {
                doc.insert(field.name.to_string(), value.clone());
            }
        }
        Self::validate(&Value::Object(doc))
    }
}
