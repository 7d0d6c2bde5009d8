//! Namespace schema resolution
//!
//! Resolves each field of a raw schema document into a semantic type and the
//! capability flags that drive filtering, full-text search and attribute
//! inclusion. Resolution happens once per fetch; the rest of the query layer
//! only ever sees resolved fields.

use std::fmt;

use serde_json::{Map, Value};

/// Semantic type of a schema field
///
/// Resolution order: an explicit `type` tag on an object config always wins;
/// a config that is itself a JSON array resolves to `Array`; otherwise the
/// runtime type of the raw value decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    Number,
    String,
    Array,
    /// Fixed-dimension float vector, e.g. `[f32;768]`
    Vector { dims: Option<usize> },
    Unknown,
}

impl FieldType {
    /// Resolve the semantic type of one raw field configuration
    pub fn resolve(config: &Value) -> Self {
        if let Value::Object(map) = config
            && let Some(Value::String(tag)) = map.get("type")
        {
            return Self::from_tag(tag);
        }
        match config {
            Value::Array(_) => Self::Array,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            _ => Self::Unknown,
        }
    }

    /// Resolve a semantic type from an explicit type tag
    ///
    /// Vector types are encoded as a string carrying the `f32` element marker
    /// and bracket notation (`[f32;128]`); the dimension count is parsed
    /// best-effort and may be absent.
    pub fn from_tag(tag: &str) -> Self {
        if tag.contains("f32") && tag.contains('[') {
            return Self::Vector {
                dims: parse_vector_dims(tag),
            };
        }
        match tag {
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "string" => Self::String,
            "array" => Self::Array,
            _ => Self::Unknown,
        }
    }

    /// Vector-typed fields are excluded from tabular display
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector { .. })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Vector { dims: Some(d) } => write!(f, "[f32;{}]", d),
            Self::Vector { dims: None } => write!(f, "[f32]"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Parse the dimension count out of `[f32;N]` notation
fn parse_vector_dims(tag: &str) -> Option<usize> {
    let after_semicolon = tag.split(';').nth(1)?;
    let digits: String = after_semicolon
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// One schema field with its capabilities resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub field_type: FieldType,
    /// Whether the field may appear in filter conditions
    pub filterable: bool,
    /// Whether the field is eligible for full-text search
    pub full_text_search: bool,
}

impl ResolvedField {
    fn resolve(name: &str, config: &Value) -> Self {
        // A field is filterable when its config is an object that does not
        // explicitly set `filterable: false`. Bare scalar configs never are.
        let filterable = match config {
            Value::Object(map) => map.get("filterable") != Some(&Value::Bool(false)),
            Value::Array(_) => true,
            _ => false,
        };

        // Full-text search requires an object config whose `full_text_search`
        // is truthy: the boolean `true` or a non-null configuration value.
        let full_text_search = match config {
            Value::Object(map) => matches!(
                map.get("full_text_search"),
                Some(Value::Bool(true)) | Some(Value::Object(_)) | Some(Value::Array(_))
            ),
            _ => false,
        };

        Self {
            name: name.to_string(),
            field_type: FieldType::resolve(config),
            filterable,
            full_text_search,
        }
    }
}

/// A namespace schema with every field resolved once
///
/// Field order follows the raw document (serde_json preserves object order),
/// which drives both the capability listing and the attribute-inclusion list.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSchema {
    fields: Vec<ResolvedField>,
    raw: Map<String, Value>,
}

impl NamespaceSchema {
    /// Resolve a raw schema document; `None` unless it is a JSON object
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map.clone())),
            _ => None,
        }
    }

    pub fn from_map(raw: Map<String, Value>) -> Self {
        let fields = raw
            .iter()
            .map(|(name, config)| ResolvedField::resolve(name, config))
            .collect();
        Self { fields, raw }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// The raw schema document, for display
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Semantic type of a field; unknown fields degrade to `Unknown`, which
    /// carries the string-style defaults
    pub fn field_type(&self, name: &str) -> FieldType {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type.clone())
            .unwrap_or(FieldType::Unknown)
    }

    /// Fields that may be used in filter conditions
    pub fn filterable_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.filterable)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Fields eligible for full-text search
    pub fn full_text_search_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.full_text_search)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Every non-vector field name, in schema order
    ///
    /// Embedding vectors are large and not meant for tabular display, so they
    /// are excluded from the attribute-inclusion list.
    pub fn include_attributes(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !f.field_type.is_vector())
            .map(|f| f.name.clone())
            .collect()
    }
}
