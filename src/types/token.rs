//! Token and token value types.
//!
//! A token arrives from the dictionary as raw JSON. Before any transform
//! runs it is lifted into a [`TokenValue`], so composite rules match on the
//! variant instead of probing the JSON shape.

use serde::Serialize;
use serde_json::{Map, Value};

/// Type tag for typography composites.
pub const TYPE_TYPOGRAPHY: &str = "typography";
/// Type tag for box-shadow composites.
pub const TYPE_BOX_SHADOW: &str = "boxShadow";
/// Type tag for line heights.
pub const TYPE_LINE_HEIGHTS: &str = "lineHeights";
/// Type tag for colours.
pub const TYPE_COLOR: &str = "color";

/// One layer of a box shadow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShadowSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ShadowSpec {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            x: field(obj, "x"),
            y: field(obj, "y"),
            blur: field(obj, "blur"),
            spread: field(obj, "spread"),
            color: field(obj, "color"),
        }
    }
}

/// The fields of a typography composite that the shorthand needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl TypographySpec {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            font_size: field(obj, "fontSize"),
            line_height: field(obj, "lineHeight"),
            font_family: field(obj, "fontFamily"),
        }
    }
}

/// A token value after alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Plain string value (numbers and booleans are stringified).
    Scalar(String),
    /// Single box-shadow layer.
    Shadow(ShadowSpec),
    /// Stacked box-shadow layers.
    ShadowList(Vec<ShadowSpec>),
    /// Typography composite.
    Typography(TypographySpec),
    /// Any other structured value, passed through untouched.
    Raw(Value),
    /// A composite that could not be rendered. Omitted from every output.
    Empty,
}

impl TokenValue {
    /// Lift a resolved JSON value according to the token's type tag.
    pub fn from_json(token_type: Option<&str>, value: &Value) -> Self {
        match (token_type, value) {
            (_, Value::String(s)) => TokenValue::Scalar(s.clone()),
            (_, Value::Number(n)) => TokenValue::Scalar(n.to_string()),
            (_, Value::Bool(b)) => TokenValue::Scalar(b.to_string()),
            (_, Value::Null) => TokenValue::Empty,
            (Some(TYPE_TYPOGRAPHY), Value::Object(obj)) => {
                TokenValue::Typography(TypographySpec::from_object(obj))
            }
            (Some(TYPE_BOX_SHADOW), Value::Object(obj)) => {
                TokenValue::Shadow(ShadowSpec::from_object(obj))
            }
            (Some(TYPE_BOX_SHADOW), Value::Array(items))
                if items.iter().all(Value::is_object) =>
            {
                TokenValue::ShadowList(
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(ShadowSpec::from_object)
                        .collect(),
                )
            }
            (_, other) => TokenValue::Raw(other.clone()),
        }
    }

    /// The string value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TokenValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TokenValue::Empty)
    }

    /// Text form used in CSS declarations. `None` for empty values.
    pub fn render(&self) -> Option<String> {
        match self {
            TokenValue::Scalar(s) => Some(s.clone()),
            TokenValue::Empty => None,
            TokenValue::Raw(Value::String(s)) => Some(s.clone()),
            other => other.to_json().map(|v| v.to_string()),
        }
    }

    /// JSON form used in nested documents. `None` for empty values.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            TokenValue::Scalar(s) => Some(Value::String(s.clone())),
            TokenValue::Empty => None,
            TokenValue::Raw(v) => Some(v.clone()),
            TokenValue::Shadow(spec) => serde_json::to_value(spec).ok(),
            TokenValue::ShadowList(specs) => serde_json::to_value(specs).ok(),
            TokenValue::Typography(spec) => serde_json::to_value(spec).ok(),
        }
    }
}

/// A single design token in a theme's flattened dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Path segments from the token tree, e.g. `["color", "background", "primary"]`.
    pub path: Vec<String>,
    /// Output name, set by the pipeline's name transform.
    pub name: String,
    /// Category tag (`color`, `typography`, `boxShadow`, ...).
    pub token_type: Option<String>,
    pub value: TokenValue,
    /// The value as written in the source file, before alias resolution.
    pub original: Option<Value>,
    pub description: Option<String>,
    /// Provenance: the token set file this token was loaded from.
    pub file_path: String,
}

impl Token {
    /// Create a token whose name defaults to the hyphen-joined path.
    pub fn new(path: Vec<String>, value: TokenValue, file_path: impl Into<String>) -> Self {
        let name = path.join("-");
        Self {
            path,
            name,
            token_type: None,
            value,
            original: None,
            description: None,
            file_path: file_path.into(),
        }
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn with_original(mut self, original: Value) -> Self {
        self.original = Some(original);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the token's type tag.
    pub fn is_type(&self, token_type: &str) -> bool {
        self.token_type.as_deref() == Some(token_type)
    }

    /// The original value when it was written as a string.
    pub fn original_str(&self) -> Option<&str> {
        self.original.as_ref().and_then(Value::as_str)
    }

    /// Dot-joined path, the form aliases use.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Read a composite sub-field as text. Empty strings count as absent.
fn field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
