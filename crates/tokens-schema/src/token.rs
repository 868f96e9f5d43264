//! Leaf tokens and their type tags

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::alias::alias_target;

/// Extension namespace holding target-specific token attributes.
pub const TARGET_EXTENSION: &str = "com.figma";

/// Scope value meaning "usable everywhere".
pub const ALL_SCOPES: &str = "ALL_SCOPES";

/// The `$type` tag of a token.
///
/// Only the first six variants map to a target representation; every other
/// DTCG type (composites, font families, cubic beziers, ...) is carried as
/// [`TokenType::Other`] and rejected during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenType {
    Color,
    Dimension,
    Duration,
    Number,
    Boolean,
    String,
    /// Neither the token nor any enclosing group declared a `$type`
    Untyped,
    Other(String),
}

impl TokenType {
    /// The representation a variable of this type uses in the target store.
    pub fn resolved_type(&self) -> Option<ResolvedType> {
        match self {
            Self::Color => Some(ResolvedType::Color),
            Self::Dimension | Self::Duration | Self::Number => Some(ResolvedType::Float),
            Self::Boolean => Some(ResolvedType::Boolean),
            Self::String => Some(ResolvedType::String),
            Self::Untyped | Self::Other(_) => None,
        }
    }

    /// Whether tokens of this type can be imported.
    pub fn is_supported(&self) -> bool {
        self.resolved_type().is_some()
    }
}

impl From<&str> for TokenType {
    fn from(tag: &str) -> Self {
        match tag {
            "color" => Self::Color,
            "dimension" => Self::Dimension,
            "duration" => Self::Duration,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            "" => Self::Untyped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TokenType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<TokenType> for String {
    fn from(token_type: TokenType) -> Self {
        token_type.to_string()
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Dimension => write!(f, "dimension"),
            Self::Duration => write!(f, "duration"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::Untyped => write!(f, "untyped"),
            Self::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// Value representation of a variable in the target store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    Color,
    Float,
    Boolean,
    String,
}

impl ResolvedType {
    /// Scopes only exist on color and numeric variables.
    pub fn supports_scopes(self) -> bool {
        matches!(self, Self::Color | Self::Float)
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "COLOR"),
            Self::Float => write!(f, "FLOAT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::String => write!(f, "STRING"),
        }
    }
}

/// Platforms a variable can carry a code-syntax hint for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeSyntaxPlatform {
    #[serde(rename = "WEB")]
    Web,
    #[serde(rename = "ANDROID")]
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

impl CodeSyntaxPlatform {
    /// All platforms, in the order hints are applied.
    pub const ALL: [CodeSyntaxPlatform; 3] = [Self::Web, Self::Android, Self::Ios];

    /// Key used for this platform inside `codeSyntax`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Web => "WEB",
            Self::Android => "ANDROID",
            Self::Ios => "iOS",
        }
    }
}

/// A leaf token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "$type")]
    pub token_type: TokenType,
    #[serde(rename = "$value")]
    pub value: Value,
    #[serde(rename = "$description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "$extensions", default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl Token {
    /// Create a token with no description or extensions.
    pub fn new(token_type: TokenType, value: Value) -> Self {
        Self {
            token_type,
            value,
            description: None,
            extensions: None,
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name of the token this one aliases, if any.
    pub fn alias_target(&self) -> Option<&str> {
        alias_target(&self.value)
    }

    /// Whether the value is an alias reference
    pub fn is_alias(&self) -> bool {
        self.alias_target().is_some()
    }

    fn target_extension(&self) -> Option<&Map<String, Value>> {
        self.extensions.as_ref()?.get(TARGET_EXTENSION)?.as_object()
    }

    /// Explicit scope list from the target extension.
    ///
    /// Non-string entries are skipped. A present but empty list is returned
    /// as-is: it explicitly hides the variable from every picker.
    pub fn scopes(&self) -> Option<Vec<String>> {
        let scopes = self.target_extension()?.get("scopes")?.as_array()?;
        Some(
            scopes
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Code-syntax hints from the target extension, in platform order.
    pub fn code_syntax(&self) -> Vec<(CodeSyntaxPlatform, String)> {
        let Some(syntax) = self
            .target_extension()
            .and_then(|ext| ext.get("codeSyntax"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        CodeSyntaxPlatform::ALL
            .into_iter()
            .filter_map(|platform| {
                syntax
                    .get(platform.key())
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(|s| (platform, s.to_string()))
            })
            .collect()
    }
}
