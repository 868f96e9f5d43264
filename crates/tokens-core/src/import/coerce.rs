//! Literal value coercion

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tokens_schema::{Rgba, Token, TokenType};

use crate::store::VariableValue;

/// Longest numeric prefix of a string, as JavaScript-style `parseFloat` reads it
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// A literal that cannot be represented as its token type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid {token_type}")]
pub struct CoercionError {
    pub token_type: TokenType,
    pub value: Value,
}

/// Convert a non-alias token value into the store representation.
pub fn coerce_literal(token: &Token) -> Result<VariableValue, CoercionError> {
    let value = &token.value;
    let invalid = || CoercionError {
        token_type: token.token_type.clone(),
        value: value.clone(),
    };

    match token.token_type {
        TokenType::Color => Rgba::from_value(value)
            .map(VariableValue::Color)
            .map_err(|_| invalid()),
        TokenType::Dimension | TokenType::Duration | TokenType::Number => {
            parse_float(value).map(VariableValue::Float).ok_or_else(invalid)
        }
        TokenType::Boolean => value
            .as_bool()
            .map(VariableValue::Boolean)
            .ok_or_else(invalid),
        TokenType::String => Ok(VariableValue::String(match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })),
        TokenType::Untyped | TokenType::Other(_) => Err(invalid()),
    }
}

/// Numbers pass through; strings are read up to their first non-numeric
/// character, so `"16px"` is `16.0`.
fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => LEADING_FLOAT
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(TokenType::Number, json!(4), 4.0)]
    #[case(TokenType::Dimension, json!("16px"), 16.0)]
    #[case(TokenType::Duration, json!("0.5s"), 0.5)]
    #[case(TokenType::Dimension, json!(" -2.5rem"), -2.5)]
    #[case(TokenType::Number, json!(".75"), 0.75)]
    #[case(TokenType::Number, json!("1e2"), 100.0)]
    fn test_numeric_coercion(
        #[case] token_type: TokenType,
        #[case] value: Value,
        #[case] expected: f64,
    ) {
        let token = Token::new(token_type, value);
        assert_eq!(coerce_literal(&token), Ok(VariableValue::Float(expected)));
    }

    #[rstest]
    #[case(TokenType::Dimension, json!("px"))]
    #[case(TokenType::Dimension, json!("1e999px"))]
    #[case(TokenType::Number, json!("-1e400"))]
    #[case(TokenType::Number, json!(true))]
    #[case(TokenType::Boolean, json!("true"))]
    #[case(TokenType::Color, json!("not-a-color"))]
    #[case(TokenType::Color, json!(12))]
    fn test_invalid_literals(#[case] token_type: TokenType, #[case] value: Value) {
        let token = Token::new(token_type.clone(), value.clone());
        let err = coerce_literal(&token).unwrap_err();
        assert_eq!(err.token_type, token_type);
        assert_eq!(err.value, value);
    }

    #[test]
    fn test_color_and_boolean() {
        let token = Token::new(TokenType::Color, json!("#ff0000"));
        assert_eq!(
            coerce_literal(&token),
            Ok(VariableValue::Color(Rgba::new(1.0, 0.0, 0.0, 1.0)))
        );

        let token = Token::new(TokenType::Boolean, json!(false));
        assert_eq!(coerce_literal(&token), Ok(VariableValue::Boolean(false)));
    }

    #[test]
    fn test_string_accepts_anything() {
        let token = Token::new(TokenType::String, json!("Inter"));
        assert_eq!(
            coerce_literal(&token),
            Ok(VariableValue::String("Inter".to_string()))
        );

        let token = Token::new(TokenType::String, json!(400));
        assert_eq!(
            coerce_literal(&token),
            Ok(VariableValue::String("400".to_string()))
        );
    }

    #[test]
    fn test_error_message_names_type() {
        let token = Token::new(TokenType::Dimension, json!("wide"));
        assert_eq!(coerce_literal(&token).unwrap_err().to_string(), "Invalid dimension");
    }
}
