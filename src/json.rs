//! Schema-directed bridge between JSON and codec values.
//!
//! JSON alone cannot say whether `"0x12"` is bytes or an address, or
//! whether `42` is an integer or a decimal, so conversion is driven by the
//! type node. The crate enables serde_json's `arbitrary_precision` feature:
//! numeric literals keep their source text, which is what lets 80-digit
//! decimals and 256-bit integers cross the CLI boundary exactly.

use num_bigint::BigInt;
use serde_json::Value as Json;

use crate::ast::TypeNode;
use crate::error::{EncodeError, EncodeErrorKind};
use crate::value::{Decimal, Value};

/// Convert a JSON value into a codec [`Value`] shaped by `node`.
pub fn value_from_json(node: &TypeNode, json: &Json) -> Result<Value, EncodeError> {
    match node {
        TypeNode::Address => match json {
            // left as a string; the validator applies the address rules
            Json::String(s) => Ok(Value::String(s.clone())),
            _ => Err(mismatch("address string")),
        },
        TypeNode::Bool => json.as_bool().map(Value::Bool).ok_or_else(|| mismatch("bool")),
        TypeNode::Integer { .. } => match json {
            Json::Number(n) => n
                .to_string()
                .parse::<BigInt>()
                .map(Value::Int)
                .map_err(|_| mismatch("integer")),
            _ => Err(mismatch("integer")),
        },
        TypeNode::Fixed { .. } => match json {
            Json::Number(n) => n
                .to_string()
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| mismatch("decimal")),
            _ => Err(mismatch("decimal")),
        },
        TypeNode::Bytes(_) | TypeNode::DynamicBytes => match json {
            Json::String(s) => {
                let h = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                hex::decode(h)
                    .map(Value::Bytes)
                    .map_err(|_| mismatch("hex string"))
            }
            _ => Err(mismatch("hex string")),
        },
        TypeNode::String => match json {
            Json::String(s) => Ok(Value::String(s.clone())),
            _ => Err(mismatch("string")),
        },
        TypeNode::Array(inner, _) | TypeNode::DynamicArray(inner) => {
            let items = json.as_array().ok_or_else(|| mismatch("array"))?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| value_from_json(inner, item).map_err(|e| e.nest(i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        TypeNode::Tuple(components) => {
            let items = json.as_array().ok_or_else(|| mismatch("array"))?;
            if items.len() != components.len() {
                return Err(EncodeError::new(EncodeErrorKind::LengthMismatch {
                    expected: components.len(),
                    actual: items.len(),
                }));
            }
            let values = components
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (ty, item))| value_from_json(ty, item).map_err(|e| e.nest(i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
    }
}

/// Render a decoded [`Value`] as JSON: numbers for integers and decimals,
/// lowercase `0x` hex strings for bytes and addresses.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Address(a) => Json::String(a.to_string()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number(serde_json::Number::from_string_unchecked(i.to_string())),
        Value::Decimal(d) => {
            Json::Number(serde_json::Number::from_string_unchecked(d.to_string()))
        }
        Value::Bytes(b) => Json::String(format!("0x{}", hex::encode(b))),
        Value::String(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
    }
}

fn mismatch(expected: &'static str) -> EncodeError {
    EncodeError::new(EncodeErrorKind::TypeMismatch { expected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    #[test]
    fn json_numbers_stay_exact() {
        let node = parse_schema("uint256").expect("parse");
        let json: Json = serde_json::from_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        )
        .expect("json");
        let value = value_from_json(&node, &json).expect("convert");
        assert_eq!(value_to_json(&value), json);
    }

    #[test]
    fn hex_strings_become_bytes() {
        let node = parse_schema("bytes4").expect("parse");
        let json = Json::String("0x12323458".to_string());
        let value = value_from_json(&node, &json).expect("convert");
        assert_eq!(value.as_bytes(), Some(&[0x12u8, 0x32, 0x34, 0x58][..]));
    }

    #[test]
    fn tuple_arity_is_checked() {
        let node = parse_schema("(bool,bool)").expect("parse");
        let json: Json = serde_json::from_str("[true]").expect("json");
        assert!(value_from_json(&node, &json).is_err());
    }
}
