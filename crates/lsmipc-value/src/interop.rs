//! Conversions to and from `serde_json::Value`, for callers that already
//! hold serde data or want to deserialize a result into their own types.

use std::str::FromStr;

use crate::error::ValueError;
use crate::number::Number;
use crate::value::{Map, Value};

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Boolean(flag),
            serde_json::Value::Number(number) => Value::Numeric(Number::from_serde(&number)),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect::<Map>(),
            ),
        }
    }
}

/// Fails when a number has no `serde_json::Number` form, e.g. `1E400`.
/// Integers wider than 64 bits become doubles.
impl TryFrom<Value> for serde_json::Value {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(flag) => serde_json::Value::Bool(flag),
            Value::Numeric(number) => serde_json::Number::from_str(number.as_str())
                .map(serde_json::Value::Number)
                .map_err(|_| ValueError::NumericRange {
                    text: number.to_string(),
                    target: "serde_json::Number",
                })?,
            Value::String(text) => serde_json::Value::String(text),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, item)| Ok((key, serde_json::Value::try_from(item)?)))
                    .collect::<Result<_, ValueError>>()?,
            ),
        })
    }
}
