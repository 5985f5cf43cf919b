//! Value to JSON text.

use std::io;

use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::decode::MAX_DEPTH;
use crate::error::CodecError;
use crate::value::Value;

/// Serialize a value to compact JSON text.
///
/// Numbers are written exactly as stored. Object keys come out in map order.
/// Nesting deeper than [`MAX_DEPTH`] fails with [`CodecError::DepthLimit`],
/// so everything encoded here decodes again.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    let mut out = Vec::with_capacity(128);
    encode_to_writer(&mut out, value)?;
    into_string(out)
}

/// Serialize a value to JSON indented by two spaces.
pub fn encode_pretty(value: &Value) -> Result<String, CodecError> {
    let mut out = Vec::with_capacity(128);
    write_value(&mut out, &mut PrettyFormatter::with_indent(b"  "), value, 0)?;
    into_string(out)
}

/// Serialize a value as compact JSON into `writer`.
pub fn encode_to_writer<W: io::Write>(writer: &mut W, value: &Value) -> Result<(), CodecError> {
    write_value(writer, &mut CompactFormatter, value, 0)
}

fn into_string(out: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(out)
        .map_err(|err| CodecError::Encode(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn write_value<W, F>(
    writer: &mut W,
    formatter: &mut F,
    value: &Value,
    depth: usize,
) -> Result<(), CodecError>
where
    W: io::Write,
    F: Formatter,
{
    if matches!(value, Value::Array(_) | Value::Object(_)) && depth >= MAX_DEPTH {
        return Err(CodecError::DepthLimit(MAX_DEPTH));
    }
    match value {
        Value::Null => formatter.write_null(writer)?,
        Value::Boolean(flag) => formatter.write_bool(writer, *flag)?,
        Value::Numeric(number) => formatter.write_number_str(writer, number.as_str())?,
        Value::String(text) => write_str(writer, text)?,
        Value::Array(items) => {
            formatter.begin_array(writer)?;
            for (index, item) in items.iter().enumerate() {
                formatter.begin_array_value(writer, index == 0)?;
                write_value(writer, formatter, item, depth + 1)?;
                formatter.end_array_value(writer)?;
            }
            formatter.end_array(writer)?;
        }
        Value::Object(map) => {
            formatter.begin_object(writer)?;
            for (index, (key, item)) in map.iter().enumerate() {
                formatter.begin_object_key(writer, index == 0)?;
                write_str(writer, key)?;
                formatter.end_object_key(writer)?;
                formatter.begin_object_value(writer)?;
                write_value(writer, formatter, item, depth + 1)?;
                formatter.end_object_value(writer)?;
            }
            formatter.end_object(writer)?;
        }
    }
    Ok(())
}

fn write_str<W: io::Write>(writer: &mut W, text: &str) -> io::Result<()> {
    serde_json::to_writer(writer, text).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::value::Map;

    fn nested_arrays(levels: usize) -> Value {
        let mut value = Value::Null;
        for _ in 0..levels {
            value = Value::from(vec![value]);
        }
        value
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&Value::Null).unwrap(), "null");
        assert_eq!(encode(&Value::from(true)).unwrap(), "true");
        assert_eq!(encode(&Value::from(false)).unwrap(), "false");
        assert_eq!(encode(&Value::from(-17i64)).unwrap(), "-17");
        assert_eq!(encode(&Value::from("vol1")).unwrap(), "\"vol1\"");
    }

    #[test]
    fn numbers_are_emitted_verbatim() {
        for text in ["1E+2", "0.10", "-0", "123456789012345678901234567890.5"] {
            let value = Value::numeric(text).unwrap();
            assert_eq!(encode(&value).unwrap(), text);
        }
    }

    #[test]
    fn strings_are_escaped() {
        let value = Value::from("quote \" slash \\ nl \n tab \t bell \u{7} é");
        assert_eq!(
            encode(&value).unwrap(),
            r#""quote \" slash \\ nl \n tab \t bell \u0007 é""#
        );
    }

    #[test]
    fn nested_structures() {
        let value: Value = [
            ("method", Value::from("volumes")),
            ("id", Value::from(1i32)),
            (
                "params",
                Value::from_iter([
                    ("flags", Value::from(0i32)),
                    ("search", Value::Null),
                ]),
            ),
            (
                "list",
                Value::from(vec![Value::from(1i32), Value::object(), Value::from(Vec::<Value>::new())]),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            encode(&value).unwrap(),
            r#"{"id":1,"list":[1,{},[]],"method":"volumes","params":{"flags":0,"search":null}}"#
        );
    }

    #[test]
    fn escaped_keys() {
        let mut map = Map::new();
        map.insert("a\"b".to_string(), Value::Null);
        assert_eq!(encode(&Value::from(map)).unwrap(), r#"{"a\"b":null}"#);
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let value = Value::from_iter([("result", Value::from(vec![Value::from(1i32)]))]);
        assert_eq!(
            encode_pretty(&value).unwrap(),
            "{\n  \"result\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn writer_output_matches_string_output() {
        let value = Value::from_iter([("id", Value::from("v1"))]);
        let mut out = Vec::new();
        encode_to_writer(&mut out, &value).unwrap();
        assert_eq!(out, encode(&value).unwrap().into_bytes());
    }

    #[test]
    fn deepest_decodable_tree_roundtrips() {
        let value = nested_arrays(MAX_DEPTH);
        let text = encode(&value).unwrap();
        assert_eq!(text.len(), MAX_DEPTH * 2 + "null".len());
        assert_eq!(decode(&text).unwrap(), value);
    }

    #[test]
    fn nesting_beyond_decoder_limit_is_refused() {
        let too_deep = nested_arrays(MAX_DEPTH + 1);
        assert!(matches!(encode(&too_deep), Err(CodecError::DepthLimit(MAX_DEPTH))));
        assert!(matches!(encode_pretty(&too_deep), Err(CodecError::DepthLimit(MAX_DEPTH))));

        let mut out = Vec::new();
        let mut map = Map::new();
        map.insert("deep".to_string(), nested_arrays(MAX_DEPTH));
        assert!(matches!(
            encode_to_writer(&mut out, &Value::from(map)),
            Err(CodecError::DepthLimit(MAX_DEPTH))
        ));
    }
}
