use std::collections::VecDeque;

use crate::decode::tokenizer::ParseEvent;
use crate::error::CodecError;
use crate::number::Number;
use crate::value::{Map, Value};

/// Rebuild one value from the front of `events`.
///
/// The queue must hold exactly one well-bracketed value. An empty queue
/// decodes to [`Value::Null`].
pub(crate) fn build_tree(events: &mut VecDeque<ParseEvent>) -> Result<Value, CodecError> {
    if events.is_empty() {
        return Ok(Value::Null);
    }
    let value = build_next(events)?;
    if let Some(extra) = events.front() {
        return Err(structure(format!(
            "unexpected {} after a complete value",
            extra.name()
        )));
    }
    Ok(value)
}

fn build_next(events: &mut VecDeque<ParseEvent>) -> Result<Value, CodecError> {
    let event = events
        .pop_front()
        .ok_or_else(|| structure("event stream ended where a value was expected"))?;

    match event {
        ParseEvent::Null => Ok(Value::Null),
        ParseEvent::Boolean(flag) => Ok(Value::Boolean(flag)),
        ParseEvent::String(text) => Ok(Value::String(text)),
        ParseEvent::Number(text) => match text.parse::<Number>() {
            Ok(number) => Ok(Value::Numeric(number)),
            Err(_) => Err(structure(format!("invalid number text {text:?}"))),
        },
        ParseEvent::BeginArray => build_array(events),
        ParseEvent::BeginMap => build_object(events),
        other @ (ParseEvent::EndArray | ParseEvent::EndMap | ParseEvent::MapKey(_)) => {
            Err(structure(format!(
                "unexpected {} where a value was expected",
                other.name()
            )))
        }
    }
}

fn build_array(events: &mut VecDeque<ParseEvent>) -> Result<Value, CodecError> {
    let mut items = Vec::new();
    loop {
        match events.front() {
            Some(ParseEvent::EndArray) => {
                events.pop_front();
                return Ok(Value::Array(items));
            }
            Some(_) => items.push(build_next(events)?),
            None => return Err(structure("event stream ended inside an array")),
        }
    }
}

fn build_object(events: &mut VecDeque<ParseEvent>) -> Result<Value, CodecError> {
    let mut map = Map::new();
    loop {
        match events.pop_front() {
            Some(ParseEvent::EndMap) => return Ok(Value::Object(map)),
            Some(ParseEvent::MapKey(key)) => {
                let value = build_next(events)?;
                map.insert(key, value);
            }
            Some(other) => {
                return Err(structure(format!(
                    "expected map-key or end-map, found {}",
                    other.name()
                )))
            }
            None => return Err(structure("event stream ended inside an object")),
        }
    }
}

fn structure(reason: impl Into<String>) -> CodecError {
    CodecError::Structure(reason.into())
}

#[cfg(test)]
mod tests {
    use super::ParseEvent::*;
    use super::*;

    fn build(events: Vec<ParseEvent>) -> Result<Value, CodecError> {
        build_tree(&mut events.into())
    }

    fn assert_structure_error(events: Vec<ParseEvent>) {
        match build(events.clone()) {
            Err(CodecError::Structure(_)) => {}
            other => panic!("expected structural error for {events:?}, got {other:?}"),
        }
    }

    #[test]
    fn scalars() {
        assert_eq!(build(vec![Null]).unwrap(), Value::Null);
        assert_eq!(build(vec![Boolean(false)]).unwrap(), Value::from(false));
        assert_eq!(build(vec![String("x".into())]).unwrap(), Value::from("x"));
        assert_eq!(
            build(vec![Number("-2.5e3".into())]).unwrap(),
            Value::numeric("-2.5e3").unwrap()
        );
    }

    #[test]
    fn empty_queue_is_null() {
        assert_eq!(build(Vec::new()).unwrap(), Value::Null);
    }

    #[test]
    fn nested_structure_from_brackets() {
        let value = build(vec![
            BeginMap,
            MapKey("id".into()),
            Number("1".into()),
            MapKey("result".into()),
            BeginArray,
            BeginMap,
            MapKey("id".into()),
            String("v1".into()),
            EndMap,
            BeginArray,
            EndArray,
            EndArray,
            EndMap,
        ])
        .unwrap();

        assert_eq!(value.get("id").unwrap().as_i32().unwrap(), 1);
        let result = value.get("result").unwrap().as_array().unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].get("id").unwrap().as_str().unwrap(), "v1");
        assert!(result[1].as_array().unwrap().is_empty());
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let value = build(vec![
            BeginMap,
            MapKey("k".into()),
            Number("1".into()),
            MapKey("k".into()),
            Number("2".into()),
            EndMap,
        ])
        .unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(value.get("k").unwrap().as_i32().unwrap(), 2);
    }

    #[test]
    fn closing_or_key_event_where_value_expected() {
        assert_structure_error(vec![EndMap]);
        assert_structure_error(vec![EndArray]);
        assert_structure_error(vec![MapKey("id".into()), Null]);
        assert_structure_error(vec![BeginArray, EndMap]);
        assert_structure_error(vec![BeginMap, MapKey("a".into()), EndMap]);
    }

    #[test]
    fn object_entries_need_keys() {
        assert_structure_error(vec![BeginMap, Null, EndMap]);
        assert_structure_error(vec![BeginMap, EndArray]);
    }

    #[test]
    fn unterminated_containers() {
        assert_structure_error(vec![BeginArray, Null]);
        assert_structure_error(vec![BeginMap, MapKey("a".into()), Null]);
        assert_structure_error(vec![BeginMap, MapKey("a".into())]);
    }

    #[test]
    fn leftover_events() {
        assert_structure_error(vec![Null, Null]);
        assert_structure_error(vec![BeginArray, EndArray, EndArray]);
    }

    #[test]
    fn bad_number_text() {
        assert_structure_error(vec![Number("1e".into())]);
        assert_structure_error(vec![Number("NaN".into())]);
    }
}
