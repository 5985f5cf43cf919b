//! Request, response and error envelopes.
//!
//! ```text
//! request:  {"method": "volumes", "id": 1, "params": {...}}
//! success:  {"id": 1, "result": ...}
//! failure:  {"id": 1, "error": {"code": 5, "message": "...", "data": ...}}
//! ```

use lsmipc_value::{Map, Value, ValueError};

use crate::error::{Result, RpcError};

/// Correlation id carried by every envelope.
pub type RequestId = i32;

/// A decoded request envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub id: RequestId,
    pub params: Value,
}

impl Request {
    /// Build the request envelope for this call.
    pub fn to_envelope(&self) -> Value {
        request_envelope(&self.method, self.params.clone(), self.id)
    }

    /// Check a decoded envelope against the request shape.
    ///
    /// `method` and `id` are required; missing `params` reads as null.
    pub fn from_envelope(envelope: Value) -> Result<Self> {
        let mut map = envelope
            .into_object()
            .map_err(|err| violation("request envelope", err))?;

        let method = match map.remove("method") {
            Some(Value::String(method)) => method,
            Some(other) => {
                return Err(RpcError::Protocol(format!(
                    "request method must be a string, found {}",
                    other.tag()
                )))
            }
            None => return Err(RpcError::Protocol("request has no method".into())),
        };
        let id = match map.get("id") {
            Some(id) => id.as_i32().map_err(|err| violation("request id", err))?,
            None => return Err(RpcError::Protocol("request has no id".into())),
        };
        let params = map.remove("params").unwrap_or_default();

        Ok(Self { method, id, params })
    }
}

/// A decoded success envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// `None` when the peer omitted the id or sent null.
    pub id: Option<RequestId>,
    pub result: Value,
}

impl Response {
    /// Enforce the response contract on a decoded envelope.
    ///
    /// Exactly one of `result` and `error` must be present. An error envelope
    /// becomes [`RpcError::Remote`] carrying the peer's code, message and
    /// optional `data`; it must have both `code` and `message`.
    pub fn from_envelope(envelope: Value) -> Result<Self> {
        let mut map = envelope
            .into_object()
            .map_err(|err| violation("response envelope", err))?;

        let id = match map.get("id") {
            None | Some(Value::Null) => None,
            Some(id) => Some(id.as_i32().map_err(|err| violation("response id", err))?),
        };

        match (map.remove("result"), map.remove("error")) {
            (Some(_), Some(_)) => Err(RpcError::Protocol(
                "response has both result and error".into(),
            )),
            (None, None) => Err(RpcError::Protocol(
                "response has neither result nor error".into(),
            )),
            (Some(result), None) => Ok(Self { id, result }),
            (None, Some(error)) => Err(remote_error(error)?),
        }
    }
}

/// `{"method": method, "id": id, "params": params}`
pub fn request_envelope(method: &str, params: Value, id: RequestId) -> Value {
    Value::from_iter([
        ("method", Value::from(method)),
        ("id", Value::from(id)),
        ("params", params),
    ])
}

/// `{"id": id, "result": result}`
pub fn response_envelope(result: Value, id: RequestId) -> Value {
    Value::from_iter([("id", Value::from(id)), ("result", result)])
}

/// `{"id": id, "error": {"code": code, "message": message, "data": data}}`
///
/// `data` is left out when `None`.
pub fn error_envelope(
    id: Option<RequestId>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let mut error = Map::new();
    error.insert("code".into(), Value::from(code));
    error.insert("message".into(), Value::from(message));
    if let Some(data) = data {
        error.insert("data".into(), data);
    }
    Value::from_iter([("id", Value::from(id)), ("error", Value::Object(error))])
}

fn remote_error(error: Value) -> Result<RpcError> {
    let mut error = error
        .into_object()
        .map_err(|err| violation("error object", err))?;

    let code = match error.get("code") {
        Some(code) => code.as_i32().map_err(|err| violation("error code", err))?,
        None => return Err(RpcError::Protocol("error object has no code".into())),
    };
    let message = match error.remove("message") {
        Some(Value::String(message)) => message,
        Some(other) => {
            return Err(RpcError::Protocol(format!(
                "error message must be a string, found {}",
                other.tag()
            )))
        }
        None => return Err(RpcError::Protocol("error object has no message".into())),
    };
    let data = error.remove("data").filter(|data| !data.is_null());

    Ok(RpcError::Remote {
        code,
        message,
        data,
    })
}

fn violation(what: &str, err: ValueError) -> RpcError {
    RpcError::Protocol(format!("malformed {what}: {err}"))
}

#[cfg(test)]
mod tests {
    use lsmipc_value::{decode, encode};

    use super::*;

    fn response(text: &str) -> Result<Response> {
        Response::from_envelope(decode(text).unwrap())
    }

    #[test]
    fn request_envelope_shape() {
        let text = encode(&request_envelope("volumes", Value::object(), 1)).unwrap();
        assert_eq!(text, r#"{"id":1,"method":"volumes","params":{}}"#);
    }

    #[test]
    fn result_only() {
        let response = response(r#"{"id":3,"result":{"name":"vol1"}}"#).unwrap();
        assert_eq!(response.id, Some(3));
        assert_eq!(
            response.result.as_object().unwrap()["name"].as_str().unwrap(),
            "vol1"
        );
    }

    #[test]
    fn null_result_is_a_result() {
        let response = response(r#"{"id":3,"result":null}"#).unwrap();
        assert!(response.result.is_null());
    }

    #[test]
    fn error_only() {
        let err = response(r#"{"id":3,"error":{"code":5,"message":"no such volume"}}"#)
            .unwrap_err();
        match err {
            RpcError::Remote {
                code,
                message,
                data,
            } => {
                assert_eq!(code, 5);
                assert_eq!(message, "no such volume");
                assert!(data.is_none());
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn error_data_is_relayed() {
        let err = response(
            r#"{"id":3,"error":{"code":2,"message":"boom","data":"Traceback: line 7"}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RpcError::Remote { data: Some(Value::String(ref text)), .. } if text == "Traceback: line 7"
        ));
    }

    #[test]
    fn both_or_neither_is_a_violation() {
        assert!(matches!(
            response(r#"{"id":1,"result":1,"error":{"code":5,"message":"x"}}"#),
            Err(RpcError::Protocol(_))
        ));
        assert!(matches!(
            response(r#"{"id":1}"#),
            Err(RpcError::Protocol(_))
        ));
    }

    #[test]
    fn incomplete_error_object_is_a_violation() {
        for text in [
            r#"{"error":{"message":"no code"}}"#,
            r#"{"error":{"code":5}}"#,
            r#"{"error":{"code":"5","message":"x"}}"#,
            r#"{"error":{"code":5,"message":7}}"#,
            r#"{"error":"flat string"}"#,
        ] {
            assert!(
                matches!(response(text), Err(RpcError::Protocol(_))),
                "{text} should be a protocol violation"
            );
        }
    }

    #[test]
    fn non_object_response() {
        assert!(matches!(response("[1]"), Err(RpcError::Protocol(_))));
        assert!(matches!(response("null"), Err(RpcError::Protocol(_))));
    }

    #[test]
    fn missing_or_null_id() {
        assert_eq!(response(r#"{"result":1}"#).unwrap().id, None);
        assert_eq!(response(r#"{"id":null,"result":1}"#).unwrap().id, None);
        assert!(matches!(
            response(r#"{"id":"one","result":1}"#),
            Err(RpcError::Protocol(_))
        ));
    }

    #[test]
    fn request_from_envelope() {
        let request =
            Request::from_envelope(decode(r#"{"method":"pools","id":9,"params":{"flags":0}}"#).unwrap())
                .unwrap();
        assert_eq!(request.method, "pools");
        assert_eq!(request.id, 9);
        assert_eq!(request.params.get("flags").unwrap().as_u64().unwrap(), 0);
        assert_eq!(Request::from_envelope(request.to_envelope()).unwrap(), request);

        let bare = Request::from_envelope(decode(r#"{"method":"time_out_get","id":2}"#).unwrap())
            .unwrap();
        assert!(bare.params.is_null());

        assert!(Request::from_envelope(decode(r#"{"id":2}"#).unwrap()).is_err());
        assert!(Request::from_envelope(decode(r#"{"method":"x"}"#).unwrap()).is_err());
        assert!(Request::from_envelope(decode(r#"{"method":1,"id":2}"#).unwrap()).is_err());
    }

    #[test]
    fn error_envelope_shape() {
        let text = encode(&error_envelope(Some(4), 153, "not supported", None)).unwrap();
        assert_eq!(
            text,
            r#"{"error":{"code":153,"message":"not supported"},"id":4}"#
        );
        let text = encode(&error_envelope(None, 2, "bad", Some(Value::from("trace")))).unwrap();
        assert_eq!(
            text,
            r#"{"error":{"code":2,"data":"trace","message":"bad"},"id":null}"#
        );
    }
}
