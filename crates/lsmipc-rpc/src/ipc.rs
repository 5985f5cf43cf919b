use std::io::{Read, Write};
#[cfg(unix)]
use std::path::Path;

use lsmipc_frame::{FrameConfig, Transport};
use lsmipc_transport::IpcStream;
use lsmipc_value::{decode, encode, Value};
use tracing::{debug, warn};

use crate::envelope::{
    error_envelope, request_envelope, response_envelope, Request, RequestId, Response,
};
use crate::error::{Result, RpcError};

/// One RPC channel to a plugin.
///
/// Calls are strictly sequential: `call` blocks until the matching response
/// frame arrives or the exchange fails, and every method takes `&mut self`.
/// Share a channel between threads behind a `Mutex`. There is no timeout at
/// this layer; bound waits with the read/write timeouts in [`FrameConfig`].
#[derive(Debug)]
pub struct Ipc<S = IpcStream> {
    transport: Transport<S>,
}

#[cfg(unix)]
impl Ipc<IpcStream> {
    /// Connect to a plugin socket.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with_config(path, FrameConfig::default())
    }

    /// Connect to a plugin socket with explicit framing configuration.
    pub fn connect_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let path = path.as_ref();
        let transport = Transport::connect_with_config(path, config)
            .map_err(RpcError::communication("connect to plugin socket"))?;
        debug!(?path, "rpc channel open");
        Ok(Self::new(transport))
    }
}

impl<S> Ipc<S> {
    /// Use an existing transport.
    pub fn new(transport: Transport<S>) -> Self {
        Self { transport }
    }

    /// Wrap a connected stream with default framing configuration.
    pub fn from_stream(stream: S) -> Self {
        Self::new(Transport::new(stream))
    }

    /// Close the channel. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.transport
            .close()
            .map_err(RpcError::communication("close transport"))
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn transport(&self) -> &Transport<S> {
        &self.transport
    }
}

impl<S: Read + Write> Ipc<S> {
    /// Send `{"method", "id", "params"}`.
    pub fn send_request(&mut self, method: &str, params: Value, id: RequestId) -> Result<()> {
        debug!(method, id, "sending request");
        self.send_envelope(&request_envelope(method, params, id), "send request")
    }

    /// Receive the next envelope without checking its shape.
    pub fn read_request(&mut self) -> Result<Value> {
        let text = self
            .transport
            .receive_message()
            .map_err(RpcError::communication("receive message"))?;
        Ok(decode(&text)?)
    }

    /// Receive the next request and check its shape.
    pub fn read_call(&mut self) -> Result<Request> {
        let request = Request::from_envelope(self.read_request()?)?;
        debug!(method = %request.method, id = request.id, "request received");
        Ok(request)
    }

    /// Send `{"id", "result"}`.
    pub fn send_response(&mut self, result: Value, id: RequestId) -> Result<()> {
        self.send_envelope(&response_envelope(result, id), "send response")
    }

    /// Send an error envelope in place of a result.
    pub fn send_error(
        &mut self,
        id: Option<RequestId>,
        code: i32,
        message: &str,
        data: Option<Value>,
    ) -> Result<()> {
        debug!(?id, code, "sending error: {message}");
        self.send_envelope(&error_envelope(id, code, message, data), "send error")
    }

    /// Receive a response and return its `result`.
    ///
    /// An error envelope comes back as [`RpcError::Remote`].
    pub fn read_response(&mut self) -> Result<Value> {
        Ok(Response::from_envelope(self.read_request()?)?.result)
    }

    /// Send a request and block until its response arrives.
    ///
    /// A transport failure closes the channel, so a late reply is never
    /// taken as the answer to a later call. A response carrying another id
    /// is an [`RpcError::Protocol`] and also closes the channel.
    pub fn call(&mut self, method: &str, params: Value, id: RequestId) -> Result<Value> {
        self.send_request(method, params, id)?;
        let response = Response::from_envelope(self.read_request()?).inspect_err(|err| {
            debug!(method, id, error = %err, "call failed");
        })?;
        if response.id != Some(id) {
            warn!(method, id, response_id = ?response.id, "response id does not match request");
            let _ = self.transport.close();
            return Err(RpcError::Protocol(format!(
                "response id {:?} does not match request id {id}",
                response.id
            )));
        }
        debug!(method, id, "call completed");
        Ok(response.result)
    }

    fn send_envelope(&mut self, envelope: &Value, context: &'static str) -> Result<()> {
        let text = encode(envelope)?;
        self.transport
            .send_message(&text)
            .map_err(RpcError::communication(context))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::net::UnixStream;
    use std::thread;
    use std::time::Duration;

    use lsmipc_frame::FrameError;

    use super::*;
    use crate::error::{NO_SUPPORT, PLUGIN_BUG, TRANSPORT_COMMUNICATION, TRANSPORT_SERIALIZATION};

    fn pair() -> (Ipc<UnixStream>, Ipc<UnixStream>) {
        let (left, right) = UnixStream::pair().unwrap();
        (Ipc::from_stream(left), Ipc::from_stream(right))
    }

    #[test]
    fn volumes_call_end_to_end() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut client = Ipc::from_stream(left);

        let plugin = thread::spawn(move || {
            let mut raw = Transport::new(right);
            let request = raw.receive_message().unwrap();
            raw.send_message(r#"{"id":1,"result":[{"id":"v1"}]}"#).unwrap();
            request
        });

        let volumes = client.call("volumes", Value::object(), 1).unwrap();
        let volumes = volumes.as_array().unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].get("id").unwrap().as_str().unwrap(), "v1");

        assert_eq!(
            plugin.join().unwrap(),
            r#"{"id":1,"method":"volumes","params":{}}"#
        );
    }

    #[test]
    fn serving_side_roundtrip() {
        let (mut client, mut server) = pair();

        let plugin = thread::spawn(move || {
            let request = server.read_call().unwrap();
            assert_eq!(request.method, "pools");
            let flags = request.params.get("flags").unwrap().as_u64().unwrap();
            server
                .send_response(Value::from_iter([("flags", Value::from(flags))]), request.id)
                .unwrap();
        });

        let params = Value::from_iter([("flags", Value::from(8u64))]);
        let result = client.call("pools", params, 42).unwrap();
        assert_eq!(result.get("flags").unwrap().as_u64().unwrap(), 8);
        plugin.join().unwrap();
    }

    #[test]
    fn remote_error_is_relayed() {
        let (mut client, mut server) = pair();

        let plugin = thread::spawn(move || {
            let request = server.read_call().unwrap();
            server
                .send_error(
                    Some(request.id),
                    5,
                    "no such volume",
                    Some(Value::from("volume id vol9")),
                )
                .unwrap();
        });

        let err = client
            .call("volume_delete", Value::from_iter([("id", "vol9")]), 7)
            .unwrap_err();
        assert_eq!(err.code(), 5);
        match err {
            RpcError::Remote { message, data, .. } => {
                assert_eq!(message, "no such volume");
                assert_eq!(data, Some(Value::from("volume id vol9")));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        plugin.join().unwrap();
    }

    #[test]
    fn malformed_reply_is_a_serialization_error() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut client = Ipc::from_stream(left);

        let plugin = thread::spawn(move || {
            let mut raw = Transport::new(right);
            raw.receive_message().unwrap();
            raw.send_message(r#"{"id":1,"result":"#).unwrap();
        });

        let err = client.call("systems", Value::Null, 1).unwrap_err();
        assert!(matches!(err, RpcError::Codec(_)));
        assert_eq!(err.code(), TRANSPORT_SERIALIZATION);
        plugin.join().unwrap();
    }

    #[test]
    fn envelope_violation_is_a_plugin_bug() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut client = Ipc::from_stream(left);

        let plugin = thread::spawn(move || {
            let mut raw = Transport::new(right);
            raw.receive_message().unwrap();
            raw.send_message(r#"{"id":1}"#).unwrap();
        });

        let err = client.call("systems", Value::Null, 1).unwrap_err();
        assert_eq!(err.code(), PLUGIN_BUG);
        plugin.join().unwrap();
    }

    #[test]
    fn mismatched_response_id_is_a_plugin_bug() {
        let (mut client, mut server) = pair();

        let plugin = thread::spawn(move || {
            let request = server.read_call().unwrap();
            server.send_response(Value::from(true), request.id + 1).unwrap();
        });

        let err = client.call("plugin_register", Value::Null, 3).unwrap_err();
        assert!(matches!(err, RpcError::Protocol(ref msg) if msg.contains("request id 3")));
        assert_eq!(err.code(), PLUGIN_BUG);
        assert!(!client.is_open());
        plugin.join().unwrap();
    }

    #[test]
    fn response_without_id_is_rejected() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut client = Ipc::from_stream(left);

        let plugin = thread::spawn(move || {
            let mut raw = Transport::new(right);
            raw.receive_message().unwrap();
            raw.send_message(r#"{"id":null,"result":"ok"}"#).unwrap();
        });

        let err = client.call("time_out_get", Value::object(), 5).unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
        plugin.join().unwrap();
    }

    #[test]
    fn timed_out_call_does_not_leak_into_next_call() {
        let (left, right) = UnixStream::pair().unwrap();
        let config = FrameConfig {
            read_timeout: Some(Duration::from_millis(50)),
            ..FrameConfig::default()
        };
        let mut client = Ipc::new(
            Transport::from_ipc_stream(IpcStream::from_unix(left), config).unwrap(),
        );

        let plugin = thread::spawn(move || {
            let mut server = Ipc::from_stream(IpcStream::from_unix(right));
            let request = server.read_call().unwrap();
            thread::sleep(Duration::from_millis(200));
            // The client may already be gone; only the attempt matters.
            let _ = server.send_response(Value::from("result-of-list"), request.id);
        });

        let err = client.call("list", Value::object(), 1).unwrap_err();
        assert!(matches!(
            err,
            RpcError::Communication {
                source: FrameError::Io(_),
                ..
            }
        ));
        assert!(!client.is_open());

        thread::sleep(Duration::from_millis(250));
        let second = client.call("list", Value::object(), 2);
        assert!(matches!(
            second,
            Err(RpcError::Communication {
                source: FrameError::Closed,
                ..
            })
        ));
        plugin.join().unwrap();
    }

    #[test]
    fn remote_error_leaves_channel_usable() {
        let (mut client, mut server) = pair();

        let plugin = thread::spawn(move || {
            let first = server.read_call().unwrap();
            server
                .send_error(Some(first.id), NO_SUPPORT, "not supported", None)
                .unwrap();
            let second = server.read_call().unwrap();
            server.send_response(Value::from(second.id), second.id).unwrap();
        });

        let err = client.call("volume_raid_info", Value::object(), 1).unwrap_err();
        assert_eq!(err.code(), NO_SUPPORT);
        assert!(client.is_open());
        assert_eq!(client.call("volumes", Value::object(), 2).unwrap().as_i32().unwrap(), 2);
        plugin.join().unwrap();
    }

    #[test]
    fn vanished_plugin_is_a_communication_error() {
        let (left, right) = UnixStream::pair().unwrap();
        drop(right);
        let mut client = Ipc::from_stream(IpcStream::from_unix(left));

        let err = client.call("volumes", Value::object(), 1).unwrap_err();
        assert!(matches!(err, RpcError::Communication { .. }));
        assert_eq!(err.code(), TRANSPORT_COMMUNICATION);
    }

    #[test]
    fn read_after_peer_close() {
        let (mut client, mut server) = pair();
        client.close().unwrap();

        assert!(matches!(
            server.read_request(),
            Err(RpcError::Communication {
                source: FrameError::ConnectionClosed,
                ..
            })
        ));
    }

    #[test]
    fn closed_channel() {
        let (mut client, _server) = pair();
        client.close().unwrap();
        client.close().unwrap();
        assert!(!client.is_open());
        assert!(matches!(
            client.call("volumes", Value::object(), 1),
            Err(RpcError::Communication {
                source: FrameError::Closed,
                ..
            })
        ));
    }

    #[test]
    fn connect_to_missing_socket() {
        let path = std::env::temp_dir().join(format!("lsmipc-rpc-missing-{}.sock", std::process::id()));
        let err = Ipc::connect(&path).unwrap_err();
        assert_eq!(err.code(), TRANSPORT_COMMUNICATION);
        assert!(err.raw_os_error().is_some());
    }
}
