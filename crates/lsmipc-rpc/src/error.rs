use lsmipc_frame::FrameError;
use lsmipc_value::{CodecError, Value};

/// Internal library failure.
pub const LIB_BUG: i32 = 1;
/// The plugin broke the protocol contract.
pub const PLUGIN_BUG: i32 = 2;
/// The plugin does not implement the requested method.
pub const NO_SUPPORT: i32 = 153;
/// A frame could not be sent or received.
pub const TRANSPORT_COMMUNICATION: i32 = 400;
/// A message could not be encoded or decoded.
pub const TRANSPORT_SERIALIZATION: i32 = 401;
/// The transport was handed an invalid argument.
pub const TRANSPORT_INVALID_ARG: i32 = 402;

/// Errors that can occur during an RPC exchange.
///
/// Local value-shape errors are a separate family
/// ([`ValueError`](lsmipc_value::ValueError)); everything here means the call
/// itself failed.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// A frame could not be sent or received.
    #[error("{context}: {source}")]
    Communication {
        context: &'static str,
        #[source]
        source: FrameError,
    },

    /// Encoding the outgoing message or decoding the incoming one failed.
    #[error("serialization error: {0}")]
    Codec(#[from] CodecError),

    /// A decoded envelope does not have the shape the protocol requires.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The peer answered with an error envelope.
    #[error("remote error {code}: {message}")]
    Remote {
        code: i32,
        message: String,
        data: Option<Value>,
    },
}

impl RpcError {
    pub(crate) fn communication(context: &'static str) -> impl FnOnce(FrameError) -> Self {
        move |source| RpcError::Communication { context, source }
    }

    /// Numeric error code: the peer's own code for [`RpcError::Remote`],
    /// otherwise the matching libStorageMgmt error number.
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Communication {
                source: FrameError::EmptyMessage | FrameError::PayloadTooLarge { .. },
                ..
            } => TRANSPORT_INVALID_ARG,
            RpcError::Communication { .. } => TRANSPORT_COMMUNICATION,
            RpcError::Codec(_) => TRANSPORT_SERIALIZATION,
            RpcError::Protocol(_) => PLUGIN_BUG,
            RpcError::Remote { code, .. } => *code,
        }
    }

    /// The operating system error code behind a communication failure.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            RpcError::Communication { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn codes() {
        let comm = RpcError::communication("send request")(FrameError::Io(
            io::Error::from_raw_os_error(32),
        ));
        assert_eq!(comm.code(), TRANSPORT_COMMUNICATION);
        assert_eq!(comm.raw_os_error(), Some(32));
        assert!(comm.to_string().starts_with("send request: "));

        let empty = RpcError::communication("send request")(FrameError::EmptyMessage);
        assert_eq!(empty.code(), TRANSPORT_INVALID_ARG);
        assert_eq!(empty.raw_os_error(), None);

        let codec = RpcError::from(CodecError::DepthLimit(128));
        assert_eq!(codec.code(), TRANSPORT_SERIALIZATION);

        assert_eq!(RpcError::Protocol("x".into()).code(), PLUGIN_BUG);

        let remote = RpcError::Remote {
            code: 5,
            message: "no such volume".into(),
            data: None,
        };
        assert_eq!(remote.code(), 5);
        assert_eq!(remote.to_string(), "remote error 5: no such volume");
    }
}
