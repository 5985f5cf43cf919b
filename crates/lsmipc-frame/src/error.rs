use lsmipc_transport::TransportError;

/// Errors that can occur while framing messages on a plugin socket.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Empty messages are never put on the wire.
    #[error("refusing to send an empty message")]
    EmptyMessage,

    /// The payload does not fit the header or exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: u64 },

    /// The length header is not all ASCII decimal digits.
    #[error("invalid frame header {0:?}")]
    InvalidHeader(String),

    /// The payload is not valid UTF-8 text.
    #[error("frame payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Establishing the underlying socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The peer closed the connection before a complete frame was exchanged.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// The transport was already closed locally.
    #[error("transport is closed")]
    Closed,
}

impl FrameError {
    /// The operating system error code behind this failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            FrameError::Io(err) => err.raw_os_error(),
            FrameError::Transport(err) => err.raw_os_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
