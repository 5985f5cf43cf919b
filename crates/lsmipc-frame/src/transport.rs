use std::io::{Read, Write};
use std::path::Path;

use bytes::BytesMut;
use lsmipc_transport::IpcStream;
#[cfg(unix)]
use lsmipc_transport::UnixDomainSocket;
use tracing::{debug, warn};

use crate::codec::FrameConfig;
use crate::error::{FrameError, Result};
use crate::reader::read_message;
use crate::writer::write_message;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Framed message exchange over one exclusively owned, connected stream.
///
/// The stream is released by [`Transport::close`] or when the transport is
/// dropped, whichever comes first. Every operation after `close` fails with
/// [`FrameError::Closed`].
pub struct Transport<S = IpcStream> {
    stream: Option<S>,
    buf: BytesMut,
    config: FrameConfig,
}

#[cfg(unix)]
impl Transport<IpcStream> {
    /// Connect to a plugin socket with default configuration.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with_config(path, FrameConfig::default())
    }

    /// Connect to a plugin socket and apply the configured timeouts.
    pub fn connect_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let stream = UnixDomainSocket::connect(path)?;
        Self::from_ipc_stream(stream, config)
    }

    /// Wrap an already connected socket and apply the configured timeouts.
    pub fn from_ipc_stream(stream: IpcStream, config: FrameConfig) -> Result<Self> {
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(stream, config))
    }
}

impl<S> Transport<S> {
    /// Create a transport over any connected stream with default configuration.
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, FrameConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// Timeouts in `config` are not applied to arbitrary streams; use
    /// [`Transport::from_ipc_stream`] for sockets.
    pub fn with_config(stream: S, config: FrameConfig) -> Self {
        Self {
            stream: Some(stream),
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Release the stream. Closing an already closed transport is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            debug!("transport closed");
        }
        Ok(())
    }

    /// Whether the transport still owns its stream.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Borrow the underlying stream, if still open.
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    /// Current transport configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<S: Read + Write> Transport<S> {
    /// Send `text` as one frame.
    ///
    /// Empty text is rejected with [`FrameError::EmptyMessage`] before any I/O.
    /// A failure once bytes may have reached the stream closes the transport;
    /// later calls fail with [`FrameError::Closed`].
    pub fn send_message(&mut self, text: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(FrameError::Closed)?;
        match write_message(stream, &mut self.buf, text.as_bytes()) {
            Err(err @ (FrameError::EmptyMessage | FrameError::PayloadTooLarge { .. })) => Err(err),
            Err(err) => Err(self.abandon(err)),
            Ok(()) => Ok(()),
        }
    }

    /// Receive the next frame as text (blocking).
    ///
    /// Any read failure, including a timeout, leaves the stream at an unknown
    /// frame boundary and closes the transport. A complete frame that is not
    /// UTF-8 is consumed and the transport stays open.
    pub fn receive_message(&mut self) -> Result<String> {
        let stream = self.stream.as_mut().ok_or(FrameError::Closed)?;
        let payload = match read_message(stream, self.config.max_payload_size) {
            Ok(payload) => payload,
            Err(err) => return Err(self.abandon(err)),
        };
        Ok(String::from_utf8(payload)?)
    }

    fn abandon(&mut self, err: FrameError) -> FrameError {
        if self.stream.take().is_some() {
            warn!(error = %err, "transport closed after failed exchange");
        }
        err
    }
}

impl<S> Drop for Transport<S> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl<S> std::fmt::Debug for Transport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("open", &self.is_open())
            .field("config", &self.config)
            .finish()
    }
}
