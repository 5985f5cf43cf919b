use std::path::Path;

use lsmipc_frame::{FrameConfig, FrameError, Transport};
use lsmipc_transport::UnixDomainSocket;
use tracing::debug;

use crate::error::{Result, RpcError};
use crate::ipc::Ipc;

/// Serving side of a plugin socket: accepts client channels.
pub struct IpcListener {
    socket: UnixDomainSocket,
    config: FrameConfig,
}

impl IpcListener {
    /// Bind to a Unix domain socket path.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let socket = UnixDomainSocket::bind(path)
            .map_err(|err| RpcError::communication("bind plugin socket")(FrameError::from(err)))?;
        Ok(Self {
            socket,
            config: FrameConfig::default(),
        })
    }

    /// Override the framing configuration applied to accepted channels.
    pub fn with_config(mut self, config: FrameConfig) -> Self {
        self.config = config;
        self
    }

    /// Accept the next client (blocking).
    pub fn accept(&self) -> Result<Ipc> {
        let stream = self
            .socket
            .accept()
            .map_err(|err| RpcError::communication("accept client")(FrameError::from(err)))?;
        match stream.peer_credentials() {
            Some((uid, gid, pid)) => debug!(uid, gid, pid, "client connected"),
            None => debug!("client connected"),
        }
        let transport = Transport::from_ipc_stream(stream, self.config.clone())
            .map_err(RpcError::communication("configure client stream"))?;
        Ok(Ipc::new(transport))
    }

    /// Bound socket path.
    pub fn path(&self) -> &Path {
        self.socket.path()
    }
}
