//! Connected local stream sockets for plugin IPC.
//!
//! This is the lowest layer of lsmipc. It hands out connected [`IpcStream`]s
//! that report broken pipes as errors instead of raising `SIGPIPE`, so a
//! plugin that dies mid-call surfaces as data to the caller.

pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use stream::IpcStream;

#[cfg(unix)]
pub use uds::UnixDomainSocket;
