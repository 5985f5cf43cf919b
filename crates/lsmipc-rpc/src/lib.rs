//! Synchronous request/response RPC for storage plugins.
//!
//! An [`Ipc`] channel wraps one framed transport. A client builds a
//! [`Value`](lsmipc_value::Value) of parameters and invokes [`Ipc::call`],
//! which sends a request envelope and blocks until the response envelope
//! comes back. A response carries either a `result` or an `error` object;
//! errors reported by the plugin surface as [`RpcError::Remote`] with the
//! plugin's code and message intact.

pub mod envelope;
pub mod error;
pub mod ipc;
#[cfg(unix)]
pub mod listener;

pub use envelope::{Request, RequestId, Response};
pub use error::{
    Result, RpcError, LIB_BUG, NO_SUPPORT, PLUGIN_BUG, TRANSPORT_COMMUNICATION,
    TRANSPORT_INVALID_ARG, TRANSPORT_SERIALIZATION,
};
pub use ipc::Ipc;
#[cfg(unix)]
pub use listener::IpcListener;
