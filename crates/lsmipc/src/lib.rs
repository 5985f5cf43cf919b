//! Transport, value model and RPC layer for libStorageMgmt plugin IPC.
//!
//! A client library talks to out-of-process storage plugins over a local
//! stream socket. Each message is a length-prefixed JSON document; calls are
//! synchronous request/response pairs with structured errors.
//!
//! # Crate Structure
//!
//! - [`transport`]: connected Unix domain sockets that never raise `SIGPIPE`
//! - [`frame`]: fixed-width decimal length framing over a stream
//! - [`value`]: the JSON-shaped [`Value`](value::Value) tree and its codec
//! - [`rpc`]: request/response envelopes, [`Ipc`](rpc::Ipc) channels and errors
//!
//! ```no_run
//! use lsmipc::rpc::Ipc;
//! use lsmipc::value::Value;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ipc = Ipc::connect("/var/run/lsm/ipc/sim")?;
//! let volumes = ipc.call("volumes", Value::object(), 1)?;
//! for volume in volumes.as_array()? {
//!     println!("{}", volume.get("name")?.as_str()?);
//! }
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use lsmipc_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use lsmipc_frame::*;
}

/// Re-export value types.
pub mod value {
    pub use lsmipc_value::*;
}

/// Re-export RPC types.
pub mod rpc {
    pub use lsmipc_rpc::*;
}
