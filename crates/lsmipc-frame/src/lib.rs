//! Length-prefixed message framing for plugin IPC.
//!
//! Every message on the wire is:
//! - a [`HDR_LEN`]-digit, zero-padded ASCII decimal payload length
//! - immediately followed by exactly that many bytes of UTF-8 JSON
//!
//! There is no delimiter between frames. [`Transport`] owns one connected
//! stream and exchanges whole messages over it, hiding short reads and writes.

pub mod codec;
pub mod error;
pub mod reader;
pub mod transport;
pub mod writer;

pub use codec::{
    decode_header, encode_frame, encode_header, FrameConfig, DEFAULT_MAX_PAYLOAD, HDR_LEN,
    MAX_ENCODABLE_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use transport::Transport;
