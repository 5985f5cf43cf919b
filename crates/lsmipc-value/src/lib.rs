//! Typed JSON value tree and codec for plugin IPC.
//!
//! [`Value`] is a closed sum over JSON's value space. Numbers keep the exact
//! decimal text they arrived with, so values that do not fit an IEEE 754
//! double pass through a client untouched.
//!
//! Decoding is two-stage: a non-recursive tokenizer flattens the input into
//! a queue of parse events, then a tree builder consumes that queue and
//! rebuilds the nested value.

mod decode;
pub mod encode;
pub mod error;
mod interop;
pub mod number;
pub mod value;

pub use decode::{decode, MAX_DEPTH};
pub use encode::{encode, encode_pretty, encode_to_writer};
pub use error::{CodecError, ValueError};
pub use number::Number;
pub use value::{Map, Tag, Value};
