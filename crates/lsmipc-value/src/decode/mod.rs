//! JSON text to [`Value`].

mod builder;
mod tokenizer;

use tracing::trace;

use crate::error::CodecError;
use crate::value::Value;

/// Deepest array/object nesting accepted by [`decode`] and produced by
/// [`encode`](fn@crate::encode).
pub const MAX_DEPTH: usize = 128;

/// Parse JSON text into a value tree.
///
/// Malformed text fails with [`CodecError::Syntax`] before any tree is
/// built. Empty or whitespace-only text decodes to [`Value::Null`].
pub fn decode(text: &str) -> Result<Value, CodecError> {
    let mut events = tokenizer::tokenize(text)?;
    trace!(events = events.len(), bytes = text.len(), "tokenized JSON text");
    builder::build_tree(&mut events)
}
