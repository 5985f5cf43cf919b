use crate::value::Tag;

/// Local contract violations raised by [`Value`](crate::Value) accessors.
///
/// These mean the caller assumed a shape the data does not have. They are
/// never produced by the remote peer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The value holds a different variant than the one requested.
    #[error("value type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: Tag, actual: Tag },

    /// The numeric text does not parse as the requested type.
    #[error("numeric value {text} is not a valid {target}")]
    NumericRange { text: String, target: &'static str },

    /// Text offered as a number is not a JSON number.
    #[error("invalid numeric text {0:?}")]
    InvalidNumber(String),
}

/// Failures while turning values into JSON text and back.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Writing encoded output failed.
    #[error("failed to encode value: {0}")]
    Encode(#[from] std::io::Error),

    /// The input is not well-formed JSON.
    #[error("invalid JSON at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    /// The input nests arrays and objects deeper than the decoder allows.
    #[error("JSON nesting exceeds {0} levels")]
    DepthLimit(usize),

    /// The parse event stream is not a well-bracketed value.
    #[error("malformed parse event stream: {0}")]
    Structure(String),
}
