use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Width of the decimal length header. Both peers must agree on it.
pub const HDR_LEN: usize = 10;

/// Largest payload length representable in [`HDR_LEN`] decimal digits.
pub const MAX_ENCODABLE_PAYLOAD: u64 = 9_999_999_999;

/// Default maximum payload size accepted by a reader: 64 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Render a payload length as a zero-padded [`HDR_LEN`]-digit header.
///
/// ```
/// assert_eq!(&lsmipc_frame::encode_header(41).unwrap(), b"0000000041");
/// ```
pub fn encode_header(len: usize) -> Result<[u8; HDR_LEN]> {
    let mut remaining = len as u64;
    if remaining > MAX_ENCODABLE_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: remaining,
            max: MAX_ENCODABLE_PAYLOAD,
        });
    }

    let mut header = [b'0'; HDR_LEN];
    for digit in header.iter_mut().rev() {
        *digit = b'0' + (remaining % 10) as u8;
        remaining /= 10;
    }
    Ok(header)
}

/// Parse a [`HDR_LEN`]-byte header into the payload length it announces.
pub fn decode_header(header: &[u8]) -> Result<u64> {
    if header.len() != HDR_LEN || !header.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::InvalidHeader(
            String::from_utf8_lossy(header).into_owned(),
        ));
    }
    Ok(header
        .iter()
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0')))
}

/// Encode a message into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────────┬──────────────────────────┐
/// │ Length (HDR_LEN ASCII  │ Payload                  │
/// │ digits, zero padded)   │ (Length bytes of JSON)   │
/// └────────────────────────┴──────────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyMessage);
    }
    let header = encode_header(payload.len())?;
    dst.reserve(HDR_LEN + payload.len());
    dst.put_slice(&header);
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for framed transports.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes accepted on receive. Sends are bounded
    /// only by the header width. Default: 64 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations. Default: block forever.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations. Default: block forever.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
