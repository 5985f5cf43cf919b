use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode_header, HDR_LEN};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Read one complete framed payload from `inner` (blocking).
///
/// Reads exactly [`HDR_LEN`] header bytes, then exactly the announced number
/// of payload bytes, accumulating across short reads. Returns
/// `Err(FrameError::ConnectionClosed)` when EOF arrives before the frame is
/// complete, including EOF before any header byte.
pub fn read_message<R: Read>(inner: &mut R, max_payload: usize) -> Result<Vec<u8>> {
    let mut header = [0u8; HDR_LEN];
    read_full(inner, &mut header)?;

    let announced = decode_header(&header)?;
    if announced > max_payload as u64 {
        return Err(FrameError::PayloadTooLarge {
            size: announced,
            max: max_payload as u64,
        });
    }
    let len = announced as usize;

    let mut payload = Vec::with_capacity(len.min(INITIAL_BUFFER_CAPACITY));
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    while payload.len() < len {
        let want = (len - payload.len()).min(READ_CHUNK_SIZE);
        let read = read_some(inner, &mut chunk[..want])?;
        payload.extend_from_slice(&chunk[..read]);
    }

    trace!(len, "frame received");
    Ok(payload)
}

fn read_full<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        filled += read_some(inner, &mut buf[filled..])?;
    }
    Ok(())
}

fn read_some<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match inner.read(buf) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}
