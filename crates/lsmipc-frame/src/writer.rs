use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::encode_frame;
use crate::error::{FrameError, Result};

/// Frame `payload` into `buf` and write it to `inner` as one unit (blocking).
///
/// Short writes are continued until every byte is written. `Interrupted` is
/// retried; any other error, or a write that accepts zero bytes, aborts the
/// send. A partially written frame is never reported as success.
///
/// The only size limit on send is what the header can express.
pub fn write_message<W: Write>(inner: &mut W, buf: &mut BytesMut, payload: &[u8]) -> Result<()> {
    buf.clear();
    encode_frame(payload, buf)?;

    let mut offset = 0usize;
    while offset < buf.len() {
        match inner.write(&buf[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    trace!(len = payload.len(), "frame sent");
    Ok(())
}
