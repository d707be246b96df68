//! Framing used on the Wayfire IPC socket.
//!
//! Every message in both directions is a 4-byte little-endian length
//! followed by that many bytes of JSON:
//!
//! ```text
//! +----------------+---------------------------+
//! | len: u32 (LE)  | payload: len bytes (JSON) |
//! +----------------+---------------------------+
//! ```
//!
//! The compositor drops clients that send more than [`MAX_PAYLOAD_LEN`]
//! bytes; the same limit is enforced on what we read.

use std::io::{self, Read, Write};

/// Size of the length header.
pub const HEADER_LEN: usize = 4;

/// Largest payload accepted in either direction.
pub const MAX_PAYLOAD_LEN: usize = (1 << 20) - HEADER_LEN;

/// Errors produced while encoding or decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("frame of {0} bytes exceeds the maximum payload length")]
    TooLong(usize),
    #[error("connection closed in the middle of a frame")]
    Truncated,
}

/// Write `payload` as a single frame and flush.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::TooLong(payload.len()));
    }
    // Bounded by MAX_PAYLOAD_LEN above.
    let len = payload.len() as u32;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` if the peer closed the connection before sending any
/// byte of a new header.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(FrameError::Truncated),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::TooLong(len));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => FrameError::Truncated,
        _ => FrameError::Io(e),
    })?;
    Ok(Some(payload))
}
