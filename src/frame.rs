//! Length-prefixed frame codec for the chunked container.

use std::io::{Read, Write};

use crate::types::SealError;

/// Size of the little-endian length prefix.
const LEN_PREFIX: usize = 4;

/// Write one frame: `len (u32 LE) || sealed bytes`.
pub(crate) fn write_frame<W: Write>(w: &mut W, sealed: &[u8]) -> Result<(), SealError> {
    let len =
        u32::try_from(sealed.len()).map_err(|_| SealError::FrameTooLarge(sealed.len() as u64))?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(sealed)?;
    Ok(())
}

/// Read the next frame into `buf` (reused across calls), returning its length.
///
/// `Ok(None)` means clean end-of-stream: EOF exactly at a frame boundary.
/// EOF inside the length prefix or inside the payload is a truncated
/// container.
pub(crate) fn read_frame<R: Read>(
    r: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<usize>, SealError> {
    let mut prefix = [0u8; LEN_PREFIX];
    let mut filled = 0;
    while filled < LEN_PREFIX {
        let n = r.read(&mut prefix[filled..])?;
        if n == 0 {
            return if filled == 0 {
                Ok(None)
            } else {
                Err(SealError::TruncatedFrame)
            };
        }
        filled += n;
    }

    let len = u32::from_le_bytes(prefix) as usize;
    if buf.len() < len {
        buf.resize(len, 0);
    }
    r.read_exact(&mut buf[..len]).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            SealError::TruncatedFrame
        } else {
            SealError::Io(e)
        }
    })?;

    Ok(Some(len))
}
