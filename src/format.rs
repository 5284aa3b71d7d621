//! On-disk container format: the 24-byte preamble.

use std::io::{Read, Write};

use crate::types::{CipherAlg, SealError};

/// Container magic bytes.
pub const MAGIC: &[u8; 8] = b"ENCFILE1";

/// Current container format version.
pub const VERSION: u16 = 1;

/// Header length on disk.
pub const HEADER_LEN: usize = 24;

/// The fixed preamble written before the first frame of a chunked file.
///
/// Layout (all integers little-endian):
/// `magic (8) | version (2) | algorithm id (2) | flags (4, zero) | chunk size (8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub algorithm: CipherAlg,
    /// Chunk size used by the writer, in bytes. Informs buffer allocation on
    /// read; each frame still carries its own length.
    pub chunk_size: u64,
}

impl ContainerHeader {
    pub fn new(algorithm: CipherAlg, chunk_size: u64) -> Self {
        Self {
            algorithm,
            chunk_size,
        }
    }

    /// Serialize to the fixed 24-byte layout.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..8].copy_from_slice(MAGIC);
        out[8..10].copy_from_slice(&VERSION.to_le_bytes());
        out[10..12].copy_from_slice(&self.algorithm.wire_code().to_le_bytes());
        // bytes 12..16 stay zero: reserved flags
        out[16..24].copy_from_slice(&self.chunk_size.to_le_bytes());
        out
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), SealError> {
        w.write_all(&self.encode())?;
        Ok(())
    }

    /// Read and validate the preamble: magic, then version, then algorithm
    /// id, then flags. A file shorter than the header is not a container.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, SealError> {
        let mut raw = [0u8; HEADER_LEN];
        r.read_exact(&mut raw).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SealError::NotAContainer
            } else {
                SealError::Io(e)
            }
        })?;

        if &raw[0..8] != MAGIC {
            return Err(SealError::NotAContainer);
        }
        let version = u16::from_le_bytes(raw[8..10].try_into().unwrap());
        if version != VERSION {
            return Err(SealError::UnsupportedVersion(version));
        }
        let code = u16::from_le_bytes(raw[10..12].try_into().unwrap());
        let algorithm = CipherAlg::from_wire_code(code).ok_or(SealError::UnknownAlgorithmId(code))?;
        let flags = u32::from_le_bytes(raw[12..16].try_into().unwrap());
        if flags != 0 {
            return Err(SealError::UnsupportedFlags(flags));
        }
        let chunk_size = u64::from_le_bytes(raw[16..24].try_into().unwrap());

        Ok(Self {
            algorithm,
            chunk_size,
        })
    }
}
