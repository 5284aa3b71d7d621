//! Core types, errors, and result records.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default chunk size for the chunked container, in MiB.
pub const DEFAULT_CHUNK_MIB: u32 = 10;

/// Supported symmetric ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherAlg {
    /// AES-256 in CBC mode with PKCS#7 padding (16-byte IVs, unauthenticated).
    Aes256Cbc = 1,
    /// ChaCha20-Poly1305 AEAD (12-byte nonces, 16-byte tags). Default.
    #[default]
    ChaCha20Poly1305 = 2,
}

impl CipherAlg {
    /// Wire code stored in the container header.
    pub const fn wire_code(self) -> u16 {
        self as u16
    }

    /// Map a container wire code back to an algorithm.
    pub fn from_wire_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Aes256Cbc),
            2 => Some(Self::ChaCha20Poly1305),
            _ => None,
        }
    }

    /// Public string name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes256Cbc => "aes",
            Self::ChaCha20Poly1305 => "chacha20poly1305",
        }
    }
}

impl fmt::Display for CipherAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherAlg {
    type Err = SealError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "aes" => Ok(Self::Aes256Cbc),
            "chacha20poly1305" => Ok(Self::ChaCha20Poly1305),
            other => Err(SealError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Library error type (no panics for expected failures).
#[derive(Error, Debug)]
pub enum SealError {
    #[error("key must be exactly 32 bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("unknown algorithm id {0} in container header")]
    UnknownAlgorithmId(u16),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("not an encrypted container (bad magic)")]
    NotAContainer,
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),
    #[error("unsupported header flags {0:#010x}")]
    UnsupportedFlags(u32),
    #[error("container was encrypted with {found}, requested {requested}")]
    AlgorithmMismatch {
        requested: CipherAlg,
        found: CipherAlg,
    },
    #[error("unexpected end of file inside a frame")]
    TruncatedFrame,
    #[error("frame of {0} bytes exceeds the 32-bit length prefix")]
    FrameTooLarge(u64),
    #[error("authentication failed")]
    AuthFailure,
    #[error("invalid PKCS#7 padding")]
    PaddingError,
    #[error("encryption/decryption failure")]
    Crypto,
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Kilobyte truncation used by all result records (legacy reporting unit).
pub(crate) const fn to_kb(bytes: u64) -> u64 {
    bytes / 1024
}

/// Result of a whole-file encryption. Sizes are kilobytes, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptReport {
    /// Plaintext input size.
    pub file_size_kb: u64,
}

/// Result of a whole-file decryption. Sizes are kilobytes, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptReport {
    /// Recovered plaintext size.
    pub file_size_kb: u64,
    /// Size of the encrypted input.
    pub encrypted_size_kb: u64,
}

/// Result of a chunked encryption. Sizes are kilobytes, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEncryptReport {
    /// Plaintext input size.
    pub file_size_kb: u64,
    /// Configured chunk size.
    pub chunk_size_kb: u64,
    /// Number of frames written.
    pub total_chunks: u64,
}

/// Result of a chunked decryption. Sizes are kilobytes, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDecryptReport {
    /// Recovered plaintext size.
    pub original_size_kb: u64,
    /// Bytes written to the output (equals `original_size_kb`).
    pub total_bytes_kb: u64,
    /// Chunk size recorded in the container header.
    pub chunk_size_kb: u64,
    /// Number of frames decrypted.
    pub total_chunks: u64,
}
