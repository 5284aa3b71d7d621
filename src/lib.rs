#![forbid(unsafe_code)]
//! # sealfile — chunked symmetric encryption for local files.
//!
//! `sealfile` encrypts and decrypts arbitrarily large binary files with a
//! raw 32-byte key, using AES-256-CBC (PKCS#7) or ChaCha20-Poly1305.
//!
//! Two on-disk formats:
//! - **Whole-file**: the entire input sealed in one call; the output is the
//!   bare sealed blob with no header. Intended for small files; the caller
//!   must remember which algorithm was used.
//! - **Chunked container**: a 24-byte self-describing header followed by
//!   independently sealed, length-prefixed frames. Encryption and decryption
//!   run in bounded memory (one chunk at a time), so multi-gigabyte files
//!   stream through without being loaded whole.
//!
//! Key management is out of scope: every operation borrows a caller-provided
//! 32-byte key for the duration of the call and never retains it.
//!
//! ## Example: chunked round-trip
//! ```no_run
//! use sealfile::{chunk_encrypt_file, chunk_decrypt_file, CipherAlg};
//! use std::path::Path;
//!
//! let key = [0x42u8; 32];
//! let report = chunk_encrypt_file(
//!     CipherAlg::ChaCha20Poly1305,
//!     &key,
//!     Path::new("movie.mkv"),
//!     Path::new("movie.mkv.sealed"),
//!     8,
//! )?;
//! println!("{} chunks written", report.total_chunks);
//!
//! chunk_decrypt_file(
//!     CipherAlg::ChaCha20Poly1305,
//!     &key,
//!     Path::new("movie.mkv.sealed"),
//!     Path::new("movie.mkv.out"),
//! )?;
//! # Ok::<(), sealfile::SealError>(())
//! ```
//!
//! ## Example: checksum a file
//! ```no_run
//! use sealfile::file_md5;
//! use std::path::Path;
//!
//! let digest = file_md5(Path::new("movie.mkv"))?;
//! println!("md5: {digest}");
//! # Ok::<(), sealfile::SealError>(())
//! ```

mod crypto;
mod file;
mod format;
mod frame;
mod hash;
mod streaming;
mod types;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zeroize::Zeroize;

pub use file::file_size;
pub use format::{ContainerHeader, HEADER_LEN, MAGIC, VERSION};
pub use hash::file_md5;
pub use types::{
    ChunkDecryptReport, ChunkEncryptReport, CipherAlg, DecryptReport, EncryptReport, SealError,
    DEFAULT_CHUNK_MIB,
};

/// Borrow the key as a fixed 32-byte array, rejecting any other length
/// before any I/O happens.
fn check_key(key: &[u8]) -> Result<&[u8; 32], SealError> {
    key.try_into()
        .map_err(|_| SealError::InvalidKeyLength(key.len()))
}

/// Seal one in-memory buffer. The whole-file format is exactly this blob.
pub fn seal_bytes(alg: CipherAlg, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, SealError> {
    let key = check_key(key)?;
    crypto::seal(alg, key, plaintext)
}

/// Open one sealed buffer produced by [`seal_bytes`] or [`encrypt_file`].
pub fn open_bytes(alg: CipherAlg, key: &[u8], sealed: &[u8]) -> Result<Vec<u8>, SealError> {
    let key = check_key(key)?;
    crypto::open(alg, key, sealed)
}

/// Encrypt a whole file in one pass (no container header).
///
/// Reads the entire input into memory, so this is for small files; use
/// [`chunk_encrypt_file`] for anything large.
pub fn encrypt_file(
    alg: CipherAlg,
    key: &[u8],
    input: &Path,
    output: &Path,
) -> Result<EncryptReport, SealError> {
    let key = check_key(key)?;

    let mut in_file = File::open(input)?;
    let file_size = in_file.metadata()?.len();
    let mut data = Vec::new();
    in_file.read_to_end(&mut data)?;

    let sealed = crypto::seal(alg, key, &data)?;
    data.zeroize();
    file::write_all_atomic(output, &sealed)?;

    Ok(EncryptReport {
        file_size_kb: types::to_kb(file_size),
    })
}

/// Decrypt a whole-file blob produced by [`encrypt_file`].
///
/// The whole-file format carries no algorithm tag; a wrong `alg` surfaces as
/// [`SealError::AuthFailure`], [`SealError::PaddingError`], or
/// [`SealError::Crypto`] rather than a mismatch error.
pub fn decrypt_file(
    alg: CipherAlg,
    key: &[u8],
    input: &Path,
    output: &Path,
) -> Result<DecryptReport, SealError> {
    let key = check_key(key)?;

    let mut in_file = File::open(input)?;
    let encrypted_size = in_file.metadata()?.len();
    let mut sealed = Vec::new();
    in_file.read_to_end(&mut sealed)?;

    let mut plaintext = crypto::open(alg, key, &sealed)?;
    let file_size = plaintext.len() as u64;
    file::write_all_atomic(output, &plaintext)?;
    plaintext.zeroize();

    Ok(DecryptReport {
        file_size_kb: types::to_kb(file_size),
        encrypted_size_kb: types::to_kb(encrypted_size),
    })
}

/// Encrypt a file into the chunked container format.
///
/// `chunk_size_mib` is the plaintext bytes per frame (the last frame may be
/// shorter); it must be at least 1 and small enough that a sealed frame fits
/// the 32-bit length prefix.
pub fn chunk_encrypt_file(
    alg: CipherAlg,
    key: &[u8],
    input: &Path,
    output: &Path,
    chunk_size_mib: u32,
) -> Result<ChunkEncryptReport, SealError> {
    let key = check_key(key)?;
    streaming::chunk_encrypt(alg, key, input, output, chunk_size_mib)
}

/// Decrypt a chunked container back to plaintext.
///
/// `alg` is cross-checked against the container header; a mismatch fails
/// with [`SealError::AlgorithmMismatch`] before any output is written. Any
/// failure mid-stream removes the partial output (best-effort).
pub fn chunk_decrypt_file(
    alg: CipherAlg,
    key: &[u8],
    input: &Path,
    output: &Path,
) -> Result<ChunkDecryptReport, SealError> {
    let key = check_key(key)?;
    streaming::chunk_decrypt(alg, key, input, output)
}

/// Read the container header of a chunked file without decrypting anything.
pub fn inspect_container(path: &Path) -> Result<ContainerHeader, SealError> {
    let mut file = File::open(path)?;
    ContainerHeader::read_from(&mut file)
}
