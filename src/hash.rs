//! Streaming MD5 digest.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::types::SealError;

/// Compute the MD5 digest of a file as a 32-char lowercase hex string.
///
/// Streams the file in 64 KiB reads and never loads it whole. MD5 here is a
/// non-cryptographic checksum for integrity comparison, not a security
/// primitive.
pub fn file_md5(path: &Path) -> Result<String, SealError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = vec![0u8; 64 * 1024];
    let mut hasher = Md5::new();

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
