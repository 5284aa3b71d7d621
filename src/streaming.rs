//! Chunked streaming encryption and decryption.
//!
//! A chunked file is the 24-byte container header followed by independently
//! sealed, length-prefixed frames. Both directions process one chunk at a
//! time through a single reusable buffer, so peak memory is bounded by the
//! chunk size no matter how large the file is.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{open, seal, seal_overhead};
use crate::file::OutputGuard;
use crate::format::ContainerHeader;
use crate::frame::{read_frame, write_frame};
use crate::types::{to_kb, ChunkDecryptReport, ChunkEncryptReport, CipherAlg, SealError};

const MIB: u64 = 1024 * 1024;

/// Validate a chunk size against the 32-bit frame length prefix.
///
/// The sealed frame (chunk plus per-algorithm overhead) must fit the length
/// field.
fn validate_chunk_size(alg: CipherAlg, chunk_size: u64) -> Result<(), SealError> {
    if chunk_size == 0 {
        return Err(SealError::Invalid("chunk size must be > 0"));
    }
    let overhead = seal_overhead(alg) as u64;
    if chunk_size > u32::MAX as u64 - overhead {
        return Err(SealError::FrameTooLarge(chunk_size + overhead));
    }
    Ok(())
}

/// Fill `buf` from `r`; a short fill means end of input.
fn read_chunk<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize, SealError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = r.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

pub(crate) fn chunk_encrypt(
    alg: CipherAlg,
    key: &[u8; 32],
    input: &Path,
    output: &Path,
    chunk_size_mib: u32,
) -> Result<ChunkEncryptReport, SealError> {
    if chunk_size_mib == 0 {
        return Err(SealError::Invalid("chunk size must be at least 1 MiB"));
    }
    let chunk_size = chunk_size_mib as u64 * MIB;
    validate_chunk_size(alg, chunk_size)?;

    let in_file = File::open(input)?;
    let file_size = in_file.metadata()?.len();
    let mut reader = BufReader::with_capacity(64 * 1024, in_file);

    let (out_file, mut guard) = OutputGuard::create(output)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, out_file);

    ContainerHeader::new(alg, chunk_size).write_to(&mut writer)?;

    // One plaintext buffer for the whole pass; an empty input writes no frames.
    let mut buf = vec![0u8; chunk_size as usize];
    let mut total_chunks = 0u64;
    loop {
        let n = read_chunk(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let sealed = seal(alg, key, &buf[..n])?;
        write_frame(&mut writer, &sealed)?;
        buf[..n].zeroize();
        total_chunks += 1;
        if n < buf.len() {
            break;
        }
    }
    buf.zeroize();

    writer.flush()?;
    writer.get_ref().sync_all()?;
    guard.disarm();

    Ok(ChunkEncryptReport {
        file_size_kb: to_kb(file_size),
        chunk_size_kb: to_kb(chunk_size),
        total_chunks,
    })
}

pub(crate) fn chunk_decrypt(
    alg: CipherAlg,
    key: &[u8; 32],
    input: &Path,
    output: &Path,
) -> Result<ChunkDecryptReport, SealError> {
    let in_file = File::open(input)?;
    let mut reader = BufReader::with_capacity(64 * 1024, in_file);

    let header = ContainerHeader::read_from(&mut reader)?;
    if header.algorithm != alg {
        return Err(SealError::AlgorithmMismatch {
            requested: alg,
            found: header.algorithm,
        });
    }
    validate_chunk_size(header.algorithm, header.chunk_size)?;

    let (out_file, mut guard) = OutputGuard::create(output)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, out_file);

    let mut sealed_buf = Vec::new();
    let mut total_bytes = 0u64;
    let mut total_chunks = 0u64;
    while let Some(len) = read_frame(&mut reader, &mut sealed_buf)? {
        let pt = Zeroizing::new(open(header.algorithm, key, &sealed_buf[..len])?);
        writer.write_all(&pt)?;
        total_bytes += pt.len() as u64;
        total_chunks += 1;
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    guard.disarm();

    Ok(ChunkDecryptReport {
        original_size_kb: to_kb(total_bytes),
        total_bytes_kb: to_kb(total_bytes),
        chunk_size_kb: to_kb(header.chunk_size),
        total_chunks,
    })
}
