//! Container header validation, truncation, and algorithm cross-checks.

use assert_fs::prelude::*;
use std::fs;
use std::path::PathBuf;

use sealfile::{chunk_decrypt_file, chunk_encrypt_file, inspect_container, CipherAlg, SealError};

fn test_key() -> [u8; 32] {
    [7u8; 32]
}

/// Build a small chunked ciphertext with the chosen algorithm.
fn make_container(alg: CipherAlg) -> (assert_fs::TempDir, PathBuf, Vec<u8>) {
    let td = assert_fs::TempDir::new().unwrap();
    let input = td.child("in.bin");
    input.write_binary(b"some chunked input").unwrap();

    let ct_path = td.child("ct.enc").path().to_path_buf();
    chunk_encrypt_file(alg, &test_key(), input.path(), &ct_path, 1).unwrap();
    let bytes = fs::read(&ct_path).unwrap();
    (td, ct_path, bytes)
}

/// Write tampered bytes and attempt a chunked decrypt, returning the error.
fn decrypt_tampered(td: &assert_fs::TempDir, alg: CipherAlg, bytes: &[u8]) -> SealError {
    let bad = td.child("bad.enc");
    bad.write_binary(bytes).unwrap();

    let out = td.child("out.bin");
    let err = chunk_decrypt_file(alg, &test_key(), bad.path(), out.path()).unwrap_err();
    assert!(!out.path().exists(), "failed decrypt must not leave output");
    err
}

#[test]
fn corrupt_magic_is_not_a_container() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, mut bytes) = make_container(alg);
    bytes[0] ^= 0xFF;

    let err = decrypt_tampered(&td, alg, &bytes);
    assert!(matches!(err, SealError::NotAContainer));
}

#[test]
fn unknown_version_is_rejected() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, mut bytes) = make_container(alg);
    bytes[8..10].copy_from_slice(&99u16.to_le_bytes());

    let err = decrypt_tampered(&td, alg, &bytes);
    assert!(matches!(err, SealError::UnsupportedVersion(99)));
}

#[test]
fn unknown_algorithm_id_is_rejected() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, mut bytes) = make_container(alg);
    bytes[10..12].copy_from_slice(&9u16.to_le_bytes());

    let err = decrypt_tampered(&td, alg, &bytes);
    assert!(matches!(err, SealError::UnknownAlgorithmId(9)));
}

#[test]
fn nonzero_flags_are_rejected() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, mut bytes) = make_container(alg);
    bytes[12] = 1;

    let err = decrypt_tampered(&td, alg, &bytes);
    assert!(matches!(err, SealError::UnsupportedFlags(1)));
}

#[test]
fn zero_chunk_size_in_header_is_rejected() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, mut bytes) = make_container(alg);
    bytes[16..24].copy_from_slice(&0u64.to_le_bytes());

    let err = decrypt_tampered(&td, alg, &bytes);
    assert!(matches!(err, SealError::Invalid(_)));
}

#[test]
fn truncated_header_is_not_a_container() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, bytes) = make_container(alg);

    let err = decrypt_tampered(&td, alg, &bytes[..10]);
    assert!(matches!(err, SealError::NotAContainer));
}

#[test]
fn truncation_inside_length_prefix_is_a_truncated_frame() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, bytes) = make_container(alg);

    let err = decrypt_tampered(&td, alg, &bytes[..24 + 2]);
    assert!(matches!(err, SealError::TruncatedFrame));
}

#[test]
fn truncation_inside_payload_is_a_truncated_frame() {
    let alg = CipherAlg::ChaCha20Poly1305;
    let (td, _path, bytes) = make_container(alg);
    assert!(bytes.len() > 24 + 4 + 10);

    let err = decrypt_tampered(&td, alg, &bytes[..24 + 4 + 10]);
    assert!(matches!(err, SealError::TruncatedFrame));
}

#[test]
fn algorithm_cross_check_fails_with_mismatch() {
    let (td, path, _bytes) = make_container(CipherAlg::ChaCha20Poly1305);

    let out = td.child("out.bin");
    let err = chunk_decrypt_file(CipherAlg::Aes256Cbc, &test_key(), &path, out.path()).unwrap_err();
    match err {
        SealError::AlgorithmMismatch { requested, found } => {
            assert_eq!(requested, CipherAlg::Aes256Cbc);
            assert_eq!(found, CipherAlg::ChaCha20Poly1305);
        }
        other => panic!("expected AlgorithmMismatch, got {:?}", other),
    }
    assert!(!out.path().exists());
}

#[test]
fn inspect_reads_header_without_key() {
    let (_td, path, _bytes) = make_container(CipherAlg::Aes256Cbc);

    let header = inspect_container(&path).unwrap();
    assert_eq!(header.algorithm, CipherAlg::Aes256Cbc);
    assert_eq!(header.chunk_size, 1024 * 1024);
}

#[test]
fn inspect_rejects_garbage() {
    let td = assert_fs::TempDir::new().unwrap();
    let junk = td.child("junk.bin");
    junk.write_binary(b"definitely not a container").unwrap();

    let err = inspect_container(junk.path()).unwrap_err();
    assert!(matches!(err, SealError::NotAContainer));
}
