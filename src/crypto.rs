//! Algorithm adapter: uniform seal/open over both ciphers.

use aead::{Aead, KeyInit};
use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use getrandom::fill as getrandom;

use crate::types::{CipherAlg, SealError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block and IV length.
pub const AES_BLOCK_LEN: usize = 16;
/// ChaCha20-Poly1305 nonce length.
pub const CHACHA_NONCE_LEN: usize = 12;
/// AEAD authentication tag length.
pub const AEAD_TAG_LEN: usize = 16;

/// Worst-case bytes that [`seal`] adds on top of the plaintext length.
///
/// AES-CBC: 16-byte IV plus up to a full padding block. ChaCha20-Poly1305:
/// 12-byte nonce plus the 16-byte tag.
pub const fn seal_overhead(alg: CipherAlg) -> usize {
    match alg {
        CipherAlg::Aes256Cbc => AES_BLOCK_LEN + AES_BLOCK_LEN,
        CipherAlg::ChaCha20Poly1305 => CHACHA_NONCE_LEN + AEAD_TAG_LEN,
    }
}

/// Sample fresh IV/nonce bytes from the OS CSPRNG.
fn fresh_random(len: usize) -> Result<Vec<u8>, SealError> {
    let mut bytes = vec![0u8; len];
    getrandom(&mut bytes).map_err(|_| SealError::Crypto)?;
    Ok(bytes)
}

/// Encrypt one buffer into a self-describing sealed blob.
///
/// Layouts: AES-CBC `IV(16) || ciphertext`, ChaCha `nonce(12) || ciphertext || tag(16)`.
/// A fresh IV/nonce is sampled on every call; it is never reused, even on retry.
pub fn seal(alg: CipherAlg, key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, SealError> {
    match alg {
        CipherAlg::Aes256Cbc => {
            let iv = fresh_random(AES_BLOCK_LEN)?;
            let enc = Aes256CbcEnc::new_from_slices(key, &iv).map_err(|_| SealError::Crypto)?;
            let ct = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

            let mut sealed = iv;
            sealed.extend_from_slice(&ct);
            Ok(sealed)
        }
        CipherAlg::ChaCha20Poly1305 => {
            let nonce = fresh_random(CHACHA_NONCE_LEN)?;
            let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| SealError::Crypto)?;
            let ct = cipher
                .encrypt(Nonce::from_slice(&nonce), plaintext)
                .map_err(|_| SealError::Crypto)?;

            let mut sealed = nonce;
            sealed.extend_from_slice(&ct);
            Ok(sealed)
        }
    }
}

/// Inverse of [`seal`].
///
/// # Errors
///
/// [`SealError::AuthFailure`] when the ChaCha tag does not verify,
/// [`SealError::PaddingError`] when the CBC pad is invalid, and
/// [`SealError::Crypto`] for structurally impossible inputs.
pub fn open(alg: CipherAlg, key: &[u8; 32], sealed: &[u8]) -> Result<Vec<u8>, SealError> {
    match alg {
        CipherAlg::Aes256Cbc => {
            if sealed.len() < AES_BLOCK_LEN {
                return Err(SealError::Crypto);
            }
            let (iv, ct) = sealed.split_at(AES_BLOCK_LEN);
            // CBC ciphertext is always a whole number of blocks, at least one.
            if ct.is_empty() || ct.len() % AES_BLOCK_LEN != 0 {
                return Err(SealError::Crypto);
            }
            let dec = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| SealError::Crypto)?;
            dec.decrypt_padded_vec_mut::<Pkcs7>(ct)
                .map_err(|_| SealError::PaddingError)
        }
        CipherAlg::ChaCha20Poly1305 => {
            if sealed.len() < CHACHA_NONCE_LEN + AEAD_TAG_LEN {
                return Err(SealError::Crypto);
            }
            let (nonce, ct) = sealed.split_at(CHACHA_NONCE_LEN);
            let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| SealError::Crypto)?;
            cipher
                .decrypt(Nonce::from_slice(nonce), ct)
                .map_err(|_| SealError::AuthFailure)
        }
    }
}
