//! Password-based encryption envelope.
//!
//! This module provides passphrase-based symmetric encryption using:
//! - PBKDF2-HMAC-SHA256 for key derivation from the password
//! - ChaCha20-Poly1305 for authenticated encryption
//!
//! Envelope format: `##ENC##` + base64(salt) + `:` + base64(nonce || ciphertext).
//! The token is self-contained: the salt travels in the envelope, the nonce
//! travels in the token, and the Poly1305 tag detects any bit-flip,
//! truncation, or wrong key.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

/// Prefix marking a payload as encrypted. Payloads without it are plaintext.
pub const ENC_TAG: &str = "##ENC##";

/// PBKDF2 iteration count. The cost factor against offline password guessing.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt size for key derivation.
const SALT_SIZE: usize = 16;

/// Nonce size for ChaCha20Poly1305.
const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
const TAG_SIZE: usize = 16;

/// Errors that can occur during envelope encryption.
///
/// Decryption failures are deliberately collapsed into a single variant:
/// callers cannot tell a wrong password from corrupted data.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Invalid password or corrupted data")]
    InvalidPasswordOrData,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Derives a 256-bit symmetric key from a password and salt.
///
/// Deterministic: the same password and salt always produce the same key.
/// The salt is not secret and travels with the ciphertext.
pub fn derive_key(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Encrypts a message with a password, producing a tagged envelope string.
///
/// A fresh random salt and nonce are generated per call, so encrypting the
/// same message twice yields different envelopes.
pub fn encrypt_message(message: &str, password: &str) -> Result<String, CipherError> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(nonce, message.as_bytes())
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    // Token format: nonce || ciphertext (ciphertext includes the auth tag)
    let mut token = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);

    Ok(format!(
        "{}{}:{}",
        ENC_TAG,
        BASE64.encode(salt),
        BASE64.encode(&token)
    ))
}

/// Decrypts an envelope string with a password.
///
/// A payload that does not start with [`ENC_TAG`] is returned unchanged:
/// untagged content is assumed to be plaintext, not an error. For tagged
/// payloads, every failure (wrong password, corrupted token, malformed
/// envelope) collapses into [`CipherError::InvalidPasswordOrData`].
pub fn decrypt_message(payload: &str, password: &str) -> Result<String, CipherError> {
    let content = match payload.strip_prefix(ENC_TAG) {
        Some(content) => content,
        None => return Ok(payload.to_string()),
    };

    let (salt_b64, token_b64) = content
        .split_once(':')
        .ok_or(CipherError::InvalidPasswordOrData)?;

    let salt = BASE64
        .decode(salt_b64)
        .map_err(|_| CipherError::InvalidPasswordOrData)?;
    let token = BASE64
        .decode(token_b64)
        .map_err(|_| CipherError::InvalidPasswordOrData)?;

    // Minimum: nonce + auth tag
    if token.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CipherError::InvalidPasswordOrData);
    }

    let key = derive_key(password, &salt);
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|_| CipherError::InvalidPasswordOrData)?;
    let nonce = Nonce::from_slice(&token[..NONCE_SIZE]);

    let plaintext = cipher
        .decrypt(nonce, &token[NONCE_SIZE..])
        .map_err(|_| CipherError::InvalidPasswordOrData)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::InvalidPasswordOrData)
}
