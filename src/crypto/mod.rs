//! Cryptographic operations for Pixveil.
//!
//! This module provides:
//! - Key derivation from passwords (PBKDF2-HMAC-SHA256)
//! - Authenticated symmetric encryption (ChaCha20-Poly1305)
//! - The tagged envelope format that marks payloads as encrypted

pub mod envelope;

pub use envelope::{decrypt_message, derive_key, encrypt_message, CipherError, ENC_TAG};
