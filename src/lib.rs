//! # Pixveil - Hide text in plain sight
//!
//! Pixveil hides a text message inside the pixel data of an RGB raster
//! image using least-significant-bit parity encoding, and can recover it
//! later from the image alone.
//!
//! ## Overview
//!
//! - Each message byte is spread across 3 pixels (9 RGB channel values):
//!   8 channels carry the bits as even/odd parity, the 9th marks whether
//!   the message continues or ends
//! - An optional password encrypts the message before embedding
//!   (PBKDF2-HMAC-SHA256 key derivation + ChaCha20-Poly1305)
//! - The caller's image is never mutated; encoding works on a private copy
//!   and returns lossless PNG bytes
//! - Decoding an encrypted message without the password fails with a
//!   distinct error, so callers can prompt for one
//!
//! ## Example Usage
//!
//! ```rust
//! use image::{DynamicImage, RgbImage};
//! use pixveil::{decode_image, encode_image};
//!
//! // Any lossless RGB image works as a cover
//! let cover = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, image::Rgb([40, 90, 200])));
//!
//! // Hide a message, protected by a password
//! let encoded = encode_image(&cover, "Top Secret Message", Some("supersecure")).unwrap();
//!
//! // Recover it - only with the right password
//! let decoded = decode_image(&encoded, Some("supersecure")).unwrap();
//! assert_eq!(decoded, "Top Secret Message");
//!
//! assert!(decode_image(&encoded, Some("wrongpass")).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: The parity bit codec and capacity estimation
//! - [`crypto`]: Key derivation and the authenticated encryption envelope
//! - [`encoder`]: Encoding orchestration (encrypt, embed, serialize)
//! - [`decoder`]: Decoding orchestration (extract, decrypt)

pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod stego;

// Re-export commonly used types at the crate root
pub use crypto::{decrypt_message, derive_key, encrypt_message, CipherError, ENC_TAG};
pub use decoder::{decode, decode_image, DecodeError};
pub use encoder::{encode, encode_image, EncodeError};
pub use stego::{capacity_from_bytes, ImageStego, ImageStegoError};
