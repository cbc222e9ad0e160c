//! Message decoding orchestration.
//!
//! Composes the bit codec and the cipher layer:
//! 1. Extract the raw payload from the image
//! 2. With a password: run envelope decryption (untagged payloads pass
//!    through unchanged)
//! 3. Without one: a tagged payload is an error distinct from decryption
//!    failure, so callers can prompt for a password

use image::DynamicImage;
use std::string::FromUtf8Error;
use thiserror::Error;

use crate::crypto::{decrypt_message, CipherError, ENC_TAG};
use crate::stego::{ImageStego, ImageStegoError};

/// Errors that can occur during decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Steganography error: {0}")]
    Stego(#[from] ImageStegoError),

    #[error("Decryption error: {0}")]
    Cipher(#[from] CipherError),

    #[error("This message is encrypted. Please provide a password.")]
    PasswordRequired,

    #[error("Hidden payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Recovers the hidden message from the image decoded from `image_bytes`.
///
/// # Arguments
/// * `image_bytes` - Raw image bytes produced by [`encode`](crate::encode)
/// * `password` - Password, if the message was encrypted at encode time
///
/// # Returns
/// The recovered message text.
pub fn decode(image_bytes: &[u8], password: Option<&str>) -> Result<String, DecodeError> {
    let stego = ImageStego::from_bytes(image_bytes)?;
    decode_stego(&stego, password)
}

/// Recovers the hidden message from an already-decoded image.
pub fn decode_image(image: &DynamicImage, password: Option<&str>) -> Result<String, DecodeError> {
    decode_stego(&ImageStego::from_image(image.clone()), password)
}

fn decode_stego(stego: &ImageStego, password: Option<&str>) -> Result<String, DecodeError> {
    let raw = String::from_utf8(stego.extract()?)?;

    match password {
        Some(password) => Ok(decrypt_message(&raw, password)?),
        None if raw.starts_with(ENC_TAG) => Err(DecodeError::PasswordRequired),
        None => Ok(raw),
    }
}
