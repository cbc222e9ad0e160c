//! Message encoding orchestration.
//!
//! Composes the cipher layer and the bit codec:
//! 1. Encrypt the message if a password is given
//! 2. Embed the (possibly encrypted) payload into a working copy of the image
//! 3. Serialize the result as PNG (lossless - a lossy container would destroy
//!    the embedded parity bits)

use image::DynamicImage;
use thiserror::Error;

use crate::crypto::{encrypt_message, CipherError};
use crate::stego::{ImageStego, ImageStegoError};

/// Errors that can occur during encoding.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Steganography error: {0}")]
    Stego(#[from] ImageStegoError),

    #[error("Encryption error: {0}")]
    Cipher(#[from] CipherError),
}

/// Hides `text` inside the image decoded from `image_bytes`.
///
/// # Arguments
/// * `image_bytes` - Raw image bytes in any decodable lossless format
/// * `text` - The message to hide (UTF-8, embedded as its byte encoding)
/// * `password` - If given, the message is encrypted before embedding
///
/// # Returns
/// PNG-encoded bytes of the image carrying the hidden message.
pub fn encode(
    image_bytes: &[u8],
    text: &str,
    password: Option<&str>,
) -> Result<Vec<u8>, EncodeError> {
    let stego = ImageStego::from_bytes(image_bytes)?;
    let payload = payload_for(text, password)?;
    let hidden = stego.hide(payload.as_bytes())?;
    Ok(ImageStego::from_image(hidden).to_png_bytes()?)
}

/// Hides `text` inside an already-decoded image.
///
/// Same policy as [`encode`], for callers that hold a [`DynamicImage`]
/// instead of raw container bytes. The input image is not modified.
pub fn encode_image(
    image: &DynamicImage,
    text: &str,
    password: Option<&str>,
) -> Result<DynamicImage, EncodeError> {
    let payload = payload_for(text, password)?;
    let stego = ImageStego::from_image(image.clone());
    Ok(stego.hide(payload.as_bytes())?)
}

fn payload_for(text: &str, password: Option<&str>) -> Result<String, CipherError> {
    match password {
        Some(password) => encrypt_message(text, password),
        None => Ok(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ENC_TAG;
    use crate::stego::ImageStego;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(50, 50, Rgb([120u8, 130, 140])))
    }

    #[test]
    fn test_encode_without_password_embeds_plaintext() {
        let encoded = encode_image(&test_image(), "plain message", None).unwrap();
        let raw = ImageStego::from_image(encoded).extract().unwrap();

        assert_eq!(raw, b"plain message");
    }

    #[test]
    fn test_encode_with_password_embeds_envelope() {
        let encoded = encode_image(&test_image(), "secret", Some("pw")).unwrap();
        let raw = ImageStego::from_image(encoded).extract().unwrap();

        let raw = String::from_utf8(raw).unwrap();
        assert!(raw.starts_with(ENC_TAG));
        assert!(!raw.contains("secret"));
    }

    #[test]
    fn test_encode_produces_png_bytes() {
        let cover = ImageStego::from_image(test_image()).to_png_bytes().unwrap();
        let encoded = encode(&cover, "message", None).unwrap();

        // PNG signature
        assert_eq!(&encoded[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_empty_message_fails() {
        let result = encode_image(&test_image(), "", None);
        assert!(matches!(
            result,
            Err(EncodeError::Stego(ImageStegoError::EmptyMessage))
        ));
    }

    #[test]
    fn test_encode_undecodable_bytes_fails() {
        let result = encode(b"definitely not an image", "message", None);
        assert!(matches!(
            result,
            Err(EncodeError::Stego(ImageStegoError::ImageLoadError(_)))
        ));
    }
}
