//! LSB parity steganography for images.
//!
//! Hides data in the parity (even/odd) of pixel color values.
//! Supports PNG and BMP images (lossless formats only).
//!
//! Each payload byte is spread across 3 pixels (9 channel values):
//! channels 0..8 carry the byte's bits MSB-first, and the 9th channel
//! carries the end-of-message marker (even = more bytes follow, odd = last
//! byte). An even channel encodes a 0 bit, an odd channel encodes a 1 bit.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Pixels consumed per payload byte.
const PIXELS_PER_BYTE: usize = 3;

/// Channel values per 3-pixel group (RGB only, alpha untouched).
const GROUP_CHANNELS: usize = 9;

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum ImageStegoError {
    #[error("Image too small to hold message: need {needed_pixels} pixels, have {available_pixels}")]
    ImageTooSmall {
        needed_pixels: usize,
        available_pixels: usize,
    },

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("No end-of-message marker found; the image does not carry a hidden message")]
    NoMarkerFound,

    #[error("Message is empty")]
    EmptyMessage,
}

/// End-of-message marker written to the 9th channel of every 3-pixel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndMarker {
    /// More bytes follow (channel forced even).
    Continue,
    /// This was the last byte (channel forced odd).
    End,
}

impl EndMarker {
    fn as_bit(self) -> u8 {
        match self {
            EndMarker::Continue => 0,
            EndMarker::End => 1,
        }
    }

    fn from_channel(value: u8) -> Self {
        if value % 2 != 0 {
            EndMarker::End
        } else {
            EndMarker::Continue
        }
    }
}

/// Forces the parity of a channel value to match the given bit.
///
/// Even encodes 0, odd encodes 1. Values are nudged downward, except at 0
/// where an odd target must nudge upward (u8 cannot go below 0).
fn force_parity(value: u8, bit: u8) -> u8 {
    if bit == 0 {
        if value % 2 != 0 {
            value - 1
        } else {
            value
        }
    } else if value % 2 == 0 {
        if value != 0 {
            value - 1
        } else {
            value + 1
        }
    } else {
        value
    }
}

/// Maps a row-major pixel index to (x, y) coordinates.
fn pixel_coords(index: usize, width: u32) -> (u32, u32) {
    let index = index as u64;
    let width = u64::from(width);
    ((index % width) as u32, (index / width) as u32)
}

/// Returns the capacity in bytes for raw image bytes.
///
/// Capacity queries are advisory: undecodable input yields 0 rather than
/// an error.
pub fn capacity_from_bytes(bytes: &[u8]) -> usize {
    match ImageStego::from_bytes(bytes) {
        Ok(stego) => stego.capacity(),
        Err(_) => 0,
    }
}

/// Image steganography handler.
pub struct ImageStego {
    image: DynamicImage,
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageStegoError> {
        let image = image::open(path).map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image })
    }

    /// Creates a new ImageStego from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageStegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image })
    }

    /// Creates a new ImageStego from a DynamicImage.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Returns the capacity in bytes that can be hidden in this image.
    pub fn capacity(&self) -> usize {
        let (width, height) = self.image.dimensions();
        let total_pixels = (width as usize) * (height as usize);
        // 3 channels (RGB) per pixel, 1 bit per channel, 8 bits per byte
        total_pixels * 3 / 8
    }

    /// Hides data in the image using parity steganography.
    ///
    /// The image itself is never modified; the payload is written to a
    /// fresh working copy that is returned to the caller.
    ///
    /// # Arguments
    /// * `data` - The data to hide (must not be empty)
    ///
    /// # Returns
    /// A new image with the data hidden inside.
    pub fn hide(&self, data: &[u8]) -> Result<DynamicImage, ImageStegoError> {
        if data.is_empty() {
            // The wire format has no representation for "zero bytes,
            // immediately terminated".
            return Err(ImageStegoError::EmptyMessage);
        }

        let mut output = self.image.to_rgba8();
        let (width, height) = output.dimensions();
        let available_pixels = (width as usize) * (height as usize);
        let needed_pixels = data.len() * PIXELS_PER_BYTE;

        if needed_pixels > available_pixels {
            return Err(ImageStegoError::ImageTooSmall {
                needed_pixels,
                available_pixels,
            });
        }

        for (i, &byte) in data.iter().enumerate() {
            let base = i * PIXELS_PER_BYTE;
            let mut group = [0u8; GROUP_CHANNELS];

            for p in 0..PIXELS_PER_BYTE {
                let (x, y) = pixel_coords(base + p, width);
                let pixel = output.get_pixel(x, y);
                group[p * 3..p * 3 + 3].copy_from_slice(&pixel.0[..3]);
            }

            for (j, channel) in group.iter_mut().take(8).enumerate() {
                let bit = (byte >> (7 - j)) & 1;
                *channel = force_parity(*channel, bit);
            }

            let marker = if i + 1 == data.len() {
                EndMarker::End
            } else {
                EndMarker::Continue
            };
            group[8] = force_parity(group[8], marker.as_bit());

            for p in 0..PIXELS_PER_BYTE {
                let (x, y) = pixel_coords(base + p, width);
                let mut pixel = *output.get_pixel(x, y);
                pixel.0[..3].copy_from_slice(&group[p * 3..p * 3 + 3]);
                output.put_pixel(x, y, pixel);
            }
        }

        Ok(DynamicImage::ImageRgba8(output))
    }

    /// Extracts hidden data from the image.
    ///
    /// Reads 3-pixel groups until a group's marker channel is odd. If the
    /// image is exhausted without seeing an odd marker, the image was not
    /// produced by [`hide`](Self::hide) and extraction fails.
    pub fn extract(&self) -> Result<Vec<u8>, ImageStegoError> {
        let rgba = self.image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let available_pixels = (width as usize) * (height as usize);

        let mut data = Vec::new();
        let mut base = 0;

        loop {
            if base + PIXELS_PER_BYTE > available_pixels {
                return Err(ImageStegoError::NoMarkerFound);
            }

            let mut group = [0u8; GROUP_CHANNELS];
            for p in 0..PIXELS_PER_BYTE {
                let (x, y) = pixel_coords(base + p, width);
                let pixel = rgba.get_pixel(x, y);
                group[p * 3..p * 3 + 3].copy_from_slice(&pixel.0[..3]);
            }

            let mut byte = 0u8;
            for channel in group.iter().take(8) {
                byte = (byte << 1) | (channel & 1);
            }
            data.push(byte);

            if EndMarker::from_channel(group[8]) == EndMarker::End {
                return Ok(data);
            }

            base += PIXELS_PER_BYTE;
        }
    }

    /// Saves the image to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageStegoError> {
        self.image
            .save(path)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consumes self and returns the underlying image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 17) % 256) as u8,
                ((y * 23) % 256) as u8,
                (((x + y) * 31) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_capacity() {
        let image = create_test_image(100, 100);
        let stego = ImageStego::from_image(image);

        // 100x100 = 10000 pixels, 3 channels, 1 bit each = 30000 bits = 3750 bytes
        assert_eq!(stego.capacity(), 3750);
    }

    #[test]
    fn test_capacity_from_invalid_bytes_is_zero() {
        assert_eq!(capacity_from_bytes(b"not an image"), 0);
        assert_eq!(capacity_from_bytes(&[]), 0);
    }

    #[test]
    fn test_force_parity() {
        // bit 0: force even, decrement if odd
        assert_eq!(force_parity(4, 0), 4);
        assert_eq!(force_parity(5, 0), 4);
        assert_eq!(force_parity(1, 0), 0);
        // bit 1: force odd, decrement if even and nonzero
        assert_eq!(force_parity(5, 1), 5);
        assert_eq!(force_parity(4, 1), 3);
        // the one place a value moves up: 0 cannot be decremented
        assert_eq!(force_parity(0, 1), 1);
        assert_eq!(force_parity(0, 0), 0);
    }

    #[test]
    fn test_hide_and_extract() {
        let image = create_test_image(100, 100);
        let stego = ImageStego::from_image(image);

        let data = b"Hello, steganography!";

        let hidden = stego.hide(data).unwrap();
        let extracted = ImageStego::from_image(hidden).extract().unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_hide_and_extract_single_byte() {
        let image = create_test_image(10, 10);
        let stego = ImageStego::from_image(image);

        let hidden = stego.hide(&[0x42]).unwrap();
        let extracted = ImageStego::from_image(hidden).extract().unwrap();

        assert_eq!(extracted, vec![0x42]);
    }

    #[test]
    fn test_hide_and_extract_on_black_image() {
        // All channels are 0, so every 1 bit must take the increment path.
        let img = ImageBuffer::from_pixel(10, 10, Rgb([0u8, 0, 0]));
        let stego = ImageStego::from_image(DynamicImage::ImageRgb8(img));

        let data = &[0xFF, 0x00, 0xA5];

        let hidden = stego.hide(data).unwrap();
        let extracted = ImageStego::from_image(hidden).extract().unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_hide_does_not_mutate_original() {
        let image = create_test_image(50, 50);
        let original = image.to_rgba8();
        let stego = ImageStego::from_image(image);

        stego.hide(b"some payload").unwrap();

        assert_eq!(stego.image().to_rgba8(), original);
    }

    #[test]
    fn test_empty_message_rejected() {
        let image = create_test_image(10, 10);
        let stego = ImageStego::from_image(image);

        let result = stego.hide(&[]);
        assert!(matches!(result, Err(ImageStegoError::EmptyMessage)));
    }

    #[test]
    fn test_image_too_small() {
        // 4x4 = 16 pixels, enough for 5 bytes
        let image = create_test_image(4, 4);
        let stego = ImageStego::from_image(image);

        let data = vec![0u8; 6]; // needs 18 pixels

        let result = stego.hide(&data);
        assert!(matches!(result, Err(ImageStegoError::ImageTooSmall { .. })));
    }

    #[test]
    fn test_no_marker_in_plain_image() {
        // Every channel value is even, so no group ever carries an End marker.
        let img = ImageBuffer::from_pixel(10, 10, Rgb([2u8, 4, 6]));
        let stego = ImageStego::from_image(DynamicImage::ImageRgb8(img));

        let result = stego.extract();
        assert!(matches!(result, Err(ImageStegoError::NoMarkerFound)));
    }

    #[test]
    fn test_extract_stops_at_marker() {
        // Payload fills a fraction of the image; extraction must not read past it.
        let image = create_test_image(100, 100);
        let stego = ImageStego::from_image(image);

        let data = b"short";

        let hidden = stego.hide(data).unwrap();
        let extracted = ImageStego::from_image(hidden).extract().unwrap();

        assert_eq!(extracted.len(), data.len());
    }

    #[test]
    fn test_png_roundtrip() {
        let image = create_test_image(100, 100);
        let stego = ImageStego::from_image(image);

        let data = b"Test PNG roundtrip";

        let hidden = stego.hide(data).unwrap();

        // Serialize to PNG bytes and reload
        let png_bytes = ImageStego::from_image(hidden).to_png_bytes().unwrap();
        let extracted = ImageStego::from_bytes(&png_bytes).unwrap().extract().unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_payload_wraps_across_rows() {
        // 5 pixels per row: every group of 3 pixels straddles row boundaries.
        let image = create_test_image(5, 30);
        let stego = ImageStego::from_image(image);

        let data = b"wrap around the right edge";

        let hidden = stego.hide(data).unwrap();
        let extracted = ImageStego::from_image(hidden).extract().unwrap();

        assert_eq!(extracted, data);
    }
}
