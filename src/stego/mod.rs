//! Steganography module for hiding data in images.
//!
//! Image LSB parity steganography (PNG, BMP - lossless formats only).

pub mod image;

pub use image::{capacity_from_bytes, ImageStego, ImageStegoError};
