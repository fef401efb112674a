//! Decode, resize and re-encode a single image.
//!
//! Everything here is CPU bound and synchronous; the handler runs it on the blocking pool.

use crate::error::ResizeError;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use tracing::debug;

pub const TARGET_WIDTH: u32 = 200;
pub const TARGET_HEIGHT: u32 = 200;

/// Encoding used when the source format can't be written back.
pub const FALLBACK_FORMAT: ImageFormat = ImageFormat::Jpeg;

// Bicubic.
const FILTER: FilterType = FilterType::CatmullRom;

/// Which encoding the resized image is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Same encoding as the source object.
    Detected(ImageFormat),
    /// The source encoding was unknown or can't be encoded; use [`FALLBACK_FORMAT`].
    Fallback,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Detected(format) => format,
            OutputFormat::Fallback => FALLBACK_FORMAT,
        }
    }
}

#[derive(Debug)]
pub struct ResizedImage {
    pub bytes: Vec<u8>,
    pub output: OutputFormat,
    pub width: u32,
    pub height: u32,
}

pub fn choose_output_format(detected: Option<ImageFormat>) -> OutputFormat {
    match detected {
        Some(format) if is_encodable(format) => OutputFormat::Detected(format),
        _ => OutputFormat::Fallback,
    }
}

// Any format `write_to` has an encoder for in the enabled `image` features.
fn is_encodable(format: ImageFormat) -> bool {
    !matches!(
        ImageOutputFormat::from(format),
        ImageOutputFormat::Unsupported(_)
    )
}

pub fn resize_image(bytes: &[u8]) -> Result<ResizedImage, ResizeError> {
    let (img, detected) = decode(bytes)?;
    let (source_width, source_height) = img.dimensions();
    debug!(
        "Decoded {:?} image of {}x{}",
        detected, source_width, source_height
    );

    let resized = img.resize_exact(TARGET_WIDTH, TARGET_HEIGHT, FILTER);
    let output = choose_output_format(detected);
    let bytes = encode(&resized, output)?;
    let (width, height) = resized.dimensions();

    Ok(ResizedImage {
        bytes,
        output,
        width,
        height,
    })
}

fn decode(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), ResizeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ResizeError::Decode { source: e.into() })?;
    let detected = reader.format();

    let img = reader
        .decode()
        .map_err(|source| ResizeError::Decode { source })?;

    Ok((img, detected))
}

pub fn encode(img: &DynamicImage, output: OutputFormat) -> Result<Vec<u8>, ResizeError> {
    let format = output.image_format();
    let mut buffer = Cursor::new(Vec::new());

    // JPEG has no alpha channel and only 8-bit samples.
    let written = if format == ImageFormat::Jpeg
        && !matches!(img.color(), ColorType::L8 | ColorType::Rgb8)
    {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buffer, format)
    } else {
        img.write_to(&mut buffer, format)
    };
    written.map_err(|source| ResizeError::Encode { format, source })?;

    Ok(buffer.into_inner())
}
