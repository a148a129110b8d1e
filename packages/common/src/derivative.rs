//! Normalizing uploaded images and deriving thumbnails from them.
//!
//! Every output is re-encoded as JPEG regardless of the input encoding, so
//! stored assets share one format.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

/// MIME type of every encoded output.
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";
/// File extension of every encoded output.
pub const OUTPUT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum DerivativeError {
    #[error("Invalid file type '{0}'. Allowed: JPEG, PNG, WebP")]
    UnsupportedType(String),
    #[error("File content is not a {0} image")]
    ContentMismatch(&'static str),
    #[error("File too large ({actual} bytes). Max {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Input encodings accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
}

impl SourceFormat {
    pub const ALL: &'static [SourceFormat] = &[Self::Jpeg, Self::Png, Self::WebP];

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Look up an allowed format by its declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.mime().eq_ignore_ascii_case(essence))
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Detect the encoding of `bytes` from its magic number.
pub fn sniff_format(bytes: &[u8]) -> Result<SourceFormat, DerivativeError> {
    image::guess_format(bytes)
        .ok()
        .and_then(SourceFormat::from_image_format)
        .ok_or_else(|| DerivativeError::UnsupportedType("unrecognized content".into()))
}

/// Target size and quality of a derivative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivativeConfig {
    pub max_width: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            quality: 80,
        }
    }
}

/// An encoded JPEG and its pixel dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Height that keeps the aspect ratio when scaling `width x height` to `target_width`.
fn proportional_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2) / u64::from(width);
    u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
}

/// Shrink `image` to at most `max_width` pixels wide; never upscales.
pub fn fit_width(image: &DynamicImage, max_width: u32) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    if max_width == 0 || width <= max_width {
        return None;
    }
    let target_height = proportional_height(width, height, max_width);
    Some(image.resize_exact(max_width, target_height, FilterType::Lanczos3))
}

/// Encode `image` as a baseline JPEG.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<EncodedImage, DerivativeError> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(DerivativeError::Encode)?;
    Ok(EncodedImage {
        bytes,
        width: rgb.width(),
        height: rgb.height(),
    })
}

fn decode(bytes: &[u8], format: SourceFormat) -> Result<DynamicImage, DerivativeError> {
    image::load_from_memory_with_format(bytes, format.image_format()).map_err(DerivativeError::Decode)
}

/// Produce a thumbnail of an encoded image: width at most `config.max_width`,
/// proportional height, JPEG at `config.quality`.
pub fn derive_thumbnail(original: &[u8], config: DerivativeConfig) -> Result<EncodedImage, DerivativeError> {
    let format = sniff_format(original)?;
    let image = decode(original, format)?;
    thumbnail_of(&image, config)
}

fn thumbnail_of(image: &DynamicImage, config: DerivativeConfig) -> Result<EncodedImage, DerivativeError> {
    match fit_width(image, config.max_width) {
        Some(resized) => encode_jpeg(&resized, config.quality),
        None => encode_jpeg(image, config.quality),
    }
}

/// Result of running an upload through the pipeline.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    /// The original, normalized to JPEG at full size.
    pub original: EncodedImage,
    pub thumbnail: EncodedImage,
    pub source_format: SourceFormat,
}

/// Validation limits and encoding settings for uploaded images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivativePipeline {
    /// Largest accepted input in bytes.
    pub max_input_bytes: u64,
    /// JPEG quality of the normalized original.
    pub original_quality: u8,
    pub thumbnail: DerivativeConfig,
}

impl Default for DerivativePipeline {
    fn default() -> Self {
        Self {
            max_input_bytes: 10 * 1024 * 1024,
            original_quality: 90,
            thumbnail: DerivativeConfig::default(),
        }
    }
}

impl DerivativePipeline {
    /// Reject a declared MIME type outside the allow-list.
    pub fn check_declared_type(&self, declared: &str) -> Result<SourceFormat, DerivativeError> {
        SourceFormat::from_mime(declared)
            .ok_or_else(|| DerivativeError::UnsupportedType(declared.to_string()))
    }

    /// Reject an input above the byte ceiling.
    pub fn check_size(&self, actual: u64) -> Result<(), DerivativeError> {
        if actual > self.max_input_bytes {
            return Err(DerivativeError::TooLarge {
                actual,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }

    /// Validate, decode, normalize and derive.
    ///
    /// When `declared` is given, the sniffed content must agree with it.
    pub fn process(&self, bytes: &[u8], declared: Option<&str>) -> Result<ProcessedImage, DerivativeError> {
        let expected = declared.map(|mime| self.check_declared_type(mime)).transpose()?;
        self.check_size(bytes.len() as u64)?;

        let detected = sniff_format(bytes)?;
        if let Some(expected) = expected
            && expected != detected
        {
            return Err(DerivativeError::ContentMismatch(expected.mime()));
        }

        let image = decode(bytes, detected)?;
        let original = encode_jpeg(&image, self.original_quality)?;
        let thumbnail = thumbnail_of(&image, self.thumbnail)?;

        Ok(ProcessedImage {
            original,
            thumbnail,
            source_format: detected,
        })
    }
}
