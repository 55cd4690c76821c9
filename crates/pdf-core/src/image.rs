//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Stream};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

/// Image scaling mode for insert_image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact dimensions
    Stretch,
    /// Scale proportionally based on width, auto-calculate height
    FitWidth,
    /// Scale proportionally based on height, auto-calculate width
    FitHeight,
    /// Fit within bounding box, preserving aspect ratio
    #[default]
    FitBox,
}

/// Calculate display dimensions based on scaling mode
///
/// # Arguments
/// * `original_width` - Original image width in pixels
/// * `original_height` - Original image height in pixels
/// * `target_width` - Target width in points
/// * `target_height` - Target height in points
/// * `mode` - Scaling mode
///
/// # Returns
/// (actual_width, actual_height) in points
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    if original_width == 0 || original_height == 0 {
        return (target_width, target_height);
    }

    match mode {
        ImageScaleMode::Stretch => (target_width, target_height),
        ImageScaleMode::FitWidth => {
            let aspect = original_height as f64 / original_width as f64;
            (target_width, target_width * aspect)
        }
        ImageScaleMode::FitHeight => {
            let aspect = original_width as f64 / original_height as f64;
            (target_height * aspect, target_height)
        }
        ImageScaleMode::FitBox => {
            let width_ratio = target_width / original_width as f64;
            let height_ratio = target_height / original_height as f64;
            let scale = width_ratio.min(height_ratio);
            (
                original_width as f64 * scale,
                original_height as f64 * scale,
            )
        }
    }
}

/// Fit an image inside a box and center it
///
/// Returns (x, y, width, height) of the placed image, all in points with the
/// same origin as the box.
pub fn fit_centered(
    original_width: u32,
    original_height: u32,
    box_x: f64,
    box_y: f64,
    box_width: f64,
    box_height: f64,
) -> (f64, f64, f64, f64) {
    let (width, height) = calculate_scaled_dimensions(
        original_width,
        original_height,
        box_width,
        box_height,
        ImageScaleMode::FitBox,
    );
    (
        box_x + (box_width - width) / 2.0,
        box_y + (box_height - height) / 2.0,
        width,
        height,
    )
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    // JPEG starts with FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG starts with 89 50 4E 47 0D 0A 1A 0A
    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    // WEBP is a RIFF container: "RIFF" <size> "WEBP"
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Ok(ImageFormat::Webp);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// JPEG info including dimensions and color components
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray", "DeviceCMYK")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" otherwise)
    pub filter: String,
    /// Raw image data (compressed)
    pub data: Vec<u8>,
}

/// Get JPEG info including dimensions and color components
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    // Walk the marker segments until a start-of-frame marker.
    // SOF layout: marker (2), length (2), precision (1), height (2), width (2), components (1)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let num_components = data[i + 9];
            if width == 0 || height == 0 {
                break;
            }
            return Ok(JpegInfo {
                width,
                height,
                num_components,
            });
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

impl ImageXObject {
    /// Create an XObject from encoded image bytes
    ///
    /// The format is sniffed from the magic bytes; when that fails the
    /// caller's hint is used, falling back to JPEG.
    pub fn from_bytes(data: &[u8], hint: Option<ImageFormat>) -> Result<Self> {
        let format = detect_format(data)
            .ok()
            .or(hint)
            .unwrap_or(ImageFormat::Jpeg);

        match format {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png | ImageFormat::Webp => Self::from_decoded(data),
        }
    }

    /// Create XObject from JPEG data
    ///
    /// JPEG images are embedded as-is with the DCTDecode filter. The data is
    /// decoded once up front, so a readable header over a broken scan is
    /// rejected here instead of showing up broken in the viewer.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let info = get_jpeg_info(data)?;
        image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?;

        let color_space = match info.num_components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        })
    }

    /// Create XObject from PNG or WEBP data
    ///
    /// The image is decoded and re-encoded as raw samples with FlateDecode.
    /// Alpha channels are blended onto a white background.
    pub fn from_decoded(data: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let dims = decoder.dimensions();
        let color_type = decoder.color_type();

        let image = DynamicImage::from_decoder(decoder)?;

        let (raw_data, color_space) = match color_type {
            // Pure grayscale - keep as grayscale for smaller size
            image::ColorType::L8 | image::ColorType::L16 => {
                let gray = image.to_luma8();
                (gray.into_raw(), "DeviceGray")
            }
            // Grayscale with alpha - blend with white, output grayscale
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = image.to_luma_alpha8();
                let mut gray_data = Vec::with_capacity((dims.0 * dims.1) as usize);
                for pixel in la.pixels() {
                    gray_data.push(blend_on_white(pixel[0], pixel[1]));
                }
                (gray_data, "DeviceGray")
            }
            // RGBA - blend with white background, output RGB
            image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
                let rgba = image.to_rgba8();
                let mut rgb_data = Vec::with_capacity((dims.0 * dims.1 * 3) as usize);
                for pixel in rgba.pixels() {
                    rgb_data.push(blend_on_white(pixel[0], pixel[3]));
                    rgb_data.push(blend_on_white(pixel[1], pixel[3]));
                    rgb_data.push(blend_on_white(pixel[2], pixel[3]));
                }
                (rgb_data, "DeviceRGB")
            }
            _ => {
                let rgb = image.to_rgb8();
                (rgb.into_raw(), "DeviceRGB")
            }
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw_data)?;
        let data = encoder.finish()?;

        Ok(Self {
            width: dims.0,
            height: dims.1,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data,
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );

        // DCT/Flate data is already compressed; keep lopdf from touching it
        Stream::new(dict, self.data.clone()).with_compression(false)
    }
}

fn blend_on_white(value: u8, alpha: u8) -> u8 {
    let alpha = alpha as f32 / 255.0;
    (value as f32 * alpha + 255.0 * (1.0 - alpha)) as u8
}

/// Generate operators to draw image at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub(crate) fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm\n/{image_name} Do\nQ\n").into_bytes()
}
