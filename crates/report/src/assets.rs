//! Image resolution ahead of layout
//!
//! Every photo, logo and signature is decoded before the first page is
//! created, so layout code only ever sees ready XObjects or an explicit
//! error to render a placeholder for.

use crate::config::LayoutConfig;
use crate::schema::{ImageSource, InspectionReport, IssuerProfile};
use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use pdf_core::{ImageFormat, ImageXObject};
use thiserror::Error;

/// Why an image could not be placed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImagePlacementError {
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Base64 decode error: {0}")]
    Base64(String),

    #[error("Image decode error: {0}")]
    Decode(String),
}

/// Images of one report, decoded and ready to draw
#[derive(Debug, Default)]
pub struct ResolvedAssets {
    pub logo: Option<ImageXObject>,
    pub signature: Option<ImageXObject>,
    /// Photos in input order; failures keep their slot
    pub photos: Vec<Result<ImageXObject, ImagePlacementError>>,
}

impl ResolvedAssets {
    /// Decode the issuer's logo and signature and the report's photos
    ///
    /// Photos beyond `config.max_images` are dropped. Unreadable logos and
    /// signatures are omitted; unreadable photos keep an error in their slot.
    pub fn resolve(report: &InspectionReport, issuer: &IssuerProfile, config: &LayoutConfig) -> Self {
        let logo = issuer
            .logo_image
            .as_ref()
            .and_then(|source| match resolve_image(source) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Skipping company logo: {e}");
                    None
                }
            });

        let signature = issuer
            .signature_image
            .as_ref()
            .and_then(|source| match resolve_image(source) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Skipping signature image: {e}");
                    None
                }
            });

        if report.images.len() > config.max_images {
            log::warn!(
                "Report has {} photos, only the first {} are included",
                report.images.len(),
                config.max_images
            );
        }

        let photos = report
            .images
            .iter()
            .take(config.max_images)
            .enumerate()
            .map(|(index, source)| {
                resolve_image(source).inspect_err(|e| {
                    log::warn!("Photo {} will show a placeholder: {e}", index + 1);
                })
            })
            .collect();

        Self {
            logo,
            signature,
            photos,
        }
    }
}

/// Decode an image source into an XObject
pub fn resolve_image(source: &ImageSource) -> Result<ImageXObject, ImagePlacementError> {
    let (bytes, hint) = decode_source(source)?;
    ImageXObject::from_bytes(&bytes, hint).map_err(|e| ImagePlacementError::Decode(e.to_string()))
}

/// Raw bytes of a source plus the format its data URI declares
pub fn decode_source(
    source: &ImageSource,
) -> Result<(Vec<u8>, Option<ImageFormat>), ImagePlacementError> {
    match source {
        ImageSource::Bytes(bytes) => Ok((bytes.clone(), None)),
        ImageSource::DataUri(text) => {
            let text = text.trim();
            let Some(rest) = text.strip_prefix("data:") else {
                // Bare base64 payload
                let bytes = decode_base64(text)?;
                return Ok((bytes, None));
            };

            let comma = rest.find(',').ok_or_else(|| {
                ImagePlacementError::InvalidDataUri("missing ',' separator".to_string())
            })?;
            let header = &rest[..comma];
            if !header.contains(";base64") {
                return Err(ImagePlacementError::InvalidDataUri(
                    "only base64 data URIs are supported".to_string(),
                ));
            }

            let bytes = decode_base64(&rest[comma + 1..])?;
            Ok((bytes, Some(format_hint(header))))
        }
    }
}

/// Format named by a data URI header; anything unrecognised is JPEG
fn format_hint(header: &str) -> ImageFormat {
    if header.starts_with("image/png") {
        ImageFormat::Png
    } else if header.starts_with("image/webp") {
        ImageFormat::Webp
    } else {
        ImageFormat::Jpeg
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, ImagePlacementError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STD
        .decode(compact.as_bytes())
        .map_err(|e| ImagePlacementError::Base64(e.to_string()))
}
