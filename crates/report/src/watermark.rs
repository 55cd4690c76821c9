//! Diagonal watermark stamped over finished pages

use crate::config::{rgb, LayoutConfig};
use crate::schema::IssuerProfile;
use crate::Result;
use pdf_core::{FontWeight, PdfDocument};

const WATERMARK_FALLBACK: &str = "Inspection";

/// Watermark text: the company name, or a generic label
pub fn watermark_text(issuer: &IssuerProfile) -> String {
    issuer.company().unwrap_or(WATERMARK_FALLBACK).to_string()
}

/// Stamp one watermark at the centre of every page
///
/// Runs after layout has finished, so pages created by any section are
/// covered. Calling it again would stamp a second mark.
pub fn render_all(canvas: &mut PdfDocument, text: &str, config: &LayoutConfig) -> Result<()> {
    canvas.set_font(FontWeight::Regular, config.watermark_font_size);
    canvas.set_text_color(rgb(config.watermark_color));

    let center_x = canvas.page_width() / 2.0;
    let center_y = canvas.page_height() / 2.0;
    for page in 1..=canvas.page_count() {
        canvas.insert_text_rotated(
            text,
            page,
            center_x,
            center_y,
            config.watermark_angle,
            Some(config.watermark_opacity),
        )?;
    }

    Ok(())
}
