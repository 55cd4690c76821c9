//! PDF Core - Page canvas for generated reports
//!
//! This crate provides functionality for:
//! - Creating A4 documents page by page
//! - Drawing text with the built-in Helvetica faces (measured, wrapped, rotated)
//! - Drawing filled/stroked rectangles, rounded rectangles and lines
//! - Inserting images (JPEG, PNG, WEBP)
//!
//! Draw calls are buffered per page and encoded when the document is saved.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{PdfDocument, Align, FontWeight};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_blank_page()?;
//! doc.set_font(FontWeight::Bold, 16.0);
//! doc.insert_text("Hello, World!", page, 40.0, 60.0, Align::Left)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{Color, DrawOp, PdfDocument, RectStyle};
pub use font::{FontWeight, StandardFont};
pub use image::{
    calculate_scaled_dimensions, detect_format, fit_centered, ImageFormat, ImageScaleMode,
    ImageXObject,
};
pub use text::{calculate_x_offset, word_wrap};

use thiserror::Error;

/// A4 page width in points
pub const A4_WIDTH: f64 = 595.28;

/// A4 page height in points
pub const A4_HEIGHT: f64 = 841.89;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
