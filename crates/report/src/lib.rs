//! Inspection Report - paginated PDF generation for vehicle inspections
//!
//! This crate provides:
//! - Report and issuer records loadable from JSON
//! - Layout configuration with the default A4 report look
//! - Page flow with a single page-break policy shared by every section
//! - Header band, checklist table, photo gallery, signature and watermark
//! - Download file naming and input validation helpers
//!
//! # Example
//!
//! ```ignore
//! use inspection_report::{InspectionReport, IssuerProfile, LayoutConfig, ReportEngine};
//!
//! let report = InspectionReport::from_json(report_json)?;
//! let issuer = IssuerProfile::from_json(issuer_json)?;
//! let document = ReportEngine::new(LayoutConfig::default()).build(&report, &issuer)?;
//! document.save(document.file_name())?;
//! ```

mod assets;
mod config;
mod engine;
mod gallery;
mod header;
mod layout;
mod naming;
mod schema;
mod signature;
mod summary;
mod table;
pub mod validate;
mod watermark;

pub use assets::{ImagePlacementError, ResolvedAssets};
pub use config::{LayoutConfig, DEFAULT_MAX_IMAGES};
pub use engine::{ReportDocument, ReportEngine};
pub use header::HeaderBand;
pub use layout::{CancellationToken, PageFlow};
pub use naming::{file_name, file_stem, sanitize_file_token};
pub use schema::*;
pub use validate::{validate_report, ValidationIssue};
pub use watermark::{render_all as render_watermarks, watermark_text};

use thiserror::Error;

/// Errors that can occur while building a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout configuration: {0}")]
    Config(String),

    #[error("Report generation was cancelled")]
    Cancelled,
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ReportError::Config("page height".to_string()).to_string(),
            "Invalid layout configuration: page height"
        );
        assert_eq!(
            ReportError::Cancelled.to_string(),
            "Report generation was cancelled"
        );
    }

    #[test]
    fn test_pdf_error_converts() {
        let err: ReportError = pdf_core::PdfError::InvalidPage(3, 1).into();
        assert!(matches!(err, ReportError::Pdf(_)));
    }
}
