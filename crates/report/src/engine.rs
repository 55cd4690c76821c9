//! Report assembly

use crate::assets::ResolvedAssets;
use crate::config::LayoutConfig;
use crate::header::HeaderBand;
use crate::layout::{CancellationToken, PageFlow};
use crate::schema::{InspectionReport, IssuerProfile};
use crate::{gallery, naming, signature, summary, table, watermark, Result};
use pdf_core::PdfDocument;
use std::path::Path;

/// Builds inspection reports with a fixed layout configuration
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    config: LayoutConfig,
}

impl ReportEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a complete report
    ///
    /// Sections are placed in order: summary, checklist, recommendation,
    /// photos, signature. The watermark is stamped once every page exists.
    /// Unreadable images never fail the build.
    pub fn build(&self, report: &InspectionReport, issuer: &IssuerProfile) -> Result<ReportDocument> {
        self.build_with_cancel(report, issuer, &CancellationToken::new())
    }

    /// Same as [`build`](Self::build), stopping with `ReportError::Cancelled`
    /// at the next page creation once `cancel` is set
    pub fn build_with_cancel(
        &self,
        report: &InspectionReport,
        issuer: &IssuerProfile,
        cancel: &CancellationToken,
    ) -> Result<ReportDocument> {
        let config = &self.config;
        config.validate()?;

        let assets = ResolvedAssets::resolve(report, issuer, config);
        let header = HeaderBand::new(issuer, assets.logo.as_ref(), config);
        let mut flow = PageFlow::begin(config, header, cancel)?;

        summary::render_summary(&mut flow, report)?;
        table::render(&mut flow, &report.checklist)?;
        summary::render_recommendation(&mut flow, &report.recommendation)?;
        gallery::render(&mut flow, &assets.photos)?;
        signature::render(&mut flow, issuer, assets.signature.as_ref())?;

        let mut canvas = flow.finish();
        watermark::render_all(&mut canvas, &watermark::watermark_text(issuer), config)?;

        let file_stem = naming::file_stem(report);
        canvas.set_title(&format!("Pre-Purchase Inspection {file_stem}"));

        log::info!(
            "Built inspection report '{}': {} pages, {} checklist rows, {} photos",
            file_stem,
            canvas.page_count(),
            report.checklist.len(),
            assets.photos.len()
        );

        Ok(ReportDocument { canvas, file_stem })
    }
}

/// A finished report ready to be written out
pub struct ReportDocument {
    canvas: PdfDocument,
    file_stem: String,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    /// The laid-out pages
    pub fn canvas(&self) -> &PdfDocument {
        &self.canvas
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Suggested download name, `prepurchase-inspection-<stem>.pdf`
    pub fn file_name(&self) -> String {
        naming::file_name_from_stem(&self.file_stem)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.canvas.to_bytes()?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.canvas.save(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChecklistItem, ChecklistStatus, ImageSource};
    use crate::ReportError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_minimal_report() {
        let engine = ReportEngine::default();
        let document = engine
            .build(&InspectionReport::default(), &IssuerProfile::default())
            .unwrap();

        assert_eq!(document.page_count(), 1);
        assert_eq!(document.file_name(), "prepurchase-inspection-vehicle.pdf");
        assert!(document.to_bytes().unwrap().starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_file_name_matches_naming_helper() {
        let report = InspectionReport {
            vehicle_registration: Some("ABC 123 DE".to_string()),
            ..InspectionReport::default()
        };
        let document = ReportEngine::default()
            .build(&report, &IssuerProfile::default())
            .unwrap();
        assert_eq!(document.file_name(), naming::file_name(&report));
    }

    #[test]
    fn test_invalid_config_fails_before_layout() {
        let config = LayoutConfig {
            page_height: 0.0,
            ..LayoutConfig::default()
        };
        let result = ReportEngine::new(config).build(&InspectionReport::default(), &IssuerProfile::default());
        assert!(matches!(result, Err(ReportError::Config(_))));
    }

    #[test]
    fn test_cancelled_build() {
        let token = CancellationToken::new();
        token.cancel();
        let result = ReportEngine::default().build_with_cancel(
            &InspectionReport::default(),
            &IssuerProfile::default(),
            &token,
        );
        assert!(matches!(result, Err(ReportError::Cancelled)));
    }

    #[test]
    fn test_corrupt_images_do_not_fail_build() {
        let report = InspectionReport {
            checklist: vec![ChecklistItem::new("Exterior Inspection", "Tires", ChecklistStatus::Poor)],
            images: vec![ImageSource::DataUri("data:image/jpeg;base64,!!!".to_string())],
            ..InspectionReport::default()
        };
        let issuer = IssuerProfile {
            logo_image: Some(ImageSource::Bytes(vec![1, 2, 3])),
            signature_image: Some(ImageSource::DataUri("not base64 at all".to_string())),
            ..IssuerProfile::default()
        };
        let document = ReportEngine::default().build(&report, &issuer).unwrap();
        assert_eq!(document.page_count(), 1);
    }
}
