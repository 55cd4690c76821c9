//! WASM bindings for inspection-report
//!
//! This crate provides JavaScript-friendly API for:
//! - Building an inspection report PDF from plain objects
//! - Checking a report against the entry form rules
//! - Fetching the standard checklist to prefill a form
//!
//! Images are passed as data URIs (`data:image/png;base64,...`).
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { buildInspectionReport, standardChecklist } from 'inspection-report-wasm';
//!
//! await init();
//!
//! const report = buildInspectionReport(
//!   { vehicleLabel: "2019 Toyota Corolla", checklist: standardChecklist(), images: [] },
//!   { companyName: "Acme Motors", fullName: "Jane Doe" },
//! );
//!
//! download(report.bytes(), report.fileName());
//! ```

use inspection_report::{
    standard_checklist, validate_report, InspectionReport, IssuerProfile, LayoutConfig,
    ReportEngine, StatusVocabulary,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Forwards `log` records to the browser console
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

// Initialize panic hook and console logging for the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already installed when the module is initialised twice
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Convert a JS object into a record by way of JSON values
fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    let json: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
    serde_json::from_value(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Report generator with a fixed layout
#[wasm_bindgen]
pub struct ReportBuilder {
    engine: ReportEngine,
}

#[wasm_bindgen]
impl ReportBuilder {
    /// Create a builder with the default A4 layout
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReportBuilder {
        ReportBuilder {
            engine: ReportEngine::default(),
        }
    }

    /// Create a builder from a layout configuration
    ///
    /// Missing keys keep their default values.
    ///
    /// @param json - Layout configuration JSON string
    /// @returns ReportBuilder instance
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<ReportBuilder, JsValue> {
        let config = LayoutConfig::from_json(json).map_err(to_js_error)?;
        Ok(ReportBuilder {
            engine: ReportEngine::new(config),
        })
    }

    /// Build a report
    ///
    /// @param report - Inspection report object
    /// @param issuer - Issuer profile object
    /// @returns GeneratedReport
    pub fn build(&self, report: JsValue, issuer: JsValue) -> Result<GeneratedReport, JsValue> {
        let report: InspectionReport = from_js(report)?;
        let issuer: IssuerProfile = from_js(issuer)?;
        self.generate(&report, &issuer)
    }

    /// Build a report from JSON strings
    ///
    /// @param reportJson - Inspection report JSON string
    /// @param issuerJson - Issuer profile JSON string
    /// @returns GeneratedReport
    #[wasm_bindgen(js_name = buildJson)]
    pub fn build_json(&self, report_json: &str, issuer_json: &str) -> Result<GeneratedReport, JsValue> {
        let report = InspectionReport::from_json(report_json).map_err(to_js_error)?;
        let issuer = IssuerProfile::from_json(issuer_json).map_err(to_js_error)?;
        self.generate(&report, &issuer)
    }

    fn generate(&self, report: &InspectionReport, issuer: &IssuerProfile) -> Result<GeneratedReport, JsValue> {
        let document = self.engine.build(report, issuer).map_err(to_js_error)?;
        Ok(GeneratedReport {
            bytes: document.to_bytes().map_err(to_js_error)?,
            file_name: document.file_name(),
            page_count: document.page_count(),
        })
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished report
#[wasm_bindgen]
pub struct GeneratedReport {
    bytes: Vec<u8>,
    file_name: String,
    page_count: usize,
}

#[wasm_bindgen]
impl GeneratedReport {
    /// PDF bytes (Uint8Array)
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }

    /// Suggested download name
    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Build a report in one call
///
/// @param report - Inspection report object
/// @param issuer - Issuer profile object
/// @param configJson - Optional layout configuration JSON string
/// @returns GeneratedReport
#[wasm_bindgen(js_name = buildInspectionReport)]
pub fn build_inspection_report(
    report: JsValue,
    issuer: JsValue,
    config_json: Option<String>,
) -> Result<GeneratedReport, JsValue> {
    let builder = match config_json {
        Some(json) => ReportBuilder::from_config_json(&json)?,
        None => ReportBuilder::new(),
    };
    builder.build(report, issuer)
}

/// Check a report against the entry form rules
///
/// @param report - Inspection report object
/// @param vocabulary - "standard" (default) or "simple"
/// @returns Array of problem descriptions, empty when the report is valid
#[wasm_bindgen(js_name = validateInspection)]
pub fn validate_inspection(report: JsValue, vocabulary: Option<String>) -> Result<Vec<JsValue>, JsValue> {
    let report: InspectionReport = from_js(report)?;
    let issues = validation_messages(&report, vocabulary.as_deref())?;
    Ok(issues.into_iter().map(|s| JsValue::from_str(&s)).collect())
}

fn validation_messages(report: &InspectionReport, vocabulary: Option<&str>) -> Result<Vec<String>, JsValue> {
    let vocabulary = match vocabulary {
        Some(name) => name.parse::<StatusVocabulary>().map_err(to_js_error)?,
        None => StatusVocabulary::default(),
    };
    Ok(validate_report(report, vocabulary)
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// The standard checklist rows, all marked Good
///
/// @returns Array of { section, label, status, note }
#[wasm_bindgen(js_name = standardChecklist)]
pub fn standard_checklist_js() -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&standard_checklist())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    const REPORT: &str = r#"{
        "vehicleLabel": "2019 Toyota Corolla",
        "vehicleRegNo": "ABC-123-DE",
        "checklist": [{ "section": "Exterior Inspection", "label": "Tires", "status": "Poor" }],
        "images": []
    }"#;

    #[wasm_bindgen_test]
    fn test_build_json() {
        let report = ReportBuilder::new()
            .build_json(REPORT, r#"{ "companyName": "Acme Motors" }"#)
            .unwrap();
        assert_eq!(report.file_name(), "prepurchase-inspection-abc-123-de.pdf");
        assert_eq!(report.page_count(), 1);
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    #[wasm_bindgen_test]
    fn test_validation_messages() {
        let report = InspectionReport::from_json(REPORT).unwrap();
        assert!(validation_messages(&report, None).unwrap().is_empty());

        let issues = validation_messages(&report, Some("simple")).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Tires"));

        let good = InspectionReport::with_standard_checklist();
        assert_eq!(validation_messages(&good, Some("simple")).unwrap().len(), 29);
    }
}
