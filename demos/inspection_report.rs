//! Inspection Report Demo - builds a complete sample report
//!
//! This example shows:
//! - Loading the issuer profile from JSON
//! - Prefilling the standard checklist and marking a few findings
//! - Attaching photos as data URIs, including one that cannot be decoded
//! - Validating the report before generation
//!
//! Run with: cargo run --example inspection_report -p inspection-report

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use chrono::{TimeZone, Utc};
use inspection_report::{
    validate_report, ChecklistStatus, ImageSource, InspectionReport, IssuerProfile, LayoutConfig,
    ReportEngine, StatusVocabulary, Verdict,
};

fn main() -> anyhow::Result<()> {
    std::fs::create_dir_all("output")?;

    let issuer = IssuerProfile::from_json(
        r#"{
            "companyName": "Acme Motors",
            "companyAddress": "14 Industrial Layout, Ikeja, Lagos",
            "fullName": "Jane Doe",
            "phone": "+234 800 000 0000"
        }"#,
    )?;

    let mut report = InspectionReport::with_standard_checklist();
    report.vehicle_label = Some("2019 Toyota Corolla LE".to_string());
    report.vehicle_registration = Some("ABC-123-DE".to_string());
    report.vin = Some("JTDBR32E720123456".to_string());
    report.mileage = Some("84500".to_string());
    report.transmission = Some("Automatic".to_string());
    report.fuel_type = Some("Petrol".to_string());
    report.inspected_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single();
    report.overall_verdict = Verdict::Good;
    report.recommendation = "Replace the front brake pads within the next 1,000 km. \
        The rear left tyre shows uneven wear and should be rotated at the next service."
        .to_string();

    for item in report.checklist.iter_mut() {
        match item.label.as_str() {
            "Brakes" => {
                item.status = ChecklistStatus::NeedsAttention;
                item.note = "About 30% remaining".to_string();
            }
            "Tires" => {
                item.status = ChecklistStatus::Poor;
                item.note = "Uneven wear on rear left".to_string();
            }
            _ => {}
        }
    }

    report.images = vec![
        photo([180, 40, 40])?,
        photo([40, 120, 180])?,
        ImageSource::DataUri("data:image/jpeg;base64,not-an-image".to_string()),
    ];

    let issues = validate_report(&report, StatusVocabulary::Standard);
    for issue in &issues {
        println!("Validation: {issue}");
    }

    let engine = ReportEngine::new(LayoutConfig::default());
    let document = engine.build(&report, &issuer)?;

    let path = format!("output/{}", document.file_name());
    document
        .save(&path)
        .with_context(|| format!("Failed to write {path}"))?;

    println!("Wrote {} ({} pages)", path, document.page_count());
    Ok(())
}

/// Solid 320x200 PNG as a data URI
fn photo(color: [u8; 3]) -> anyhow::Result<ImageSource> {
    let img = image::RgbImage::from_pixel(320, 200, image::Rgb(color));
    let mut buffer = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(ImageSource::DataUri(format!(
        "data:image/png;base64,{}",
        BASE64_STD.encode(buffer)
    )))
}
