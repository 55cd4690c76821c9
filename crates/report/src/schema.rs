//! Report and issuer records

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Company and inspector details printed on every page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerProfile {
    #[serde(default, deserialize_with = "non_blank")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "non_blank")]
    pub company_address: Option<String>,

    #[serde(default, alias = "fullName", deserialize_with = "non_blank")]
    pub inspector_name: Option<String>,

    /// WhatsApp contact number
    #[serde(default, alias = "phone", deserialize_with = "non_blank")]
    pub contact_phone: Option<String>,

    #[serde(default, alias = "companyLogoDataUrl", deserialize_with = "non_blank_image")]
    pub logo_image: Option<ImageSource>,

    #[serde(default, alias = "signatureDataUrl", deserialize_with = "non_blank_image")]
    pub signature_image: Option<ImageSource>,
}

impl IssuerProfile {
    /// Parse an issuer profile from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Trimmed company name, `None` when absent or blank
    pub fn company(&self) -> Option<&str> {
        trimmed(&self.company_name)
    }

    /// Trimmed inspector name, `None` when absent or blank
    pub fn inspector(&self) -> Option<&str> {
        trimmed(&self.inspector_name)
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Encoded image supplied by the caller
///
/// Strings are data URIs (`data:image/png;base64,...`) or bare base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    DataUri(String),
    Bytes(Vec<u8>),
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        ImageSource::DataUri(value.to_string())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(value: Vec<u8>) -> Self {
        ImageSource::Bytes(value)
    }
}

/// One completed inspection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    /// Display label, e.g. "2019 Toyota Corolla"
    #[serde(default, deserialize_with = "non_blank")]
    pub vehicle_label: Option<String>,

    #[serde(default, alias = "vehicleRegNo", deserialize_with = "non_blank")]
    pub vehicle_registration: Option<String>,

    #[serde(default, deserialize_with = "non_blank")]
    pub vin: Option<String>,

    /// Odometer reading in km; numbers are accepted and kept as text
    #[serde(default, deserialize_with = "non_blank_text_or_number")]
    pub mileage: Option<String>,

    #[serde(default, deserialize_with = "non_blank")]
    pub transmission: Option<String>,

    #[serde(default, deserialize_with = "non_blank")]
    pub fuel_type: Option<String>,

    #[serde(default)]
    pub inspected_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,

    #[serde(default)]
    pub images: Vec<ImageSource>,

    #[serde(default)]
    pub overall_verdict: Verdict,

    #[serde(default)]
    pub recommendation: String,
}

impl InspectionReport {
    /// Parse a report from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Report with the standard checklist and nothing else filled in
    pub fn with_standard_checklist() -> Self {
        Self {
            checklist: standard_checklist(),
            ..Self::default()
        }
    }
}

/// One checklist row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub label: String,
    pub status: ChecklistStatus,
    #[serde(default)]
    pub note: String,
}

impl ChecklistItem {
    pub fn new(section: &str, label: &str, status: ChecklistStatus) -> Self {
        Self {
            section: section.to_string(),
            label: label.to_string(),
            status,
            note: String::new(),
        }
    }

    /// Set the inspector's comment
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }
}

/// Condition recorded for a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistStatus {
    Good,
    #[serde(rename = "OK", alias = "Ok")]
    Ok,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    Poor,
    #[serde(rename = "N/A", alias = "N-A", alias = "NA")]
    NotApplicable,
}

impl ChecklistStatus {
    /// Text printed in the status column
    pub fn label(self) -> &'static str {
        match self {
            ChecklistStatus::Good => "Good",
            ChecklistStatus::Ok => "OK",
            ChecklistStatus::NeedsAttention => "Needs Attention",
            ChecklistStatus::Poor => "Poor",
            ChecklistStatus::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChecklistStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(ChecklistStatus::Good),
            "ok" => Ok(ChecklistStatus::Ok),
            "needs attention" => Ok(ChecklistStatus::NeedsAttention),
            "poor" => Ok(ChecklistStatus::Poor),
            "n/a" | "n-a" | "na" => Ok(ChecklistStatus::NotApplicable),
            other => Err(format!("Unknown checklist status: {other}")),
        }
    }
}

/// Allowed set of checklist statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusVocabulary {
    /// Good / Needs Attention / Poor
    #[default]
    Standard,
    /// OK / Needs Attention / N/A
    Simple,
}

impl StatusVocabulary {
    pub fn statuses(self) -> &'static [ChecklistStatus] {
        match self {
            StatusVocabulary::Standard => &[
                ChecklistStatus::Good,
                ChecklistStatus::NeedsAttention,
                ChecklistStatus::Poor,
            ],
            StatusVocabulary::Simple => &[
                ChecklistStatus::Ok,
                ChecklistStatus::NeedsAttention,
                ChecklistStatus::NotApplicable,
            ],
        }
    }

    pub fn allows(self, status: ChecklistStatus) -> bool {
        self.statuses().contains(&status)
    }
}

impl FromStr for StatusVocabulary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(StatusVocabulary::Standard),
            "simple" => Ok(StatusVocabulary::Simple),
            other => Err(format!("Unknown status vocabulary: {other}")),
        }
    }
}

/// Overall outcome of the inspection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
    #[default]
    Pending,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Excellent => "Excellent",
            Verdict::Good => "Good",
            Verdict::Fair => "Fair",
            Verdict::Poor => "Poor",
            Verdict::Pending => "Pending",
        };
        f.write_str(label)
    }
}

const STANDARD_SECTIONS: [(&str, &[&str]); 7] = [
    (
        "Exterior Inspection",
        &["Body Condition", "Headlights", "Glass & Mirrors", "Tires", "License Plates"],
    ),
    (
        "Interior Inspection",
        &["Seatbelts", "Dashboard", "Controls", "Seats & Upholstery", "Floor Mats"],
    ),
    (
        "Engine Compartment",
        &["Fluid Levels", "Belts & Hoses", "Battery", "Engine Condition"],
    ),
    (
        "Undercarriage Inspection",
        &["Exhaust System", "Suspension", "Brakes", "Steering"],
    ),
    (
        "Safety Equipment",
        &["Spare Tire & Tools", "Jack", "Warning Triangles", "First Aid Kit"],
    ),
    (
        "Vehicle Documentation",
        &["Registration", "Insurance", "Service Records", "Owner Manual"],
    ),
    (
        "Compliance & Emissions",
        &["Emission Control", "Inspection Sticker", "Local Compliance"],
    ),
];

/// The default checklist: every item starts as `Good` with no comment
pub fn standard_checklist() -> Vec<ChecklistItem> {
    STANDARD_SECTIONS
        .iter()
        .flat_map(|(section, items)| {
            items
                .iter()
                .map(move |label| ChecklistItem::new(section, label, ChecklistStatus::Good))
        })
        .collect()
}

/// Blank strings deserialize to `None`
fn non_blank<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn non_blank_text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<TextOrNumber> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(TextOrNumber::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(TextOrNumber::Integer(n)) => Some(n.to_string()),
        Some(TextOrNumber::Float(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn non_blank_image<'de, D>(deserializer: D) -> std::result::Result<Option<ImageSource>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<ImageSource> = Option::deserialize(deserializer)?;
    Ok(value.filter(|source| match source {
        ImageSource::DataUri(s) => !s.trim().is_empty(),
        ImageSource::Bytes(b) => !b.is_empty(),
    }))
}
