//! Input validation helpers
//!
//! The engine renders whatever it is given; these checks are for callers
//! that want to reject a report before it is generated.

use crate::config::DEFAULT_MAX_IMAGES;
use crate::schema::{ChecklistStatus, InspectionReport, StatusVocabulary};
use thiserror::Error;

const VIN_LENGTH: usize = 17;

/// A problem found in a report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("VIN must be exactly 17 characters and should not contain I, O, or Q: {0}")]
    InvalidVin(String),

    #[error("Registration number must follow format ABC-123-DE: {0}")]
    InvalidRegistration(String),

    #[error("Checklist row {row} ({label}) uses status '{status}', which is not in the {vocabulary:?} vocabulary")]
    StatusNotAllowed {
        row: usize,
        label: String,
        status: ChecklistStatus,
        vocabulary: StatusVocabulary,
    },

    #[error("Report has {count} photos, at most {max} are allowed")]
    TooManyImages { count: usize, max: usize },
}

/// Canonical registration form: upper-case, unicode dashes as `-`, no whitespace
pub fn normalize_registration(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .flat_map(char::to_uppercase)
        .collect()
}

/// 17 characters from `A-H J-N P R-Z 0-9` (I, O and Q are excluded)
pub fn is_valid_vin(vin: &str) -> bool {
    vin.chars().count() == VIN_LENGTH
        && vin
            .chars()
            .all(|c| c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q')))
}

/// Three letters, three digits, two letters, with optional `-` separators
pub fn is_valid_registration(registration: &str) -> bool {
    let mut rest = registration;

    for (count, is_part, separator_follows) in [
        (3, char::is_ascii_uppercase as fn(&char) -> bool, true),
        (3, char::is_ascii_digit as fn(&char) -> bool, true),
        (2, char::is_ascii_uppercase as fn(&char) -> bool, false),
    ] {
        let part: Vec<char> = rest.chars().take(count).collect();
        if part.len() != count || !part.iter().all(is_part) {
            return false;
        }
        rest = &rest[count..];
        if separator_follows {
            rest = rest.strip_prefix('-').unwrap_or(rest);
        }
    }

    rest.is_empty()
}

/// Check a report against the form rules
///
/// VIN and registration are normalised the way the entry form does before
/// being checked; absent values are not an issue.
pub fn validate_report(report: &InspectionReport, vocabulary: StatusVocabulary) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(vin) = report.vin.as_deref() {
        let vin = vin.trim().to_uppercase();
        if !is_valid_vin(&vin) {
            issues.push(ValidationIssue::InvalidVin(vin));
        }
    }

    if let Some(registration) = report.vehicle_registration.as_deref() {
        let registration = normalize_registration(registration);
        if !is_valid_registration(&registration) {
            issues.push(ValidationIssue::InvalidRegistration(registration));
        }
    }

    for (index, item) in report.checklist.iter().enumerate() {
        if !vocabulary.allows(item.status) {
            issues.push(ValidationIssue::StatusNotAllowed {
                row: index + 1,
                label: item.label.clone(),
                status: item.status,
                vocabulary,
            });
        }
    }

    if report.images.len() > DEFAULT_MAX_IMAGES {
        issues.push(ValidationIssue::TooManyImages {
            count: report.images.len(),
            max: DEFAULT_MAX_IMAGES,
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{standard_checklist, ChecklistItem, ImageSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration(" abc–123—de "), "ABC-123-DE");
        assert_eq!(normalize_registration("abc 123 de"), "ABC123DE");
    }

    #[test]
    fn test_vin_rules() {
        assert!(is_valid_vin("JTDBR32E720123456"));
        assert!(!is_valid_vin("JTDBR32E72012345"));
        assert!(!is_valid_vin("JTDBR32E7201234567"));
        assert!(!is_valid_vin("JTDBR32E72012345O"));
        assert!(!is_valid_vin("jtdbr32e720123456"));
    }

    #[test]
    fn test_registration_rules() {
        assert!(is_valid_registration("ABC-123-DE"));
        assert!(is_valid_registration("ABC123DE"));
        assert!(is_valid_registration("ABC-123DE"));
        assert!(!is_valid_registration("AB-123-DE"));
        assert!(!is_valid_registration("ABC-12-DEF"));
        assert!(!is_valid_registration("ABC--123-DE"));
        assert!(!is_valid_registration("ABC-123-DE1"));
        assert!(!is_valid_registration("ÀBC-123-DE"));
    }

    #[test]
    fn test_valid_report_has_no_issues() {
        let report = InspectionReport {
            vin: Some("jtdbr32e720123456".to_string()),
            vehicle_registration: Some("abc 123 de".to_string()),
            checklist: standard_checklist(),
            ..InspectionReport::default()
        };
        assert!(validate_report(&report, StatusVocabulary::Standard).is_empty());
    }

    #[test]
    fn test_issues_are_reported() {
        let report = InspectionReport {
            vin: Some("SHORT".to_string()),
            vehicle_registration: Some("12-ABC".to_string()),
            checklist: vec![ChecklistItem::new("Safety Equipment", "Jack", ChecklistStatus::Good)],
            images: vec![ImageSource::Bytes(vec![0]); 11],
            ..InspectionReport::default()
        };

        let issues = validate_report(&report, StatusVocabulary::Simple);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::InvalidVin("SHORT".to_string()),
                ValidationIssue::InvalidRegistration("12-ABC".to_string()),
                ValidationIssue::StatusNotAllowed {
                    row: 1,
                    label: "Jack".to_string(),
                    status: ChecklistStatus::Good,
                    vocabulary: StatusVocabulary::Simple,
                },
                ValidationIssue::TooManyImages { count: 11, max: 10 },
            ]
        );
        assert!(issues[3].to_string().contains("at most 10"));
    }
}
