//! Download file naming

use crate::schema::InspectionReport;

const STEM_FALLBACK: &str = "vehicle";
const FILE_PREFIX: &str = "prepurchase-inspection-";

/// Characters that are unsafe in file names on common filesystems
const PATH_HOSTILE: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Stem identifying the vehicle: registration, else label, else "vehicle"
pub fn file_stem(report: &InspectionReport) -> String {
    [&report.vehicle_registration, &report.vehicle_label]
        .into_iter()
        .flatten()
        .map(|value| sanitize_file_token(value))
        .find(|token| !token.is_empty())
        .unwrap_or_else(|| STEM_FALLBACK.to_string())
}

/// `prepurchase-inspection-<stem>.pdf`
pub fn file_name(report: &InspectionReport) -> String {
    file_name_from_stem(&file_stem(report))
}

pub(crate) fn file_name_from_stem(stem: &str) -> String {
    format!("{FILE_PREFIX}{stem}.pdf")
}

/// Lower-case a value and turn whitespace runs and path-hostile characters into `-`
pub fn sanitize_file_token(value: &str) -> String {
    let mut token = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for c in value.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                token.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if PATH_HOSTILE.contains(&c) || c.is_control() {
            token.push('-');
        } else {
            token.extend(c.to_lowercase());
        }
    }

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report(registration: Option<&str>, label: Option<&str>) -> InspectionReport {
        InspectionReport {
            vehicle_registration: registration.map(str::to_string),
            vehicle_label: label.map(str::to_string),
            ..InspectionReport::default()
        }
    }

    #[test]
    fn test_registration_wins() {
        let r = report(Some("ABC-123-DE"), Some("2019 Toyota Corolla"));
        assert_eq!(file_name(&r), "prepurchase-inspection-abc-123-de.pdf");
    }

    #[test]
    fn test_label_when_registration_absent() {
        let r = report(None, Some("2019  Toyota Corolla"));
        assert_eq!(file_stem(&r), "2019-toyota-corolla");
    }

    #[test]
    fn test_blank_values_fall_through() {
        let r = report(Some("   "), Some(""));
        assert_eq!(file_name(&r), "prepurchase-inspection-vehicle.pdf");
    }

    #[test]
    fn test_path_hostile_characters() {
        assert_eq!(sanitize_file_token(" AB/12\\C:D*E?\"F<G>H|I "), "ab-12-c-d-e--f-g-h-i");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(sanitize_file_token("a \t\n b"), "a-b");
    }
}
