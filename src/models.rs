use serde::{Deserialize, Serialize};

use crate::constants::{MISSING_EXTENSION_CATEGORY, MISSING_EXTENSION_CODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
    #[serde(other)]
    Unknown,
}

/// One diagnostic as printed by the validator's JSON output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationError {
    pub severity: String,
    pub line: u32,
    pub col: u32,
    pub message: String,
    pub spec_url: String,
    pub category: String,
    pub code: String,
    pub params: Vec<String>,
}

impl ValidationError {
    pub fn is_missing_extension(&self) -> bool {
        self.category == MISSING_EXTENSION_CATEGORY && self.code == MISSING_EXTENSION_CODE
    }

    /// The element the diagnostic is about; the validator puts it first.
    pub fn element(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Pass
    }

    /// Diagnostics reporting a missing extension script. Empty when the
    /// document passed.
    pub fn missing_extensions(&self) -> impl Iterator<Item = &ValidationError> {
        let failed = self.status == ValidationStatus::Fail;
        self.errors
            .iter()
            .filter(move |e| failed && e.is_missing_extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "FAIL",
        "errors": [
            {
                "severity": "ERROR",
                "line": 12,
                "col": 4,
                "message": "The tag 'amp-carousel' requires including the 'amp-carousel' extension JavaScript.",
                "specUrl": "https://amp.dev/documentation/components/amp-carousel",
                "category": "MANDATORY_AMP_TAG_MISSING_OR_INCORRECT",
                "code": "MISSING_REQUIRED_EXTENSION",
                "params": ["amp-carousel", "amp-carousel"]
            },
            {
                "severity": "ERROR",
                "line": 1,
                "col": 0,
                "message": "The mandatory tag 'amphtml engine v0.js script' is missing or incorrect.",
                "specUrl": "https://amp.dev/documentation/guides-and-tutorials/learn/spec/amphtml#required-markup",
                "category": "MANDATORY_AMP_TAG_MISSING_OR_INCORRECT",
                "code": "MANDATORY_TAG_MISSING",
                "params": ["amphtml engine v0.js script"]
            }
        ]
    }"#;

    #[test]
    fn parses_validator_json() {
        let result: ValidationResult = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(result.status, ValidationStatus::Fail);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].line, 12);
        assert_eq!(
            result.errors[0].spec_url,
            "https://amp.dev/documentation/components/amp-carousel"
        );
    }

    #[test]
    fn only_missing_extension_errors_are_selected() {
        let result: ValidationResult = serde_json::from_str(SAMPLE).unwrap();
        let missing: Vec<_> = result.missing_extensions().collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].element(), Some("amp-carousel"));
    }

    #[test]
    fn passing_result_reports_nothing_missing() {
        let result: ValidationResult =
            serde_json::from_str(r#"{"status":"PASS","errors":[]}"#).unwrap();
        assert!(result.passed());
        assert_eq!(result.missing_extensions().count(), 0);
    }

    #[test]
    fn unknown_status_does_not_fail_parsing() {
        let result: ValidationResult = serde_json::from_str(r#"{"status":"UNKNOWN"}"#).unwrap();
        assert_eq!(result.status, ValidationStatus::Unknown);
        assert!(result.errors.is_empty());
    }
}
