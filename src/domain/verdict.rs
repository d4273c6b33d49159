use serde::{Deserialize, Serialize};

/// Shown whenever the classifier omits a confidence score.
pub const DEFAULT_CONFIDENCE: f64 = 99.4;

const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Verdict as returned by the classifier service. Every field is optional on
/// the wire; nothing here is trusted to be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerdictRecord {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl VerdictRecord {
    #[cfg(test)]
    pub fn with_result(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            ..Self::default()
        }
    }

    /// Raw label, case preserved. Missing labels read as `UNKNOWN`.
    pub fn label(&self) -> &str {
        self.result.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    pub fn safety(&self) -> Safety {
        Safety::classify(self.label())
    }

    pub fn confidence_or_default(&self) -> f64 {
        self.confidence
            .filter(|value| value.is_finite())
            .unwrap_or(DEFAULT_CONFIDENCE)
    }

    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence_or_default())
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Binary presentation class. Anything that is not explicitly `SAFE` or
/// `HAM` is a threat, including labels the client has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Threat,
}

impl Safety {
    pub fn classify(label: &str) -> Self {
        match label {
            "SAFE" | "HAM" => Safety::Safe,
            _ => Safety::Threat,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Safety::Safe => "SAFE",
            Safety::Threat => "THREAT DETECTED",
        }
    }
}

/// Label used for history badges: `HAM` reads as `SAFE`, everything else is
/// shown as recorded.
pub fn badge_label(verdict_label: &str) -> &str {
    if verdict_label == "HAM" {
        "SAFE"
    } else {
        verdict_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ham_and_safe_are_the_only_safe_labels() {
        assert_eq!(Safety::classify("SAFE"), Safety::Safe);
        assert_eq!(Safety::classify("HAM"), Safety::Safe);
        assert_eq!(Safety::classify("PHISHING"), Safety::Threat);
        assert_eq!(Safety::classify("SPAM"), Safety::Threat);
        assert_eq!(Safety::classify("safe"), Safety::Threat);
        assert_eq!(Safety::classify("QUARANTINED"), Safety::Threat);
    }

    #[test]
    fn parses_partial_payloads() {
        let verdict: VerdictRecord = serde_json::from_str(r#"{"result":"SPAM"}"#).unwrap();
        assert_eq!(verdict.label(), "SPAM");
        assert_eq!(verdict.confidence, None);
        assert_eq!(verdict.confidence_display(), "99.40");

        let empty: VerdictRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.label(), "UNKNOWN");
        assert_eq!(empty.safety(), Safety::Threat);
    }

    #[test]
    fn keeps_service_extras() {
        let verdict: VerdictRecord = serde_json::from_str(
            r#"{"type":"URL_SCAN","input":"https://google.com","result":"SAFE","confidence":99.99,"note":"Verified Trusted Brand: Google"}"#,
        )
        .unwrap();
        assert_eq!(verdict.kind.as_deref(), Some("URL_SCAN"));
        assert_eq!(verdict.note.as_deref(), Some("Verified Trusted Brand: Google"));
        assert_eq!(verdict.confidence_display(), "99.99");
    }

    #[test]
    fn blank_ocr_text_counts_as_absent() {
        let verdict = VerdictRecord {
            extracted_text: Some("   ".into()),
            ..VerdictRecord::with_result("UNKNOWN")
        };
        assert_eq!(verdict.extracted_text(), None);
    }

    #[test]
    fn badge_relabels_ham_only() {
        assert_eq!(badge_label("HAM"), "SAFE");
        assert_eq!(badge_label("SPAM"), "SPAM");
        assert_eq!(badge_label("PHISHING"), "PHISHING");
    }
}
