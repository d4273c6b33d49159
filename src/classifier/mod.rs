mod client;
mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ScanMode, SelectedFile, VerdictRecord};

pub use client::HttpClassifier;
pub use wire::ServiceStatus;

/// A classification request in the shape the service expects for its mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Url { url: String },
    Text { text: String },
    Image { file: SelectedFile },
}

impl ScanRequest {
    /// Builds the request for `mode`. Image scans need a selected file and
    /// yield `None` without one.
    pub fn for_mode(mode: ScanMode, input: &str, file: Option<&SelectedFile>) -> Option<Self> {
        match mode {
            ScanMode::Url => Some(ScanRequest::Url {
                url: input.to_string(),
            }),
            ScanMode::Text => Some(ScanRequest::Text {
                text: input.to_string(),
            }),
            ScanMode::Image => file.map(|file| ScanRequest::Image { file: file.clone() }),
        }
    }

    pub fn mode(&self) -> ScanMode {
        match self {
            ScanRequest::Url { .. } => ScanMode::Url,
            ScanRequest::Text { .. } => ScanMode::Text,
            ScanRequest::Image { .. } => ScanMode::Image,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid classifier endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to encode classifier request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier answered with status {0}")]
    Status(reqwest::StatusCode),
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &ScanRequest) -> Result<VerdictRecord, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_request_requires_a_file() {
        assert_eq!(ScanRequest::for_mode(ScanMode::Image, "ignored", None), None);

        let file = SelectedFile::new("shot.png", vec![1, 2, 3]);
        let request = ScanRequest::for_mode(ScanMode::Image, "", Some(&file)).unwrap();
        assert_eq!(request, ScanRequest::Image { file });
        assert_eq!(request.mode(), ScanMode::Image);
    }

    #[test]
    fn text_and_url_requests_carry_raw_input() {
        let request = ScanRequest::for_mode(ScanMode::Text, "  Win a free prize now!! ", None);
        assert_eq!(
            request,
            Some(ScanRequest::Text {
                text: "  Win a free prize now!! ".into()
            })
        );
        let request = ScanRequest::for_mode(ScanMode::Url, "http://bit.ly/x", None).unwrap();
        assert_eq!(request.mode(), ScanMode::Url);
    }
}
