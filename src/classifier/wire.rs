use reqwest::{
    multipart::{Form, Part},
    Response,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{ScanMode, VerdictRecord};

use super::{ClassifierError, ScanRequest};

pub const URL_ENDPOINT: &str = "predict/url";
pub const TEXT_ENDPOINT: &str = "predict/text";
pub const IMAGE_ENDPOINT: &str = "predict/image";
pub const IMAGE_FIELD: &str = "file";

pub fn endpoint_path(mode: ScanMode) -> &'static str {
    match mode {
        ScanMode::Url => URL_ENDPOINT,
        ScanMode::Text => TEXT_ENDPOINT,
        ScanMode::Image => IMAGE_ENDPOINT,
    }
}

/// Joins relative to the base so a base with a path prefix keeps it.
pub fn endpoint_url(base: &Url, mode: ScanMode) -> Result<Url, ClassifierError> {
    Ok(with_trailing_slash(base).join(endpoint_path(mode))?)
}

pub fn status_url(base: &Url) -> Url {
    with_trailing_slash(base)
}

fn with_trailing_slash(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[derive(Debug, Serialize)]
pub struct UrlPayload<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TextPayload<'a> {
    pub text: &'a str,
}

pub enum RequestBody<'a> {
    Json(serde_json::Value),
    Multipart { form: Form, file_name: &'a str },
}

pub fn build_body(request: &ScanRequest) -> Result<RequestBody<'_>, ClassifierError> {
    let body = match request {
        ScanRequest::Url { url } => RequestBody::Json(serde_json::to_value(UrlPayload { url })?),
        ScanRequest::Text { text } => RequestBody::Json(serde_json::to_value(TextPayload { text })?),
        ScanRequest::Image { file } => {
            let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            RequestBody::Multipart {
                form: Form::new().part(IMAGE_FIELD, part),
                file_name: &file.name,
            }
        }
    };
    Ok(body)
}

pub async fn parse_verdict(response: Response) -> Result<VerdictRecord, ClassifierError> {
    let verdict: VerdictRecord = response.json().await?;
    Ok(verdict)
}

/// Body of `GET /` on the classifier service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}
