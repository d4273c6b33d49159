use async_trait::async_trait;
use reqwest::Client;

use crate::{config::ClassifierConfig, domain::VerdictRecord};

use super::{
    wire::{build_body, endpoint_url, parse_verdict, status_url, RequestBody, ServiceStatus},
    Classifier, ClassifierError, ScanRequest,
};

#[derive(Clone)]
pub struct HttpClassifier {
    http: Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    pub fn new(http: Client, config: ClassifierConfig) -> Self {
        Self { http, config }
    }

    pub async fn status(&self) -> Result<ServiceStatus, ClassifierError> {
        let response = self
            .http
            .get(status_url(&self.config.base_url))
            .timeout(self.config.timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, request: &ScanRequest) -> Result<VerdictRecord, ClassifierError> {
        let mode = request.mode();
        let endpoint = endpoint_url(&self.config.base_url, mode)?;
        let builder = self.http.post(endpoint.clone()).timeout(self.config.timeout);

        let builder = match build_body(request)? {
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Multipart { form, file_name } => {
                tracing::debug!(target: "classifier", file = %file_name, "uploading image");
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(target: "classifier", %endpoint, %status, "classifier rejected request");
            return Err(ClassifierError::Status(status));
        }

        let verdict = parse_verdict(response).await?;
        tracing::info!(
            target: "classifier",
            %mode,
            result = verdict.label(),
            confidence = ?verdict.confidence,
            "verdict received"
        );
        Ok(verdict)
    }
}
