use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use thiserror::Error;

use crate::{
    classifier::{Classifier, ClassifierError, ScanRequest},
    domain::VerdictRecord,
};

/// The only failure text a user ever sees for a scan.
pub const CONNECTIVITY_ERROR: &str =
    "Connection to CyberShield Core failed. Is the backend running?";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("a scan is already in progress")]
    Busy,
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Sends scans to the classifier, one at a time.
///
/// The busy flag is a real guard, not just a hint for the UI: a second scan
/// started while one is outstanding is refused with [`ScanError::Busy`].
pub struct ScanOrchestrator {
    classifier: Arc<dyn Classifier>,
    busy: AtomicBool,
}

/// Proof that this caller owns the in-flight slot. Dropping it, including
/// dropping an unfinished scan future, frees the slot.
pub struct ScanTicket<'a> {
    orchestrator: &'a ScanOrchestrator,
}

impl ScanOrchestrator {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn begin(&self) -> Result<ScanTicket<'_>, ScanError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ScanError::Busy)?;
        Ok(ScanTicket { orchestrator: self })
    }
}

impl ScanTicket<'_> {
    /// No retries: a failure ends this scan and the user has to start again.
    pub async fn run(self, request: &ScanRequest) -> Result<VerdictRecord, ScanError> {
        let mode = request.mode();
        tracing::info!(target: "scan", %mode, "scan started");
        match self.orchestrator.classifier.classify(request).await {
            Ok(verdict) => Ok(verdict),
            Err(err) => {
                tracing::warn!(target: "scan", %mode, error = %err, "scan failed");
                Err(err.into())
            }
        }
    }
}

impl Drop for ScanTicket<'_> {
    fn drop(&mut self) {
        self.orchestrator.busy.store(false, Ordering::SeqCst);
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::poll;
    use tokio::sync::Notify;

    use super::{fake::ScriptedClassifier, *};

    fn text(body: &str) -> ScanRequest {
        ScanRequest::Text { text: body.into() }
    }

    async fn scan(orchestrator: &ScanOrchestrator, request: &ScanRequest) -> Result<VerdictRecord, ScanError> {
        orchestrator.begin()?.run(request).await
    }

    #[tokio::test]
    async fn returns_verdict_verbatim_and_releases_guard() {
        let verdict = VerdictRecord {
            confidence: Some(95.0),
            ..VerdictRecord::with_result("SPAM")
        };
        let classifier = Arc::new(ScriptedClassifier::answering([Some(verdict.clone())]));
        let orchestrator = ScanOrchestrator::new(classifier.clone());

        let got = scan(&orchestrator, &text("Win a free prize now!!")).await.unwrap();
        assert_eq!(got, verdict);
        assert!(!orchestrator.is_busy());
        assert_eq!(classifier.calls.lock().as_slice(), &[text("Win a free prize now!!")]);
    }

    #[tokio::test]
    async fn failure_is_not_retried_and_clears_busy() {
        let classifier = Arc::new(ScriptedClassifier::answering([None, Some(VerdictRecord::with_result("HAM"))]));
        let orchestrator = ScanOrchestrator::new(classifier.clone());

        let err = scan(&orchestrator, &text("hello")).await.unwrap_err();
        assert!(matches!(err, ScanError::Classifier(ClassifierError::Status(_))));
        assert!(!orchestrator.is_busy());
        assert_eq!(classifier.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn second_scan_is_refused_while_one_is_in_flight() {
        let gate = Arc::new(Notify::new());
        let classifier = Arc::new(
            ScriptedClassifier::answering([Some(VerdictRecord::with_result("SAFE"))]).gated(gate.clone()),
        );
        let orchestrator = ScanOrchestrator::new(classifier.clone());

        let first_request = text("first");
        let first = scan(&orchestrator, &first_request);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        assert!(orchestrator.is_busy());

        assert!(matches!(scan(&orchestrator, &text("second")).await, Err(ScanError::Busy)));
        assert_eq!(classifier.calls.lock().len(), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap().label(), "SAFE");
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn dropping_an_unfinished_scan_frees_the_slot() {
        let gate = Arc::new(Notify::new());
        let classifier = Arc::new(ScriptedClassifier::default().gated(gate));
        let orchestrator = ScanOrchestrator::new(classifier);

        let request = text("abandoned");
        {
            let pending = scan(&orchestrator, &request);
            tokio::pin!(pending);
            assert!(poll!(&mut pending).is_pending());
            assert!(orchestrator.is_busy());
        }
        assert!(!orchestrator.is_busy());
    }
}
