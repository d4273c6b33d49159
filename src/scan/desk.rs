use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use parking_lot::Mutex;

use crate::{
    classifier::{Classifier, ScanRequest},
    domain::{scan::content_preview, ScanHistoryEntry, ScanMode, SelectedFile, VerdictRecord},
    history::{HistoryCache, HistoryError},
    report::ReportSynthesizer,
};

use super::orchestrator::{ScanError, ScanOrchestrator, CONNECTIVITY_ERROR};

/// The scan the result panel is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedScan {
    pub mode: ScanMode,
    pub input: String,
    pub verdict: VerdictRecord,
}

#[derive(Debug)]
struct DeskState {
    mode: ScanMode,
    input: String,
    file: Option<SelectedFile>,
    result: Option<CompletedScan>,
    error: Option<String>,
    // Bumped on every mode switch so a scan that outlives its mode does not
    // surface in the new one.
    generation: u64,
}

/// Scanner workbench: active mode, pending input, current result and the
/// recent-activity history.
pub struct ScanDesk {
    orchestrator: ScanOrchestrator,
    history: Mutex<HistoryCache>,
    state: Mutex<DeskState>,
    timezone: Tz,
}

impl ScanDesk {
    pub fn new(classifier: Arc<dyn Classifier>, history: HistoryCache, timezone: Tz) -> Self {
        Self {
            orchestrator: ScanOrchestrator::new(classifier),
            history: Mutex::new(history),
            state: Mutex::new(DeskState {
                mode: ScanMode::Url,
                input: String::new(),
                file: None,
                result: None,
                error: None,
                generation: 0,
            }),
            timezone,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.state.lock().mode
    }

    /// Drops pending input, file, result and error so nothing leaks across modes.
    pub fn switch_mode(&self, mode: ScanMode) {
        let mut state = self.state.lock();
        state.mode = mode;
        state.input.clear();
        state.file = None;
        state.result = None;
        state.error = None;
        state.generation += 1;
        tracing::debug!(target: "scan", %mode, "mode switched");
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.state.lock().input = input.into();
    }

    pub fn input(&self) -> String {
        self.state.lock().input.clone()
    }

    pub fn select_file(&self, file: SelectedFile) {
        let mut state = self.state.lock();
        tracing::debug!(target: "scan", file = %file.name, bytes = file.bytes.len(), "file selected");
        state.file = Some(file);
        state.result = None;
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.state.lock().file.as_ref().map(|file| file.name.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    pub fn current_result(&self) -> Option<CompletedScan> {
        self.state.lock().result.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn history(&self) -> Vec<ScanHistoryEntry> {
        self.history.lock().entries().to_vec()
    }

    pub fn clear_history(&self) -> Result<(), HistoryError> {
        self.history.lock().clear()
    }

    /// Scans the pending input for the active mode.
    ///
    /// `Ok(None)` means there was nothing to scan (image mode without a file)
    /// and no state changed. On success the verdict is recorded in history
    /// under its raw label. On failure the generic connectivity message is
    /// set and history is left alone.
    pub async fn scan(&self) -> Result<Option<VerdictRecord>, ScanError> {
        let (ticket, request, mode, input, file_name, generation) = {
            let mut state = self.state.lock();
            let Some(request) = ScanRequest::for_mode(state.mode, &state.input, state.file.as_ref())
            else {
                tracing::debug!(target: "scan", mode = %state.mode, "nothing selected; scan ignored");
                return Ok(None);
            };
            let ticket = self.orchestrator.begin()?;
            state.error = None;
            state.result = None;
            (
                ticket,
                request,
                state.mode,
                state.input.clone(),
                state.file.as_ref().map(|file| file.name.clone()),
                state.generation,
            )
        };

        let outcome = ticket.run(&request).await;

        match outcome {
            Ok(verdict) => {
                let now = Utc::now().with_timezone(&self.timezone);
                let entry = ScanHistoryEntry::new(
                    mode,
                    content_preview(mode, &input, file_name.as_deref()),
                    verdict.label(),
                    &now,
                );
                if let Err(err) = self.history.lock().record(entry) {
                    tracing::error!(target: "history", error = %err, "failed to record scan");
                }

                let mut state = self.state.lock();
                if state.generation == generation {
                    state.result = Some(CompletedScan {
                        mode,
                        input,
                        verdict: verdict.clone(),
                    });
                } else {
                    tracing::debug!(target: "scan", %mode, "mode changed during scan; result not shown");
                }
                Ok(Some(verdict))
            }
            Err(err) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.error = Some(CONNECTIVITY_ERROR.to_string());
                }
                Err(err)
            }
        }
    }

    /// Report for the scan on display; `None` until a verdict exists.
    pub fn report(&self, synthesizer: &ReportSynthesizer) -> Option<Vec<u8>> {
        let scan = self.current_result()?;
        Some(synthesizer.synthesize(scan.mode, &scan.input, &scan.verdict))
    }
}
