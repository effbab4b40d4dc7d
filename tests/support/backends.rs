use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use brdgen::api::{
    AnalysisBackend, AnalysisPayload, ApiError, GenerateRequest, ProjectHistoryEntry,
};
use serde_json::{Value, json};

pub fn sample_payload(project: &str) -> Value {
    json!({
        "project_name": project,
        "requirements": [
            { "id": 1, "canonical_text": "The system must export BRDs as PDF.", "label": "hard_requirement", "corroboration_count": 3 },
            { "id": 2, "text": "Dashboards should load quickly.", "label": "soft_requirement" }
        ],
        "conflicts": [ { "conflict_type": "timeline", "topic": "Launch in Q2 vs Q3" } ],
        "stats": { "total_requirements": 2, "conflicts_detected": 1, "signals_processed": 14 },
        "health_score": 72,
        "stakeholders": [ { "name": "Dana", "role": "Sponsor" } ]
    })
}

/// Answers every upload with the same payload.
pub struct StaticBackend {
    payload: Value,
    pub calls: AtomicUsize,
}

impl StaticBackend {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }
}

impl AnalysisBackend for StaticBackend {
    fn generate(&self, _request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AnalysisPayload::from_value(self.payload.clone()).map_err(|err| ApiError::Json(err.to_string()))
    }

    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        Ok(Vec::new())
    }
}

/// Answers with an HTTP error status.
pub struct FailingBackend {
    pub code: u16,
    pub detail: String,
}

impl AnalysisBackend for FailingBackend {
    fn generate(&self, _request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
        Err(ApiError::Status {
            code: self.code,
            detail: self.detail.clone(),
        })
    }

    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        Err(ApiError::Transport("offline".into()))
    }
}

/// Holds each upload until the test releases it.
pub struct GatedBackend {
    payload: Value,
    started_tx: Mutex<Sender<String>>,
    release_rx: Mutex<Receiver<()>>,
}

pub struct Gate {
    /// Receives the project name once the upload has begun.
    pub started: Receiver<String>,
    release: Sender<()>,
}

impl Gate {
    pub fn release(&self) {
        let _ = self.release.send(());
    }
}

impl GatedBackend {
    pub fn new(payload: Value) -> (Self, Gate) {
        let (started_tx, started) = mpsc::channel();
        let (release, release_rx) = mpsc::channel();
        (
            Self {
                payload,
                started_tx: Mutex::new(started_tx),
                release_rx: Mutex::new(release_rx),
            },
            Gate { started, release },
        )
    }
}

impl AnalysisBackend for GatedBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
        let _ = self
            .started_tx
            .lock()
            .unwrap()
            .send(request.project_name.clone());
        self.release_rx
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| ApiError::Transport("gate dropped".into()))?;
        AnalysisPayload::from_value(self.payload.clone()).map_err(|err| ApiError::Json(err.to_string()))
    }

    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        Ok(Vec::new())
    }
}
