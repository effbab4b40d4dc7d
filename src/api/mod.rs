//! Client side of the analysis backend.
//!
//! The backend does all document processing. This module only knows how to
//! submit documents to `/generate` and list past runs from `/projects`.

mod client;
mod multipart;
pub mod types;

pub use client::HttpBackend;
pub use types::{
    AnalysisPayload, AnalysisResult, AnalysisStats, Conflict, FileBlob, GenerateRequest,
    ProjectHistoryEntry, Requirement, UploadCategory, UploadFiles,
};

/// Errors surfaced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status; `detail` is already user-facing.
    #[error("{detail}")]
    Status { code: u16, detail: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("JSON error: {0}")]
    Json(String),
}

/// The backend operations the client depends on.
pub trait AnalysisBackend: Send + Sync {
    /// Upload documents and run the full analysis.
    fn generate(&self, request: &GenerateRequest) -> Result<AnalysisPayload, ApiError>;

    /// List previously analysed projects.
    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError>;
}

/// Fetch project history, treating any failure as an empty list.
pub fn fetch_history(backend: &dyn AnalysisBackend) -> Vec<ProjectHistoryEntry> {
    match backend.projects() {
        Ok(history) => history,
        Err(err) => {
            tracing::warn!(error = %err, "Project history unavailable");
            Vec::new()
        }
    }
}
