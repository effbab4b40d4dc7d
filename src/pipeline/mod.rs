//! The processing run: eight presented stages around one real upload.
//!
//! Two timelines run side by side. The presentation timeline walks the
//! stage list with fixed delays from a [`Clock`]; the upload runs on its own
//! thread. They meet once, while the synthesis stage is active: that stage
//! cannot complete, and nothing is reported as done, until the upload has
//! answered and its payload sits in the [`SessionStore`](crate::storage::SessionStore).

mod clock;
mod sequencer;
mod stages;
mod upload_task;

pub use clock::{Clock, InstantClock, SystemClock};
pub use sequencer::{PipelineHandle, PipelineSequencer};
pub use stages::{
    READY_STAGE, STAGE_COUNT, STAGES, SYNTHESIS_NETWORK_CREDIT, SYNTHESIS_STAGE, Stage,
    StageBoard, StageDefinition, StageIcon, StageStatus, UPLOAD_STAGE, synthesis_tail,
};

use std::time::Duration;

use crate::api::ApiError;

/// Log line shown before the first stage starts.
pub const INITIAL_LOG_LINE: &str = "Initializing pipeline...";

/// Pause between a finished run and switching to the dashboard.
pub const DASHBOARD_REDIRECT_DELAY: Duration = Duration::from_millis(1200);

/// Project name used when the upload form left it blank.
pub const DEFAULT_PROJECT_NAME: &str = "Your Project";

/// Guidance shown under a failed run.
pub const FAILURE_HINT: &str =
    "Make sure the backend is reachable, then start again from the upload page.";

/// Progress notifications, in the order the presentation timeline emits them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    StageActivated { index: usize },
    StageCompleted { index: usize },
    Log(String),
    StageFailed { index: usize },
    /// The payload is in the session store under `generation`.
    ResultStored { generation: u64 },
    Done,
    Failed { message: String },
}

/// Run-level state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Done,
    Failed(String),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Failed to start upload worker: {0}")]
    Spawn(std::io::Error),
    #[error("Pipeline worker stopped without a result")]
    WorkerLost,
    #[error("Pipeline already started")]
    AlreadyStarted,
}

impl PipelineError {
    /// Text shown to the user for a failed run.
    pub fn user_message(&self) -> String {
        format!("Pipeline error: {self}")
    }
}
