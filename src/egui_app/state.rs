//! Shared state types for the egui UI.

use std::time::Instant;

use crate::api::{ProjectHistoryEntry, UploadFiles};
use crate::auth::SessionIdentity;
use crate::pipeline::{INITIAL_LOG_LINE, PipelineState, StageBoard};
use crate::router::Route;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub route: Route,
    pub identity: Option<SessionIdentity>,
    pub status: StatusLine,
    pub login: LoginFormState,
    pub upload: UploadFormState,
    pub processing: ProcessingState,
    pub dashboard: DashboardState,
    /// Blocking message shown in a modal until dismissed.
    pub alert: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            route: Route::Login,
            identity: None,
            status: StatusLine::idle(),
            login: LoginFormState::default(),
            upload: UploadFormState::default(),
            processing: ProcessingState::default(),
            dashboard: DashboardState::default(),
            alert: None,
        }
    }
}

/// Text shown in the footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Busy,
    Warning,
}

impl StatusLine {
    pub fn idle() -> Self {
        Self {
            text: "Ready".into(),
            tone: StatusTone::Info,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginFormState {
    pub email: String,
    pub password: String,
    pub busy: bool,
    /// Inline validation message.
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UploadFormState {
    pub project_name: String,
    pub files: UploadFiles,
    pub error: Option<String>,
}

/// Mirror of the running pipeline, fed by its events.
#[derive(Clone, Debug)]
pub struct ProcessingState {
    pub project_name: String,
    pub board: StageBoard,
    pub log: Vec<String>,
    pub state: PipelineState,
    /// When to switch to the dashboard after a finished run.
    pub redirect_at: Option<Instant>,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            board: StageBoard::new(),
            log: vec![INITIAL_LOG_LINE.to_string()],
            state: PipelineState::Idle,
            redirect_at: None,
        }
    }
}

impl ProcessingState {
    pub fn current_log(&self) -> &str {
        self.log.last().map(String::as_str).unwrap_or(INITIAL_LOG_LINE)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub history: Vec<ProjectHistoryEntry>,
    pub history_loading: bool,
}
