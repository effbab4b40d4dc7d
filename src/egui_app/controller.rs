//! Application controller: owns services and turns UI intents into work.

mod export;
pub(crate) mod jobs;
mod login;
mod navigation;
mod processing;
mod upload;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::mpsc::TryRecvError;

use crate::api::{AnalysisBackend, HttpBackend};
use crate::auth::{AuthGate, CredentialStore, IdentityProvider, provider_from_config};
use crate::config::AppConfig;
use crate::egui_app::state::{StatusLine, StatusTone, UiState};
use crate::pipeline::{Clock, PipelineError, PipelineEvent, PipelineState, SystemClock};
use crate::router::Router;
use crate::storage::{IdentityStore, SessionStore};

use jobs::{ControllerJobs, JobMessage};

/// Services the controller works with.
pub struct Services {
    pub backend: Arc<dyn AnalysisBackend>,
    pub provider: Arc<dyn IdentityProvider>,
    pub identities: IdentityStore,
    pub credentials: Option<CredentialStore>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Production services built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let identities = IdentityStore::open_default()
            .map_err(|err| format!("Failed to open identity store: {err}"))?;
        let credentials = match CredentialStore::open_default() {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(error = %err, "Token storage unavailable");
                None
            }
        };
        Ok(Self {
            backend: Arc::new(HttpBackend::new(config)),
            provider: Arc::from(provider_from_config(config)),
            identities,
            credentials,
            clock: Arc::new(SystemClock),
        })
    }
}

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    config: AppConfig,
    router: Router,
    backend: Arc<dyn AnalysisBackend>,
    auth: Arc<AuthGate>,
    session: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    jobs: ControllerJobs,
}

impl EguiController {
    pub fn new(config: AppConfig, services: Services) -> Self {
        let mut auth = AuthGate::new(services.provider, services.identities, config.demo_mode);
        if let Some(store) = services.credentials {
            auth = auth.with_credential_store(store);
        }
        let mut ui = UiState::default();
        ui.identity = auth.current_identity();
        Self {
            ui,
            router: Router::new(&config.base_path),
            config,
            backend: services.backend,
            auth: Arc::new(auth),
            session: Arc::new(SessionStore::new()),
            clock: services.clock,
            jobs: ControllerJobs::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn demo_mode(&self) -> bool {
        self.auth.demo_mode()
    }

    /// Drain finished background work; call once per frame.
    pub fn poll_background_jobs(&mut self) {
        loop {
            match self.jobs.try_recv_message() {
                Ok(message) => self.handle_job_message(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(handle) = self.jobs.take_finished_pipeline() {
            match handle.join() {
                Ok(_) => {}
                // A panicked worker never sends its terminal event.
                Err(err @ PipelineError::WorkerLost)
                    if self.ui.processing.state == PipelineState::Running =>
                {
                    tracing::error!(error = %err, "Pipeline worker lost");
                    self.apply_pipeline_event(PipelineEvent::Failed {
                        message: err.user_message(),
                    });
                }
                Err(err) => tracing::debug!(error = %err, "Pipeline worker joined with error"),
            }
        }
        self.poll_redirect();
    }

    /// True while some worker may still post results.
    ///
    /// A run counts until its terminal event has been applied: the worker
    /// can finish before the relay has forwarded its last events.
    pub fn has_pending_work(&self) -> bool {
        self.jobs.login_in_progress
            || self.jobs.history_in_progress
            || self.jobs.pipeline_running()
            || self.ui.processing.state == PipelineState::Running
            || self.ui.processing.redirect_at.is_some()
    }

    fn handle_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::LoginFinished(result) => self.finish_login(result),
            JobMessage::HistoryLoaded(history) => self.finish_history(history),
            JobMessage::Pipeline(event) => self.apply_pipeline_event(event),
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status = StatusLine {
            text: text.into(),
            tone,
        };
    }

    pub fn dismiss_alert(&mut self) {
        self.ui.alert = None;
    }
}
