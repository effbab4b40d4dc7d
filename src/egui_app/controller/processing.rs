use std::sync::Arc;
use std::sync::mpsc;
use std::time::Instant;

use super::EguiController;
use crate::api::GenerateRequest;
use crate::egui_app::state::{ProcessingState, StatusTone};
use crate::pipeline::{
    DASHBOARD_REDIRECT_DELAY, DEFAULT_PROJECT_NAME, PipelineEvent, PipelineSequencer,
    PipelineState,
};
use crate::router::Route;

impl EguiController {
    /// Start a pipeline run from the upload form and show its progress.
    ///
    /// Ignored while a run is still in flight.
    pub fn start_processing(&mut self) {
        if self.jobs.pipeline_running() || self.ui.processing.state == PipelineState::Running {
            tracing::warn!("Pipeline already running");
            return;
        }
        let project_name = match self.ui.upload.project_name.trim() {
            "" => DEFAULT_PROJECT_NAME.to_string(),
            name => name.to_string(),
        };
        let request = GenerateRequest {
            project_name: project_name.clone(),
            files: self.ui.upload.files.clone(),
        };

        let (events_tx, events_rx) = mpsc::channel();
        let sequencer = PipelineSequencer::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.session),
            Arc::clone(&self.clock),
        )
        .with_events(events_tx);
        self.ui.processing = ProcessingState {
            project_name,
            state: PipelineState::Running,
            ..Default::default()
        };
        match sequencer.spawn(request) {
            Ok(handle) => {
                self.jobs.forward_pipeline_events(events_rx);
                self.jobs.pipeline = Some(handle);
                self.set_status("Processing documents…", StatusTone::Busy);
                self.navigate(Route::Processing);
            }
            Err(err) => {
                let message = err.user_message();
                tracing::error!(error = %err, "Pipeline could not start");
                self.ui.processing.state = PipelineState::Failed(message.clone());
                self.set_status(message, StatusTone::Warning);
                self.navigate(Route::Processing);
            }
        }
    }

    pub(super) fn apply_pipeline_event(&mut self, event: PipelineEvent) {
        let processing = &mut self.ui.processing;
        processing.board.apply(&event);
        match event {
            PipelineEvent::Log(line) => processing.log.push(line),
            PipelineEvent::Done => {
                processing.state = PipelineState::Done;
                processing.redirect_at = Some(Instant::now() + DASHBOARD_REDIRECT_DELAY);
                self.set_status("Intelligence Center ready", StatusTone::Info);
            }
            PipelineEvent::Failed { message } => {
                processing.state = PipelineState::Failed(message.clone());
                self.set_status(message, StatusTone::Warning);
            }
            PipelineEvent::StageActivated { .. }
            | PipelineEvent::StageCompleted { .. }
            | PipelineEvent::StageFailed { .. }
            | PipelineEvent::ResultStored { .. } => {}
        }
    }

    /// Leave a failed run for the upload form.
    pub fn back_to_upload(&mut self) {
        if self.ui.processing.state.is_terminal() {
            self.ui.processing = ProcessingState::default();
        }
        self.navigate(Route::Upload);
    }

    /// Start over with an empty form.
    pub fn new_analysis(&mut self) {
        self.reset_upload_form();
        self.back_to_upload();
    }

    pub(super) fn poll_redirect(&mut self) {
        let Some(deadline) = self.ui.processing.redirect_at else {
            return;
        };
        if Instant::now() < deadline {
            return;
        }
        self.ui.processing.redirect_at = None;
        if self.ui.route == Route::Processing {
            self.navigate(Route::Dashboard);
        }
    }
}
