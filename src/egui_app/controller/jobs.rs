use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::ProjectHistoryEntry;
use crate::auth::LoginOutcome;
use crate::pipeline::{PipelineEvent, PipelineHandle};

type TryRecvError = std::sync::mpsc::TryRecvError;

/// Results delivered from worker threads to the UI thread.
#[derive(Debug)]
pub(crate) enum JobMessage {
    LoginFinished(LoginResult),
    HistoryLoaded(Vec<ProjectHistoryEntry>),
    Pipeline(PipelineEvent),
}

#[derive(Debug)]
pub(crate) struct LoginResult {
    pub(crate) result: Result<LoginOutcome, LoginFailure>,
}

#[derive(Debug)]
pub(crate) enum LoginFailure {
    /// Shown under the form.
    Invalid(String),
    /// Shown in a blocking dialog.
    Blocking(String),
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pub(super) login_in_progress: bool,
    pub(super) history_in_progress: bool,
    pub(super) pipeline: Option<PipelineHandle>,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            login_in_progress: false,
            history_in_progress: false,
            pipeline: None,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn message_sender(&self) -> Sender<JobMessage> {
        self.message_tx.clone()
    }

    /// Relay pipeline events until the run ends.
    pub(super) fn forward_pipeline_events(&self, rx: Receiver<PipelineEvent>) {
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            while let Ok(event) = rx.recv() {
                let is_finished =
                    matches!(event, PipelineEvent::Done | PipelineEvent::Failed { .. });
                let _ = tx.send(JobMessage::Pipeline(event));
                if is_finished {
                    break;
                }
            }
        });
    }

    pub(super) fn pipeline_running(&self) -> bool {
        self.pipeline
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub(super) fn take_finished_pipeline(&mut self) -> Option<PipelineHandle> {
        if self.pipeline.as_ref().is_some_and(PipelineHandle::is_finished) {
            self.pipeline.take()
        } else {
            None
        }
    }
}
