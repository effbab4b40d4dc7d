use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::api::{AnalysisBackend, GenerateRequest};
use crate::storage::SessionStore;

use super::clock::Clock;
use super::stages::{
    READY_STAGE, STAGES, SYNTHESIS_STAGE, StageBoard, UPLOAD_STAGE, synthesis_tail,
};
use super::upload_task::UploadTask;
use super::{DEFAULT_PROJECT_NAME, INITIAL_LOG_LINE, PipelineError, PipelineEvent, PipelineState};

/// Drives one processing run.
///
/// A sequencer runs at most once. Progress is mirrored on its own
/// [`StageBoard`] and, when attached, sent to an event channel.
pub struct PipelineSequencer {
    backend: Arc<dyn AnalysisBackend>,
    session: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    events: Option<Sender<PipelineEvent>>,
    board: StageBoard,
    log: Vec<String>,
    state: PipelineState,
    started: bool,
}

impl PipelineSequencer {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        session: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            session,
            clock,
            events: None,
            board: StageBoard::new(),
            log: vec![INITIAL_LOG_LINE.to_string()],
            state: PipelineState::Idle,
            started: false,
        }
    }

    pub fn with_events(mut self, events: Sender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn board(&self) -> &StageBoard {
        &self.board
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn current_log(&self) -> &str {
        self.log.last().map(String::as_str).unwrap_or(INITIAL_LOG_LINE)
    }

    /// Run every stage on the calling thread.
    ///
    /// Returns the session generation holding the result. On failure the
    /// active stage is marked errored, nothing is written to the session,
    /// and the same error is returned.
    pub fn run(&mut self, request: GenerateRequest) -> Result<u64, PipelineError> {
        if self.started {
            tracing::warn!("Ignoring second start of a pipeline run");
            return Err(PipelineError::AlreadyStarted);
        }
        self.started = true;
        self.state = PipelineState::Running;

        let request = normalize(request);
        tracing::info!(
            project = %request.project_name,
            files = request.files.parts().count(),
            "Pipeline started"
        );
        match self.run_stages(request) {
            Ok(generation) => {
                self.state = PipelineState::Done;
                self.emit(PipelineEvent::Done);
                tracing::info!(generation, "Pipeline finished");
                Ok(generation)
            }
            Err(err) => {
                let message = err.user_message();
                if let Some(index) = self.board.active_index() {
                    self.emit(PipelineEvent::StageFailed { index });
                }
                self.state = PipelineState::Failed(message.clone());
                self.emit(PipelineEvent::Failed { message });
                tracing::warn!(error = %err, "Pipeline failed");
                Err(err)
            }
        }
    }

    /// Run on a named background thread.
    pub fn spawn(mut self, request: GenerateRequest) -> Result<PipelineHandle, PipelineError> {
        let thread = thread::Builder::new()
            .name("brdgen-pipeline".into())
            .spawn(move || self.run(request))
            .map_err(PipelineError::Spawn)?;
        Ok(PipelineHandle { thread })
    }

    fn run_stages(&mut self, request: GenerateRequest) -> Result<u64, PipelineError> {
        let mut request = Some(request);
        let mut upload = None;
        let mut payload = None;
        let mut generation = 0;
        for (index, stage) in STAGES.iter().enumerate() {
            if index == READY_STAGE {
                let payload = payload.take().ok_or(PipelineError::WorkerLost)?;
                generation = self.session.store(payload);
                self.emit(PipelineEvent::ResultStored { generation });
            }
            self.emit(PipelineEvent::StageActivated { index });
            self.emit(PipelineEvent::Log(stage.narrative.to_string()));
            match index {
                UPLOAD_STAGE => {
                    let request = request.take().ok_or(PipelineError::WorkerLost)?;
                    upload = Some(UploadTask::spawn(Arc::clone(&self.backend), request)?);
                    self.clock.sleep(stage.duration);
                }
                SYNTHESIS_STAGE => {
                    let task = upload.take().ok_or(PipelineError::WorkerLost)?;
                    payload = Some(task.join()?);
                    tracing::debug!("Upload answered; finishing synthesis");
                    self.clock.sleep(synthesis_tail());
                }
                _ => self.clock.sleep(stage.duration),
            }
            self.emit(PipelineEvent::StageCompleted { index });
        }
        Ok(generation)
    }

    fn emit(&mut self, event: PipelineEvent) {
        match &event {
            PipelineEvent::Log(line) => self.log.push(line.clone()),
            PipelineEvent::StageActivated { index } => {
                tracing::debug!(stage = STAGES[*index].name, "Stage active");
            }
            _ => {}
        }
        self.board.apply(&event);
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

/// A run on its own thread.
pub struct PipelineHandle {
    thread: JoinHandle<Result<u64, PipelineError>>,
}

impl PipelineHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn join(self) -> Result<u64, PipelineError> {
        self.thread
            .join()
            .unwrap_or(Err(PipelineError::WorkerLost))
    }
}

fn normalize(mut request: GenerateRequest) -> GenerateRequest {
    let trimmed = request.project_name.trim();
    request.project_name = if trimmed.is_empty() {
        DEFAULT_PROJECT_NAME.to_string()
    } else {
        trimmed.to_string()
    };
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisPayload, ApiError, ProjectHistoryEntry};
    use crate::pipeline::{InstantClock, StageStatus};
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::mpsc;

    #[derive(Default)]
    struct RecordingBackend {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    impl AnalysisBackend for RecordingBackend {
        fn generate(&self, request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
            self.seen.lock().unwrap().push(request.project_name.clone());
            if self.fail {
                return Err(ApiError::Status {
                    code: 500,
                    detail: "boom".into(),
                });
            }
            Ok(AnalysisPayload::from_value(json!({ "project_name": request.project_name })).unwrap())
        }

        fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn sequencer(backend: Arc<RecordingBackend>, session: Arc<SessionStore>) -> PipelineSequencer {
        PipelineSequencer::new(backend, session, Arc::new(InstantClock::new()))
    }

    #[test]
    fn successful_run_stores_result_and_completes_every_stage() {
        let backend = Arc::new(RecordingBackend::default());
        let session = Arc::new(SessionStore::new());
        let mut pipeline = sequencer(Arc::clone(&backend), Arc::clone(&session));
        let generation = pipeline
            .run(GenerateRequest {
                project_name: " Apollo ".into(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(generation, 1);
        assert_eq!(pipeline.state(), &PipelineState::Done);
        assert!(pipeline.board().all_complete());
        assert_eq!(backend.seen.lock().unwrap().as_slice(), ["Apollo"]);
        assert_eq!(
            session.current().unwrap().payload.result.project_name.as_deref(),
            Some("Apollo")
        );
        assert_eq!(pipeline.log_lines().first().map(String::as_str), Some(INITIAL_LOG_LINE));
        assert_eq!(pipeline.current_log(), STAGES[READY_STAGE].narrative);
    }

    #[test]
    fn blank_project_name_gets_default() {
        let backend = Arc::new(RecordingBackend::default());
        let mut pipeline = sequencer(Arc::clone(&backend), Arc::new(SessionStore::new()));
        pipeline.run(GenerateRequest::default()).unwrap();
        assert_eq!(backend.seen.lock().unwrap().as_slice(), [DEFAULT_PROJECT_NAME]);
    }

    #[test]
    fn failure_marks_synthesis_stage_errored() {
        let backend = Arc::new(RecordingBackend {
            fail: true,
            ..Default::default()
        });
        let session = Arc::new(SessionStore::new());
        let (tx, rx) = mpsc::channel();
        let mut pipeline =
            sequencer(backend, Arc::clone(&session)).with_events(tx);
        let err = pipeline.run(GenerateRequest::default()).unwrap_err();

        assert_eq!(err.user_message(), "Pipeline error: boom");
        assert_eq!(pipeline.board().status(SYNTHESIS_STAGE), Some(StageStatus::Error));
        assert_eq!(pipeline.board().count(StageStatus::Active), 0);
        assert!(session.current().is_none());
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.contains(&PipelineEvent::StageFailed {
            index: SYNTHESIS_STAGE
        }));
        assert!(!events.contains(&PipelineEvent::Done));
    }

    #[test]
    fn second_run_is_rejected() {
        let backend = Arc::new(RecordingBackend::default());
        let mut pipeline = sequencer(Arc::clone(&backend), Arc::new(SessionStore::new()));
        pipeline.run(GenerateRequest::default()).unwrap();
        assert!(matches!(
            pipeline.run(GenerateRequest::default()),
            Err(PipelineError::AlreadyStarted)
        ));
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
        assert_eq!(pipeline.state(), &PipelineState::Done);
    }
}
