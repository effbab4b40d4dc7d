use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::api::{AnalysisBackend, AnalysisPayload, ApiError, GenerateRequest};

use super::PipelineError;

/// The real `/generate` call, running beside the presentation timeline.
///
/// The only way to observe its result is [`UploadTask::join`], which is the
/// single synchronization point between the two timelines.
pub(crate) struct UploadTask {
    result_rx: Receiver<Result<AnalysisPayload, ApiError>>,
}

impl UploadTask {
    pub(crate) fn spawn(
        backend: Arc<dyn AnalysisBackend>,
        request: GenerateRequest,
    ) -> Result<Self, PipelineError> {
        let (result_tx, result_rx) = mpsc::channel();
        thread::Builder::new()
            .name("brdgen-upload".into())
            .spawn(move || {
                let result = backend.generate(&request);
                if let Err(err) = &result {
                    tracing::debug!(error = %err, "Upload finished with error");
                }
                let _ = result_tx.send(result);
            })
            .map_err(PipelineError::Spawn)?;
        Ok(Self { result_rx })
    }

    /// Block until the backend answers.
    pub(crate) fn join(self) -> Result<AnalysisPayload, PipelineError> {
        match self.result_rx.recv() {
            Ok(result) => result.map_err(PipelineError::from),
            Err(_) => Err(PipelineError::WorkerLost),
        }
    }
}
