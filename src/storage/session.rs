use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::api::AnalysisPayload;

/// The analysis result currently held by the session, tagged with the write
/// that produced it.
#[derive(Clone, Debug)]
pub struct StoredAnalysis {
    pub generation: u64,
    pub payload: Arc<AnalysisPayload>,
}

/// Single-slot container for the current analysis result.
///
/// Lives for the process; views read it by reference. Pipeline runs are the
/// only writers, and the last write wins: a later `store` always replaces
/// the slot regardless of which run started first.
#[derive(Debug, Default)]
pub struct SessionStore {
    slot: RwLock<Option<StoredAnalysis>>,
    generation: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot and return the generation of this write.
    pub fn store(&self, payload: AnalysisPayload) -> u64 {
        let mut slot = self.slot.write().unwrap_or_else(|err| err.into_inner());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Some(StoredAnalysis {
            generation,
            payload: Arc::new(payload),
        });
        generation
    }

    pub fn current(&self) -> Option<StoredAnalysis> {
        self.slot
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    /// Generation of the latest write, or zero if nothing was ever stored.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(|err| err.into_inner()) = None;
    }
}
