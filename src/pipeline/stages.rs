use std::time::Duration;

use super::PipelineEvent;

/// Display status of one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageStatus {
    Pending,
    Active,
    Complete,
    Error,
}

/// Icon shown next to a pending stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageIcon {
    Database,
    Zap,
    Shield,
    GitBranch,
    AlertTriangle,
    Brain,
    Sparkles,
}

/// Static description of a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageDefinition {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: StageIcon,
    /// Nominal display time.
    pub duration: Duration,
    /// Log line shown once the stage is active.
    pub narrative: &'static str,
}

pub const STAGE_COUNT: usize = 8;

/// Index of the stage whose activation starts the upload.
pub const UPLOAD_STAGE: usize = 2;
/// Index of the stage that waits for the upload to finish.
pub const SYNTHESIS_STAGE: usize = 6;
/// Index of the final stage.
pub const READY_STAGE: usize = STAGE_COUNT - 1;

/// Part of the synthesis duration assumed to have been spent waiting on the
/// network; only the remainder is shown after the response arrives.
pub const SYNTHESIS_NETWORK_CREDIT: Duration = Duration::from_millis(2000);

pub const STAGES: [StageDefinition; STAGE_COUNT] = [
    StageDefinition {
        id: 1,
        name: "Signal Ingestion",
        description: "Parsing EML / XML / JSON / PDF files",
        icon: StageIcon::Database,
        duration: Duration::from_millis(1200),
        narrative: "Parsing uploaded documents...",
    },
    StageDefinition {
        id: 2,
        name: "Linguistic Cleaning",
        description: "Noise removal & sentence extraction",
        icon: StageIcon::Zap,
        duration: Duration::from_millis(1000),
        narrative: "Stripping noise, splitting sentences...",
    },
    StageDefinition {
        id: 3,
        name: "Requirement Filtering",
        description: "Classifying hard & soft requirements",
        icon: StageIcon::Shield,
        duration: Duration::from_millis(2000),
        narrative: "Classifying sentences as hard/soft requirements...",
    },
    StageDefinition {
        id: 4,
        name: "Semantic Clustering",
        description: "Embedding deduplication into canonical requirements",
        icon: StageIcon::GitBranch,
        duration: Duration::from_millis(1800),
        narrative: "Deduplicating requirements via cosine similarity...",
    },
    StageDefinition {
        id: 5,
        name: "Conflict Detection",
        description: "Numerical / scope / authority / timeline",
        icon: StageIcon::AlertTriangle,
        duration: Duration::from_millis(1000),
        narrative: "Scanning for numerical, scope & timeline conflicts...",
    },
    StageDefinition {
        id: 6,
        name: "Provenance Graph",
        description: "Building citation traceability graph",
        icon: StageIcon::GitBranch,
        duration: Duration::from_millis(800),
        narrative: "Building provenance graph: source → requirement links...",
    },
    StageDefinition {
        id: 7,
        name: "BRD Synthesis",
        description: "Generating professional prose with citations",
        icon: StageIcon::Brain,
        duration: Duration::from_millis(4000),
        narrative: "Synthesizing BRD prose with citations...",
    },
    StageDefinition {
        id: 8,
        name: "Intelligence Ready",
        description: "Pipeline complete — loading Intelligence Center",
        icon: StageIcon::Sparkles,
        duration: Duration::from_millis(500),
        narrative: "Pipeline complete! Intelligence Center ready.",
    },
];

/// Time the synthesis stage still waits once the response is in.
pub fn synthesis_tail() -> Duration {
    STAGES[SYNTHESIS_STAGE]
        .duration
        .saturating_sub(SYNTHESIS_NETWORK_CREDIT)
}

/// A stage as displayed during one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    pub definition: StageDefinition,
    pub status: StageStatus,
}

/// The ordered stage list for one run.
///
/// Both the sequencer and any view mirroring it apply the same
/// [`PipelineEvent`]s, so they agree on every status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageBoard {
    stages: Vec<Stage>,
}

impl Default for StageBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StageBoard {
    pub fn new() -> Self {
        Self {
            stages: STAGES
                .iter()
                .map(|definition| Stage {
                    definition: *definition,
                    status: StageStatus::Pending,
                })
                .collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn status(&self, index: usize) -> Option<StageStatus> {
        self.stages.get(index).map(|stage| stage.status)
    }

    pub fn count(&self, status: StageStatus) -> usize {
        self.stages.iter().filter(|stage| stage.status == status).count()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.stages
            .iter()
            .position(|stage| stage.status == StageStatus::Active)
    }

    /// Earlier stages complete, `index` active, later stages pending.
    pub fn activate(&mut self, index: usize) {
        for (idx, stage) in self.stages.iter_mut().enumerate() {
            stage.status = match idx.cmp(&index) {
                std::cmp::Ordering::Less => StageStatus::Complete,
                std::cmp::Ordering::Equal => StageStatus::Active,
                std::cmp::Ordering::Greater => StageStatus::Pending,
            };
        }
    }

    /// Stages up to and including `index` complete, the rest pending.
    pub fn complete(&mut self, index: usize) {
        for (idx, stage) in self.stages.iter_mut().enumerate() {
            stage.status = if idx <= index {
                StageStatus::Complete
            } else {
                StageStatus::Pending
            };
        }
    }

    /// Mark the stage at `index` errored if it is the active one.
    pub fn fail(&mut self, index: usize) {
        if let Some(stage) = self.stages.get_mut(index) {
            if stage.status == StageStatus::Active {
                stage.status = StageStatus::Error;
            }
        }
    }

    pub fn apply(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageActivated { index } => self.activate(*index),
            PipelineEvent::StageCompleted { index } => self.complete(*index),
            PipelineEvent::StageFailed { index } => self.fail(*index),
            PipelineEvent::Log(_)
            | PipelineEvent::ResultStored { .. }
            | PipelineEvent::Done
            | PipelineEvent::Failed { .. } => {}
        }
    }

    pub fn all_complete(&self) -> bool {
        self.count(StageStatus::Complete) == self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_match_the_presentation_timeline() {
        let millis: Vec<u128> = STAGES.iter().map(|s| s.duration.as_millis()).collect();
        assert_eq!(millis, vec![1200, 1000, 2000, 1800, 1000, 800, 4000, 500]);
        assert_eq!(synthesis_tail(), Duration::from_millis(2000));
    }

    #[test]
    fn ids_are_sequential() {
        for (idx, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.id as usize, idx + 1);
        }
    }

    #[test]
    fn activate_and_complete_reset_neighbours() {
        let mut board = StageBoard::new();
        board.activate(3);
        assert_eq!(board.count(StageStatus::Complete), 3);
        assert_eq!(board.active_index(), Some(3));
        assert_eq!(board.count(StageStatus::Pending), 4);

        board.complete(3);
        assert_eq!(board.count(StageStatus::Complete), 4);
        assert_eq!(board.active_index(), None);
    }

    #[test]
    fn fail_only_touches_the_active_stage() {
        let mut board = StageBoard::new();
        board.activate(2);
        board.fail(1);
        assert_eq!(board.count(StageStatus::Error), 0);
        board.fail(2);
        assert_eq!(board.status(2), Some(StageStatus::Error));
        assert_eq!(board.count(StageStatus::Active), 0);
    }
}
