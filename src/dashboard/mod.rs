//! Read-only projection of an analysis result for the Intelligence Center.
//!
//! Everything here is a pure function of the stored result and the fetched
//! project history.

mod health;
mod history;
mod preview;
mod text;
mod tiles;

pub use health::{HealthRing, HealthTier, RING_RADIUS, Rgb};
pub use history::{HISTORY_PREVIEW_LEN, HistoryRow, display_date, history_preview};
pub use preview::{
    CONFLICT_PREVIEW_LEN, CONFLICT_TOPIC_BUDGET, ConflictRow, REQUIREMENT_PREVIEW_LEN,
    REQUIREMENT_TEXT_BUDGET, RequirementKind, RequirementRow, conflict_preview,
    requirement_preview, requirement_text,
};
pub use text::{PLACEHOLDER, format_score, truncate_chars};
pub use tiles::{StatTile, TileKind, TileValue, stat_tiles};

use std::fmt;

use crate::api::{AnalysisResult, ProjectHistoryEntry};

pub const EMPTY_HEADER: &str = "No analysis loaded yet — upload documents to begin.";

/// Buttons offered in the dashboard header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardAction {
    ViewBrd,
    Conflicts(usize),
    Export,
}

impl DashboardAction {
    pub fn label(self) -> String {
        match self {
            Self::ViewBrd => "View BRD".to_string(),
            Self::Conflicts(count) => format!("{count} Conflicts"),
            Self::Export => "Export BRD".to_string(),
        }
    }
}

/// Everything the dashboard shows.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub has_result: bool,
    pub header: String,
    pub actions: Vec<DashboardAction>,
    pub tiles: [StatTile; 4],
    pub health: HealthRing,
    pub requirements: Vec<RequirementRow>,
    pub total_requirements: usize,
    pub conflicts: Vec<ConflictRow>,
    pub total_conflicts: usize,
    pub history: Vec<HistoryRow>,
}

impl DashboardView {
    pub fn project(result: Option<&AnalysisResult>, history: &[ProjectHistoryEntry]) -> Self {
        let (requirements, conflicts) = result
            .map(|result| (result.requirements.as_slice(), result.conflicts.as_slice()))
            .unwrap_or_default();
        let header = match result {
            Some(result) => result.project_name.clone().unwrap_or_default(),
            None => EMPTY_HEADER.to_string(),
        };
        let mut actions = Vec::new();
        if result.is_some() {
            actions.push(DashboardAction::ViewBrd);
            if !conflicts.is_empty() {
                actions.push(DashboardAction::Conflicts(conflicts.len()));
            }
            actions.push(DashboardAction::Export);
        }
        Self {
            has_result: result.is_some(),
            header,
            actions,
            tiles: stat_tiles(result),
            health: HealthRing::from_score(result.and_then(|result| result.health_score)),
            requirements: requirement_preview(requirements),
            total_requirements: requirements.len(),
            conflicts: conflict_preview(conflicts),
            total_conflicts: conflicts.len(),
            history: history_preview(history),
        }
    }
}

/// Plain-text rendering, used by the headless runner.
impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Intelligence Center: {}", self.header)?;
        for tile in &self.tiles {
            let marker = if tile.warning { " (!)" } else { "" };
            writeln!(f, "  {:<20} {}{marker}", tile.label(), tile.value)?;
        }
        writeln!(f, "BRD health: {} - {}", self.health.value_text, self.health.caption)?;
        if !self.requirements.is_empty() {
            writeln!(f, "Extracted requirements ({}):", self.total_requirements)?;
            for row in &self.requirements {
                writeln!(f, "  [{}] {} ({}, {})", row.id, row.text, row.kind.badge(), row.sources)?;
            }
        }
        if !self.conflicts.is_empty() {
            writeln!(f, "Active conflicts ({}):", self.total_conflicts)?;
            for row in &self.conflicts {
                writeln!(f, "  {:<10} {}", row.conflict_type, row.topic)?;
            }
        }
        if !self.history.is_empty() {
            writeln!(f, "Project history:")?;
            for row in &self.history {
                writeln!(f, "  {} {} {}", row.name, row.date, row.score)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisPayload, Conflict};
    use serde_json::json;

    #[test]
    fn empty_dashboard() {
        let view = DashboardView::project(None, &[]);
        assert!(!view.has_result);
        assert_eq!(view.header, EMPTY_HEADER);
        assert!(view.actions.is_empty());
        assert!(view.requirements.is_empty());
        assert_eq!(view.health.caption, HealthRing::EMPTY_CAPTION);
    }

    #[test]
    fn projects_a_stored_payload() {
        let payload = AnalysisPayload::from_value(json!({
            "project_name": "Apollo",
            "requirements": [{ "id": 1, "canonical_text": "Must log in", "label": "hard_requirement" }],
            "conflicts": [{ "conflict_type": "timeline", "topic": "Go-live" }],
            "stats": { "signals_processed": 40 },
            "health_score": 82
        }))
        .unwrap();
        let view = DashboardView::project(Some(&payload.result), &[]);
        assert_eq!(view.header, "Apollo");
        assert_eq!(
            view.actions,
            vec![
                DashboardAction::ViewBrd,
                DashboardAction::Conflicts(1),
                DashboardAction::Export
            ]
        );
        assert_eq!(view.requirements[0].id, "1");
        assert_eq!(view.health.tier, Some(HealthTier::High));
        let report = view.to_string();
        assert!(report.contains("Signals Processed    40"));
        assert!(report.contains("[1] Must log in (Hard Req, 1 source)"));
    }

    #[test]
    fn conflict_action_label() {
        assert_eq!(DashboardAction::Conflicts(3).label(), "3 Conflicts");
        assert_eq!(DashboardAction::Conflicts(1).label(), "1 Conflicts");
        let result = AnalysisResult {
            conflicts: vec![Conflict::default(); 2],
            ..Default::default()
        };
        let view = DashboardView::project(Some(&result), &[]);
        assert_eq!(view.actions[1], DashboardAction::Conflicts(2));
    }
}
