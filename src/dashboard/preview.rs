use crate::api::{Conflict, Requirement};

use super::text::truncate_chars;

pub const REQUIREMENT_PREVIEW_LEN: usize = 5;
pub const REQUIREMENT_TEXT_BUDGET: usize = 100;
pub const CONFLICT_PREVIEW_LEN: usize = 3;
pub const CONFLICT_TOPIC_BUDGET: usize = 80;

const FALLBACK_REQUIREMENT_TEXT: &str = "Requirement extracted.";
const DEFAULT_CONFLICT_TYPE: &str = "scope";
const HARD_LABEL: &str = "hard_requirement";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequirementKind {
    Hard,
    Soft,
}

impl RequirementKind {
    pub fn of(requirement: &Requirement) -> Self {
        if requirement.label.as_deref() == Some(HARD_LABEL) {
            Self::Hard
        } else {
            Self::Soft
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Hard => "Hard Req",
            Self::Soft => "Soft Req",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequirementRow {
    pub id: String,
    pub text: String,
    pub kind: RequirementKind,
    pub priority: Option<String>,
    pub sources: String,
}

impl RequirementRow {
    /// Row for one requirement, with its text cut to `budget` characters.
    pub fn from_requirement(requirement: &Requirement, budget: usize) -> Self {
        Self {
            id: requirement.id.clone().unwrap_or_default(),
            text: truncate_chars(requirement_text(requirement), budget),
            kind: RequirementKind::of(requirement),
            priority: requirement
                .priority
                .clone()
                .filter(|priority| !priority.is_empty()),
            sources: sources_label(requirement.corroboration_count),
        }
    }
}

/// Displayed text: canonical first, raw second, then a stock line.
pub fn requirement_text(requirement: &Requirement) -> &str {
    [&requirement.canonical_text, &requirement.text]
        .into_iter()
        .filter_map(|text| text.as_deref())
        .find(|text| !text.is_empty())
        .unwrap_or(FALLBACK_REQUIREMENT_TEXT)
}

fn sources_label(corroboration: Option<u32>) -> String {
    match corroboration {
        Some(count) if count > 1 => format!("{count} sources"),
        _ => "1 source".to_string(),
    }
}

pub fn requirement_preview(requirements: &[Requirement]) -> Vec<RequirementRow> {
    requirements
        .iter()
        .take(REQUIREMENT_PREVIEW_LEN)
        .map(|requirement| RequirementRow::from_requirement(requirement, REQUIREMENT_TEXT_BUDGET))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictRow {
    pub conflict_type: String,
    pub topic: String,
}

impl ConflictRow {
    pub fn from_conflict(conflict: &Conflict, budget: usize) -> Self {
        Self {
            conflict_type: conflict
                .conflict_type
                .clone()
                .filter(|kind| !kind.is_empty())
                .unwrap_or_else(|| DEFAULT_CONFLICT_TYPE.to_string()),
            topic: truncate_chars(conflict.topic.as_deref().unwrap_or_default(), budget),
        }
    }
}

pub fn conflict_preview(conflicts: &[Conflict]) -> Vec<ConflictRow> {
    conflicts
        .iter()
        .take(CONFLICT_PREVIEW_LEN)
        .map(|conflict| ConflictRow::from_conflict(conflict, CONFLICT_TOPIC_BUDGET))
        .collect()
}
