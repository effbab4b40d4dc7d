use std::fmt;

use crate::api::AnalysisResult;

use super::text::PLACEHOLDER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Requirements,
    Conflicts,
    Signals,
    Stakeholders,
}

impl TileKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Requirements => "Total Requirements",
            Self::Conflicts => "Conflicts Detected",
            Self::Signals => "Signals Processed",
            Self::Stakeholders => "Unique Stakeholders",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileValue {
    Count(u64),
    Placeholder,
}

impl fmt::Display for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Placeholder => f.write_str(PLACEHOLDER),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatTile {
    pub kind: TileKind,
    pub value: TileValue,
    pub warning: bool,
}

impl StatTile {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// The four summary tiles, backend statistics first, local counts second.
///
/// Without a result every tile shows the placeholder.
pub fn stat_tiles(result: Option<&AnalysisResult>) -> [StatTile; 4] {
    let Some(result) = result else {
        return [
            TileKind::Requirements,
            TileKind::Conflicts,
            TileKind::Signals,
            TileKind::Stakeholders,
        ]
        .map(|kind| StatTile {
            kind,
            value: TileValue::Placeholder,
            warning: false,
        });
    };
    let stats = &result.stats;
    let requirements = stats
        .total_requirements
        .unwrap_or(result.requirements.len() as u64);
    let conflicts = stats
        .conflicts_detected
        .unwrap_or(result.conflicts.len() as u64);
    let optional = |value: Option<u64>| value.map_or(TileValue::Placeholder, TileValue::Count);
    [
        StatTile {
            kind: TileKind::Requirements,
            value: TileValue::Count(requirements),
            warning: false,
        },
        StatTile {
            kind: TileKind::Conflicts,
            value: TileValue::Count(conflicts),
            warning: conflicts > 0,
        },
        StatTile {
            kind: TileKind::Signals,
            value: optional(stats.signals_processed),
            warning: false,
        },
        StatTile {
            kind: TileKind::Stakeholders,
            value: optional(stats.unique_stakeholders),
            warning: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisStats, Conflict};

    fn result_with(stats: AnalysisStats, conflicts: usize) -> AnalysisResult {
        AnalysisResult {
            stats,
            conflicts: vec![Conflict::default(); conflicts],
            ..Default::default()
        }
    }

    #[test]
    fn conflict_warning_follows_count() {
        let calm = result_with(
            AnalysisStats {
                total_requirements: Some(12),
                conflicts_detected: Some(0),
                ..Default::default()
            },
            0,
        );
        let tiles = stat_tiles(Some(&calm));
        assert_eq!(tiles[0].value, TileValue::Count(12));
        assert!(!tiles[1].warning);

        let noisy = result_with(
            AnalysisStats {
                conflicts_detected: Some(3),
                ..Default::default()
            },
            0,
        );
        let tiles = stat_tiles(Some(&noisy));
        assert_eq!(tiles[1].value, TileValue::Count(3));
        assert!(tiles[1].warning);
    }

    #[test]
    fn missing_stats_fall_back_to_local_counts() {
        let result = result_with(AnalysisStats::default(), 2);
        let tiles = stat_tiles(Some(&result));
        assert_eq!(tiles[0].value, TileValue::Count(0));
        assert_eq!(tiles[1].value, TileValue::Count(2));
        assert!(tiles[1].warning);
        assert_eq!(tiles[2].value.to_string(), "—");
        assert_eq!(tiles[3].value, TileValue::Placeholder);
    }

    #[test]
    fn no_result_shows_placeholders() {
        let tiles = stat_tiles(None);
        assert!(tiles.iter().all(|tile| tile.value == TileValue::Placeholder));
        assert_eq!(tiles[2].label(), "Signals Processed");
    }
}
