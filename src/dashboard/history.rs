use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::api::ProjectHistoryEntry;

use super::health::HealthTier;
use super::text::{PLACEHOLDER, format_score};

pub const HISTORY_PREVIEW_LEN: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    pub name: String,
    pub date: String,
    /// Missing scores sit in the lowest tier.
    pub tier: HealthTier,
    pub score: String,
}

impl HistoryRow {
    pub fn from_entry(entry: &ProjectHistoryEntry) -> Self {
        let score = entry.health_score.filter(|value| value.is_finite());
        Self {
            name: entry.name.clone(),
            date: entry
                .created_at
                .as_deref()
                .map(display_date)
                .unwrap_or_default(),
            tier: score.map_or(HealthTier::Low, HealthTier::for_score),
            score: score.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{}%", format_score(v))),
        }
    }
}

pub fn history_preview(history: &[ProjectHistoryEntry]) -> Vec<HistoryRow> {
    history
        .iter()
        .take(HISTORY_PREVIEW_LEN)
        .map(HistoryRow::from_entry)
        .collect()
}

/// `YYYY-MM-DD` for RFC 3339 timestamps or bare dates; anything else as is.
pub fn display_date(raw: &str) -> String {
    let day = format_description!("[year]-[month]-[day]");
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        if let Ok(text) = parsed.format(&day) {
            return text;
        }
    }
    if let Ok(date) = time::Date::parse(raw.get(..10).unwrap_or(raw), &day) {
        if let Ok(text) = date.format(&day) {
            return text;
        }
    }
    raw.to_string()
}
