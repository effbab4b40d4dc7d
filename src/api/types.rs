//! Wire types exchanged with the analysis backend.
//!
//! The backend owns these shapes; parsing is lenient so missing or `null`
//! fields fall back to defaults instead of failing the whole payload.

use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One extracted requirement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    #[serde(deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "text")]
    pub canonical_text: Option<String>,
    /// `hard_requirement` or anything else (treated as soft).
    #[serde(deserialize_with = "text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "text")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "small_count")]
    pub corroboration_count: Option<u32>,
}

/// One detected conflict between requirements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conflict {
    #[serde(deserialize_with = "text")]
    pub conflict_type: Option<String>,
    #[serde(deserialize_with = "text")]
    pub topic: Option<String>,
}

/// Precomputed backend statistics; any field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStats {
    #[serde(deserialize_with = "count")]
    pub total_requirements: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub conflicts_detected: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub signals_processed: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub unique_stakeholders: Option<u64>,
}

/// Typed view of a `/generate` response.
///
/// Every field decodes on a best-effort basis: a value of the wrong shape
/// reads as absent rather than failing the payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "text")]
    pub project_name: Option<String>,
    #[serde(deserialize_with = "list")]
    pub requirements: Vec<Requirement>,
    #[serde(deserialize_with = "list")]
    pub conflicts: Vec<Conflict>,
    #[serde(deserialize_with = "object")]
    pub stats: AnalysisStats,
    #[serde(deserialize_with = "score")]
    pub health_score: Option<f64>,
}

/// A `/generate` response kept verbatim next to its typed view.
///
/// Secondary views read fields the typed view does not model, so the raw
/// JSON is what gets exported.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisPayload {
    pub raw: Value,
    pub result: AnalysisResult,
}

impl AnalysisPayload {
    /// Only a non-object body is rejected; the typed view never fails on
    /// field contents.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        if !raw.is_object() {
            return Err(serde_json::Error::custom("expected a JSON object"));
        }
        let result = AnalysisResult::deserialize(&raw)?;
        Ok(Self { raw, result })
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Top-level section of the raw payload, if present and non-null.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.raw.get(key).filter(|value| !value.is_null())
    }
}

/// One row of `/projects`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectHistoryEntry {
    pub name: String,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "score")]
    pub health_score: Option<f64>,
}

/// Upload categories accepted by `/generate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    Emails,
    Transcripts,
    ChatLog,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 3] = [Self::Emails, Self::Transcripts, Self::ChatLog];

    /// Multipart field name the backend expects.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Emails => "emails",
            Self::Transcripts => "transcripts",
            Self::ChatLog => "slack",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Emails => "Emails",
            Self::Transcripts => "Meeting transcripts",
            Self::ChatLog => "Chat log",
        }
    }
}

/// An uploaded document held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Up to one file per upload category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadFiles {
    pub emails: Option<FileBlob>,
    pub transcripts: Option<FileBlob>,
    pub chat_log: Option<FileBlob>,
}

impl UploadFiles {
    pub fn get(&self, category: UploadCategory) -> Option<&FileBlob> {
        match category {
            UploadCategory::Emails => self.emails.as_ref(),
            UploadCategory::Transcripts => self.transcripts.as_ref(),
            UploadCategory::ChatLog => self.chat_log.as_ref(),
        }
    }

    pub fn set(&mut self, category: UploadCategory, blob: Option<FileBlob>) {
        let slot = match category {
            UploadCategory::Emails => &mut self.emails,
            UploadCategory::Transcripts => &mut self.transcripts,
            UploadCategory::ChatLog => &mut self.chat_log,
        };
        *slot = blob;
    }

    /// Supplied files in the order the backend documents them.
    pub fn parts(&self) -> impl Iterator<Item = (UploadCategory, &FileBlob)> {
        UploadCategory::ALL
            .into_iter()
            .filter_map(|category| self.get(category).map(|blob| (category, blob)))
    }

    pub fn is_empty(&self) -> bool {
        self.parts().next().is_none()
    }
}

/// Body of one `/generate` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub project_name: String,
    pub files: UploadFiles,
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "eml" => "message/rfc822",
        "txt" | "vtt" | "srt" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Finite number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn whole(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        number(value)
            .filter(|number| *number >= 0.0)
            .map(|number| number.round() as u64)
    })
}

fn score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(whole(&Value::deserialize(deserializer)?))
}

fn small_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(whole(&Value::deserialize(deserializer)?).and_then(|count| u32::try_from(count).ok()))
}

/// Array items that are not objects become default entries, so counts
/// still match what the backend sent.
fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| T::deserialize(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(T::deserialize(Value::deserialize(deserializer)?).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_tolerates_nulls_and_missing_fields() {
        let payload = AnalysisPayload::from_value(json!({
            "project_name": "Apollo",
            "requirements": null,
            "stats": null,
            "brd": {"sections": []}
        }))
        .unwrap();
        assert_eq!(payload.result.project_name.as_deref(), Some("Apollo"));
        assert!(payload.result.requirements.is_empty());
        assert!(payload.result.conflicts.is_empty());
        assert_eq!(payload.result.stats, AnalysisStats::default());
        assert!(payload.section("brd").is_some());
        assert!(payload.section("requirements").is_none());
    }

    #[test]
    fn requirement_ids_accept_numbers() {
        let payload = AnalysisPayload::from_value(json!({
            "requirements": [{"id": 7, "text": "a"}, {"id": "REQ-2"}]
        }))
        .unwrap();
        let ids: Vec<_> = payload
            .result
            .requirements
            .iter()
            .map(|req| req.id.clone())
            .collect();
        assert_eq!(ids, vec![Some("7".to_string()), Some("REQ-2".to_string())]);
    }

    #[test]
    fn loosely_typed_fields_still_decode() {
        let payload = AnalysisPayload::from_value(json!({
            "requirements": [
                {"id": 1, "text": "x", "priority": 1, "corroboration_count": 2.0},
                {"label": ["hard_requirement"], "corroboration_count": -1},
                "stray"
            ],
            "conflicts": {"topic": "not a list"},
            "stats": {"total_requirements": 12.0, "signals_processed": "40", "unique_stakeholders": true},
            "health_score": "80"
        }))
        .unwrap();
        let result = &payload.result;
        assert_eq!(result.requirements.len(), 3);
        let first = &result.requirements[0];
        assert_eq!(first.priority.as_deref(), Some("1"));
        assert_eq!(first.corroboration_count, Some(2));
        assert_eq!(result.requirements[1].label, None);
        assert_eq!(result.requirements[1].corroboration_count, None);
        assert_eq!(result.requirements[2], Requirement::default());
        assert!(result.conflicts.is_empty());
        assert_eq!(result.stats.total_requirements, Some(12));
        assert_eq!(result.stats.signals_processed, Some(40));
        assert_eq!(result.stats.unique_stakeholders, None);
        assert_eq!(result.health_score, Some(80.0));
    }

    #[test]
    fn only_non_object_bodies_are_rejected() {
        assert!(AnalysisPayload::from_value(json!([1, 2])).is_err());
        assert!(AnalysisPayload::parse("\"ok\"").is_err());
        assert!(AnalysisPayload::parse("not json").is_err());
        assert!(AnalysisPayload::from_value(json!({})).is_ok());
    }

    #[test]
    fn parts_follow_category_order_and_skip_missing() {
        let mut files = UploadFiles::default();
        assert!(files.is_empty());
        files.set(UploadCategory::ChatLog, Some(FileBlob::new("chat.json", vec![1])));
        files.set(UploadCategory::Emails, Some(FileBlob::new("mail.eml", vec![2])));
        let fields: Vec<_> = files
            .parts()
            .map(|(category, blob)| (category.field_name(), blob.content_type.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("emails", "message/rfc822"), ("slack", "application/json")]
        );
    }
}
