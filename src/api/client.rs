//! HTTP implementation of [`AnalysisBackend`].

use crate::config::{AppConfig, HttpSettings};
use crate::http_client;

use super::multipart::{MultipartBuilder, encode_generate};
use super::types::{AnalysisPayload, GenerateRequest, ProjectHistoryEntry};
use super::{AnalysisBackend, ApiError};

const MAX_GENERATE_RESPONSE_BYTES: usize = 32 * 1024 * 1024;
const MAX_PROJECTS_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
const MAX_ERROR_RESPONSE_BYTES: usize = 64 * 1024;

/// Talks to the backend over plain HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    api_base: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base(&config.api_base, &config.http)
    }

    pub fn with_base(api_base: &str, http: &HttpSettings) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            agent: http_client::agent(http),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

impl AnalysisBackend for HttpBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
        let body = encode_generate(request, MultipartBuilder::new());
        tracing::info!(
            project = %request.project_name,
            bytes = body.bytes().len(),
            "Submitting documents to /generate"
        );
        let response = self
            .agent
            .post(&self.endpoint("generate"))
            .set("Accept", "application/json")
            .set("Content-Type", &body.content_type())
            .send_bytes(body.bytes());
        let text = read_success(response, MAX_GENERATE_RESPONSE_BYTES)?;
        AnalysisPayload::parse(&text).map_err(|err| ApiError::Json(err.to_string()))
    }

    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        let response = self
            .agent
            .get(&self.endpoint("projects"))
            .set("Accept", "application/json")
            .call();
        let text = read_success(response, MAX_PROJECTS_RESPONSE_BYTES)?;
        serde_json::from_str(&text).map_err(|err| ApiError::Json(err.to_string()))
    }
}

fn read_success(
    result: Result<ureq::Response, ureq::Error>,
    max_bytes: usize,
) -> Result<String, ApiError> {
    match result {
        Ok(response) => {
            http_client::read_response_text(response, max_bytes)
                .map_err(|err| ApiError::Transport(err.to_string()))
        }
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, MAX_ERROR_RESPONSE_BYTES)
                .unwrap_or_default();
            Err(ApiError::Status {
                code,
                detail: error_detail(code, &body),
            })
        }
        Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
    }
}

/// Pull the `detail` field out of an error body, or fall back to the status.
pub(crate) fn error_detail(code: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body.trim())
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => text,
        Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => {
            format!("HTTP {code}")
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{FileBlob, UploadCategory};
    use crate::http_client::test_server::serve_once;

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::with_base(&format!("{url}/"), &HttpSettings::default())
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn error_detail_prefers_string_detail() {
        assert_eq!(error_detail(422, r#"{"detail":"No files"}"#), "No files");
        assert_eq!(error_detail(500, r#"{"detail":""}"#), "HTTP 500");
        assert_eq!(error_detail(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(error_detail(503, ""), "HTTP 503");
        assert_eq!(
            error_detail(422, r#"{"detail":[{"msg":"field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn generate_posts_multipart_and_parses_payload() {
        let (url, requests) = serve_once(json_response(
            "200 OK",
            r#"{"project_name":"Apollo","requirements":[{"id":1,"text":"Must log in"}],"health_score":81}"#,
        ));
        let mut request = GenerateRequest {
            project_name: "Apollo".to_string(),
            ..Default::default()
        };
        request
            .files
            .set(UploadCategory::Emails, Some(FileBlob::new("inbox.eml", b"hi".to_vec())));

        let payload = backend(&url).generate(&request).unwrap();
        assert_eq!(payload.result.project_name.as_deref(), Some("Apollo"));
        assert_eq!(payload.result.requirements.len(), 1);
        assert_eq!(payload.result.health_score, Some(81.0));

        let raw = String::from_utf8_lossy(&requests.recv().unwrap()).into_owned();
        assert!(raw.starts_with("POST /generate "));
        assert!(raw.contains("multipart/form-data; boundary=----brdgen-"));
        assert!(raw.contains("name=\"project_name\"\r\n\r\nApollo\r\n"));
        assert!(raw.contains("name=\"emails\"; filename=\"inbox.eml\""));
        assert!(!raw.contains("name=\"slack\""));
    }

    #[test]
    fn generate_maps_error_status_to_detail() {
        let (url, _) = serve_once(json_response(
            "500 Internal Server Error",
            r#"{"detail":"Gemini quota exceeded"}"#,
        ));
        let err = backend(&url).generate(&GenerateRequest::default()).unwrap_err();
        match err {
            ApiError::Status { code, detail } => {
                assert_eq!(code, 500);
                assert_eq!(detail, "Gemini quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generate_rejects_malformed_success_body() {
        let (url, _) = serve_once(json_response("200 OK", "not json"));
        let err = backend(&url).generate(&GenerateRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[test]
    fn generate_accepts_loosely_typed_success_body() {
        let body = r#"{"requirements":[{"id":1,"text":"x","priority":1,"corroboration_count":2.0}],"stats":{"total_requirements":12.0},"health_score":80}"#;
        let (url, _) = serve_once(json_response("200 OK", body));
        let payload = backend(&url).generate(&GenerateRequest::default()).unwrap();
        assert_eq!(payload.raw, serde_json::from_str::<serde_json::Value>(body).unwrap());
        let requirement = &payload.result.requirements[0];
        assert_eq!(requirement.priority.as_deref(), Some("1"));
        assert_eq!(requirement.corroboration_count, Some(2));
        assert_eq!(payload.result.stats.total_requirements, Some(12));
    }

    #[test]
    fn generate_rejects_non_object_success_body() {
        let (url, _) = serve_once(json_response("200 OK", "[]"));
        let err = backend(&url).generate(&GenerateRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[test]
    fn projects_parses_history() {
        let (url, requests) = serve_once(json_response(
            "200 OK",
            r#"[{"name":"Apollo","created_at":"2024-03-01T10:00:00Z","health_score":72}]"#,
        ));
        let history = backend(&url).projects().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Apollo");
        let raw = String::from_utf8_lossy(&requests.recv().unwrap()).into_owned();
        assert!(raw.starts_with("GET /projects "));
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = backend(&format!("http://{addr}")).projects().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
