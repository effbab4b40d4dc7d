//! Minimal `multipart/form-data` encoder for the `/generate` upload.

use rand::Rng;

use super::types::GenerateRequest;

/// An encoded multipart body and its boundary.
#[derive(Clone, Debug)]
pub(crate) struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

pub(crate) struct MultipartBuilder {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBuilder {
    pub(crate) fn new() -> Self {
        let mut rng = rand::rng();
        let boundary = format!(
            "----brdgen-{:016x}{:016x}",
            rng.random::<u64>(),
            rng.random::<u64>()
        );
        Self::with_boundary(boundary)
    }

    pub(crate) fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            bytes: Vec::new(),
        }
    }

    pub(crate) fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape(name)
        ));
        self.push_line("");
        self.bytes.extend_from_slice(value.as_bytes());
        self.push_line("");
        self
    }

    pub(crate) fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            escape(name),
            escape(file_name)
        ));
        self.push_line(&format!("Content-Type: {content_type}"));
        self.push_line("");
        self.bytes.extend_from_slice(contents);
        self.push_line("");
        self
    }

    pub(crate) fn finish(mut self) -> MultipartBody {
        let closing = format!("--{}--\r\n", self.boundary);
        self.bytes.extend_from_slice(closing.as_bytes());
        MultipartBody {
            boundary: self.boundary,
            bytes: self.bytes,
        }
    }

    fn open_part(&mut self) {
        let line = format!("--{}", self.boundary);
        self.push_line(&line);
    }

    fn push_line(&mut self, line: &str) {
        self.bytes.extend_from_slice(line.as_bytes());
        self.bytes.extend_from_slice(b"\r\n");
    }
}

/// Encode `project_name` plus whichever files were supplied.
pub(crate) fn encode_generate(request: &GenerateRequest, builder: MultipartBuilder) -> MultipartBody {
    let mut builder = builder.text("project_name", &request.project_name);
    for (category, blob) in request.files.parts() {
        builder = builder.file(
            category.field_name(),
            &blob.file_name,
            &blob.content_type,
            &blob.bytes,
        );
    }
    builder.finish()
}

fn escape(value: &str) -> String {
    value
        .chars()
        .filter(|ch| *ch != '\r' && *ch != '\n')
        .map(|ch| if ch == '"' { '\'' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{FileBlob, UploadCategory, UploadFiles};

    #[test]
    fn encodes_project_name_and_supplied_files_only() {
        let mut files = UploadFiles::default();
        files.set(
            UploadCategory::Transcripts,
            Some(FileBlob::new("standup.txt", b"hello".to_vec())),
        );
        let request = GenerateRequest {
            project_name: "Apollo".to_string(),
            files,
        };
        let body = encode_generate(&request, MultipartBuilder::with_boundary("XYZ"));
        let text = String::from_utf8(body.bytes().to_vec()).unwrap();
        assert_eq!(
            text,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"project_name\"\r\n\
             \r\n\
             Apollo\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"transcripts\"; filename=\"standup.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             hello\r\n\
             --XYZ--\r\n"
        );
        assert_eq!(body.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn quotes_and_newlines_cannot_break_headers() {
        let body = MultipartBuilder::with_boundary("B")
            .file("emails", "a\"b\r\n.eml", "message/rfc822", b"")
            .finish();
        let text = String::from_utf8(body.bytes().to_vec()).unwrap();
        assert!(text.contains("filename=\"a'b.eml\""));
    }

    #[test]
    fn random_boundaries_differ() {
        let a = MultipartBuilder::new().finish();
        let b = MultipartBuilder::new().finish();
        assert_ne!(a.content_type(), b.content_type());
    }
}
