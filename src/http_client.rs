//! HTTP agent construction and bounded response reading.
//!
//! Every request in the client goes through an agent built here. There are
//! no retries: a failed request is reported once and the caller decides.

use std::io::{self, Read};
use std::time::Duration;

use crate::config::HttpSettings;

const USER_AGENT: &str = concat!("brdgen/", env!("CARGO_PKG_VERSION"));

/// Why a response body could not be read.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ReadError {
    #[error("Response too large: {length} bytes (limit {limit})")]
    TooLarge { length: u64, limit: usize },
    #[error("Failed to read response: {0}")]
    Io(#[from] io::Error),
    #[error("Response is not UTF-8")]
    NotUtf8,
}

/// Build an agent with the configured timeouts.
pub(crate) fn agent(settings: &HttpSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(USER_AGENT)
        .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
        .timeout_read(Duration::from_secs(settings.read_timeout_secs))
        .timeout_write(Duration::from_secs(settings.write_timeout_secs))
        .build()
}

/// Read at most `limit` bytes of body. A declared or actual size above the
/// limit is an error rather than a truncated body.
pub(crate) fn read_response_bytes(
    response: ureq::Response,
    limit: usize,
) -> Result<Vec<u8>, ReadError> {
    if let Some(length) = declared_length(&response)
        && length > limit as u64
    {
        return Err(ReadError::TooLarge { length, limit });
    }
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Err(ReadError::TooLarge {
            length: bytes.len() as u64,
            limit,
        });
    }
    Ok(bytes)
}

pub(crate) fn read_response_text(
    response: ureq::Response,
    limit: usize,
) -> Result<String, ReadError> {
    String::from_utf8(read_response_bytes(response, limit)?).map_err(|_| ReadError::NotUtf8)
}

fn declared_length(response: &ureq::Response) -> Option<u64> {
    response.header("Content-Length")?.trim().parse().ok()
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve one canned HTTP response and hand back the raw request bytes.
    pub(crate) fn serve_once(response: String) -> (String, mpsc::Receiver<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
                let _ = tx.send(request);
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> Vec<u8> {
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let Ok(read) = stream.read(&mut buf) else {
                break;
            };
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
            if request_complete(&request) {
                break;
            }
        }
        request
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|window| window == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::serve_once;
    use super::*;

    #[test]
    fn read_response_bytes_rejects_content_length_over_max() {
        let (url, _) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nok".to_string());
        let response = agent(&HttpSettings::default()).get(&url).call().unwrap();
        let err = read_response_bytes(response, 10).unwrap_err();
        assert!(matches!(err, ReadError::TooLarge { length: 100, limit: 10 }));
    }

    #[test]
    fn read_response_bytes_rejects_body_over_max() {
        let body = "a".repeat(32);
        let (url, _) = serve_once(format!("HTTP/1.0 200 OK\r\n\r\n{body}"));
        let response = agent(&HttpSettings::default()).get(&url).call().unwrap();
        let err = read_response_bytes(response, 16).unwrap_err();
        assert!(matches!(err, ReadError::TooLarge { length: 17, limit: 16 }));
    }

    #[test]
    fn read_response_text_accepts_under_limit() {
        let body = "hello";
        let (url, _) = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        let response = agent(&HttpSettings::default()).get(&url).call().unwrap();
        assert_eq!(read_response_text(response, 16).unwrap(), "hello");
    }

    #[test]
    fn requests_identify_the_client() {
        let (url, requests) = serve_once("HTTP/1.1 204 No Content\r\n\r\n".to_string());
        agent(&HttpSettings::default()).get(&url).call().unwrap();
        let request = String::from_utf8(requests.recv().unwrap()).unwrap();
        assert!(request.to_ascii_lowercase().contains("user-agent: brdgen/"));
    }
}
