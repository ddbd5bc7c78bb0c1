//! Prediction client.
//!
//! [`PredictionClient`] turns one candidate into one multipart `POST /predict`
//! and maps whatever comes back into a [`Diagnosis`] or a [`PredictionError`].
//! The HTTP exchange itself sits behind [`PredictionTransport`]:
//!
//! - [`HttpTransport`] - reqwest, native targets
//! - the frontend's `BrowserTransport` - gloo-net + `FormData`, wasm
//!
//! The client never retries and never caches: each call to
//! [`PredictionClient::predict`] is exactly one transport call.

#[cfg(not(target_arch = "wasm32"))]
pub mod http;

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpTransport;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ClientConfig, UPLOAD_FIELD};
use crate::diagnosis::Diagnosis;
use crate::error::{PredictionError, PredictionResult, TransportError};
use crate::intake::Candidate;

/// Longest body excerpt kept in a [`PredictionError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Everything a transport needs to send one multipart upload.
#[derive(Debug, Clone)]
pub struct PredictRequest {
    pub url: String,
    /// Multipart field name (`image`).
    pub field: &'static str,
    pub file_name: String,
    pub media_type: String,
    pub payload: Arc<[u8]>,
    pub timeout: Duration,
}

/// Raw HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a [`PredictRequest`] and hands back the raw response.
///
/// Implementations enforce `request.timeout` and report it as
/// [`TransportError::TimedOut`].
#[allow(async_fn_in_trait)]
pub trait PredictionTransport {
    async fn send(&self, request: PredictRequest) -> Result<TransportResponse, TransportError>;
}

/// Client for the `/predict` endpoint.
#[derive(Debug, Clone)]
pub struct PredictionClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: PredictionTransport> PredictionClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the upload for `candidate`.
    pub fn request_for(&self, candidate: &Candidate) -> PredictRequest {
        PredictRequest {
            url: self.config.predict_url(),
            field: UPLOAD_FIELD,
            file_name: candidate.name().to_string(),
            media_type: candidate.media_type().to_string(),
            payload: candidate.shared_payload(),
            timeout: self.config.request_timeout(),
        }
    }

    /// Submit `candidate` once and interpret the answer.
    pub async fn predict(&self, candidate: &Candidate) -> PredictionResult<Diagnosis> {
        let request = self.request_for(candidate);
        log::info!(
            "📤 Submitting {} ({} bytes) to {}",
            candidate.name(),
            candidate.size(),
            request.url
        );

        let response = self.transport.send(request).await?;
        interpret(response)
    }
}

/// Map a raw response onto the error taxonomy.
pub fn interpret(response: TransportResponse) -> PredictionResult<Diagnosis> {
    if !response.is_success() {
        return Err(PredictionError::Status {
            status: response.status,
            body: truncate(&response.body, MAX_ERROR_BODY),
        });
    }
    Diagnosis::from_json(&response.body)
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::intake::{CandidateId, FileIntake, RawFile};
    use std::cell::RefCell;

    /// Records requests and replays one canned answer.
    struct Canned {
        answer: Result<TransportResponse, TransportError>,
        seen: RefCell<Vec<PredictRequest>>,
    }

    impl PredictionTransport for Canned {
        async fn send(&self, request: PredictRequest) -> Result<TransportResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            self.answer.clone()
        }
    }

    fn client(answer: Result<TransportResponse, TransportError>) -> PredictionClient<Canned> {
        let config = ClientConfig::new("http://plants.local:8080/").unwrap();
        PredictionClient::new(config, Canned { answer, seen: RefCell::new(Vec::new()) })
    }

    fn candidate() -> Candidate {
        let raw = RawFile::new("leaf.jpg", "image/jpeg", vec![1, 2, 3]);
        FileIntake::default().admit(raw, CandidateId(1)).unwrap()
    }

    fn run(client: &PredictionClient<Canned>) -> PredictionResult<Diagnosis> {
        futures::executor::block_on(client.predict(&candidate()))
    }

    #[test]
    fn test_request_shape() {
        let client = client(Ok(TransportResponse::new(200, r#"{"disease":"Scab","confidence":70}"#)));
        run(&client).unwrap();

        let seen = client.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://plants.local:8080/predict");
        assert_eq!(seen[0].field, "image");
        assert_eq!(seen[0].file_name, "leaf.jpg");
        assert_eq!(seen[0].media_type, "image/jpeg");
        assert_eq!(&*seen[0].payload, &[1, 2, 3]);
        assert_eq!(seen[0].timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_error_mapping() {
        let err = run(&client(Err(TransportError::Unreachable("refused".into())))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);

        let err = run(&client(Ok(TransportResponse::new(500, "Prediction failed")))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);

        let err = run(&client(Ok(TransportResponse::new(404, "")))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);

        let err = run(&client(Ok(TransportResponse::new(200, "<html>oops</html>")))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_status_body_truncated() {
        let long = "x".repeat(2000);
        match run(&client(Ok(TransportResponse::new(502, long)))) {
            Err(PredictionError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY + 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
