//! Native transport built on reqwest.

use reqwest::multipart::{Form, Part};
use std::time::Duration;

use super::{PredictRequest, PredictionTransport, TransportResponse};
use crate::error::TransportError;

/// Sends uploads with a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (proxies, TLS settings, connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl PredictionTransport for HttpTransport {
    async fn send(&self, request: PredictRequest) -> Result<TransportResponse, TransportError> {
        let timeout = request.timeout;
        let form = Form::new().part(request.field, image_part(&request));

        let response = self
            .client
            .post(&request.url)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        log::debug!("POST {} -> {} ({} bytes)", request.url, status, body.len());
        Ok(TransportResponse { status, body })
    }
}

fn image_part(request: &PredictRequest) -> Part {
    let part = || Part::bytes(request.payload.to_vec()).file_name(request.file_name.clone());
    match part().mime_str(&request.media_type) {
        Ok(part) => part,
        Err(e) => {
            log::warn!("⚠️  Sending {} without content type: {}", request.file_name, e);
            part()
        }
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut(timeout)
    } else {
        TransportError::Unreachable(err.to_string())
    }
}
