//! Prediction transport for the browser.
//!
//! Builds the multipart form from the candidate bytes and posts it with
//! gloo-net. `fetch` has no timeout of its own, so the request races a
//! gloo-timers timer and is aborted if the timer wins.

use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Uint8Array};
use leafscan::{PredictRequest, PredictionTransport, TransportError, TransportResponse};
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData};

use crate::types::{AppError, AppResult};

/// `fetch`-backed [`PredictionTransport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    pub fn new() -> Self {
        Self
    }
}

impl PredictionTransport for BrowserTransport {
    async fn send(&self, request: PredictRequest) -> Result<TransportResponse, TransportError> {
        let form = build_form(&request).map_err(|e| TransportError::Unreachable(e.to_string()))?;
        let controller = AbortController::new().ok();

        let fetch = Box::pin(async {
            let response = Request::post(&request.url)
                .abort_signal(controller.as_ref().map(|c| c.signal()).as_ref())
                .body(form)
                .map_err(|e| TransportError::Unreachable(e.to_string()))?
                .send()
                .await
                .map_err(|e| TransportError::Unreachable(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Unreachable(e.to_string()))?;
            Ok(TransportResponse::new(status, body))
        });

        let millis = u32::try_from(request.timeout.as_millis()).unwrap_or(u32::MAX);
        let outcome = match select(fetch, TimeoutFuture::new(millis)).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                log::warn!("⏱️ Prediction request timed out after {:?}", request.timeout);
                if let Some(controller) = &controller {
                    controller.abort();
                }
                Err(TransportError::TimedOut(request.timeout))
            }
        };
        outcome
    }
}

/// Multipart body with the image under `request.field`.
fn build_form(request: &PredictRequest) -> AppResult<FormData> {
    let parts = Array::of1(&Uint8Array::from(&request.payload[..]));
    let options = BlobPropertyBag::new();
    options.set_type(&request.media_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(AppError::form)?;

    let form = FormData::new().map_err(AppError::form)?;
    form.append_with_blob_and_filename(request.field, &blob, &request.file_name)
        .map_err(AppError::form)?;
    Ok(form)
}
