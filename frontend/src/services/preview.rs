//! Object URL previews.
//!
//! `URL.createObjectURL` hands back a short `blob:` URL instead of a
//! base64 copy of the image. The browser keeps the blob alive until the URL
//! is revoked, which happens in [`PreviewGenerator::release`].

use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Uint8Array};
use leafscan::{Candidate, DataUriPreview, Preview, PreviewGenerator};
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectUrlPreview;

impl PreviewGenerator for ObjectUrlPreview {
    async fn generate(&self, candidate: &Candidate) -> Preview {
        // Let the accepted candidate render before copying its bytes.
        TimeoutFuture::new(0).await;

        match object_url(candidate) {
            Ok(url) => Preview::new(candidate.id(), url),
            Err(e) => {
                log::warn!("⚠️ {}, falling back to a data URI", e);
                DataUriPreview::encode(candidate)
            }
        }
    }

    fn release(&self, preview: &Preview) {
        if !preview.uri().starts_with("blob:") {
            return;
        }
        match Url::revoke_object_url(preview.uri()) {
            Ok(()) => log::debug!("🧹 Revoked preview for candidate {}", preview.candidate()),
            Err(e) => log::warn!("⚠️ {}", AppError::preview(e)),
        }
    }
}

fn object_url(candidate: &Candidate) -> AppResult<String> {
    let parts = Array::of1(&Uint8Array::from(candidate.payload()));
    let options = BlobPropertyBag::new();
    options.set_type(candidate.media_type());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(AppError::preview)?;

    Url::create_object_url_with_blob(&blob).map_err(AppError::preview)
}
