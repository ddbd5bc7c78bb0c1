//! Local previews of the candidate image.
//!
//! A [`Preview`] is a URI a view can display directly. Generators that hold
//! a platform resource behind the URI (browser object URLs) free it in
//! [`PreviewGenerator::release`]; the workflow calls it whenever a preview is
//! invalidated or arrives too late.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::intake::{Candidate, CandidateId};

/// Displayable representation of exactly one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    candidate: CandidateId,
    uri: String,
}

impl Preview {
    pub fn new(candidate: CandidateId, uri: impl Into<String>) -> Self {
        Self {
            candidate,
            uri: uri.into(),
        }
    }

    /// Candidate this preview was rendered from.
    pub fn candidate(&self) -> CandidateId {
        self.candidate
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Renders previews. Runs off the acceptance path.
#[allow(async_fn_in_trait)]
pub trait PreviewGenerator {
    async fn generate(&self, candidate: &Candidate) -> Preview;

    /// Free whatever backs `preview`. Default: nothing to free.
    fn release(&self, _preview: &Preview) {}
}

/// `data:` URI previews. Self-contained, nothing to release.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriPreview;

impl DataUriPreview {
    /// Encode synchronously.
    pub fn encode(candidate: &Candidate) -> Preview {
        let uri = format!(
            "data:{};base64,{}",
            candidate.media_type(),
            STANDARD.encode(candidate.payload())
        );
        Preview::new(candidate.id(), uri)
    }
}

impl PreviewGenerator for DataUriPreview {
    async fn generate(&self, candidate: &Candidate) -> Preview {
        Self::encode(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{FileIntake, RawFile};

    #[test]
    fn test_data_uri() {
        let raw = RawFile::new("leaf.png", "image/png", b"leaf".to_vec());
        let candidate = FileIntake::default().admit(raw, CandidateId(2)).unwrap();

        let preview = futures::executor::block_on(DataUriPreview.generate(&candidate));
        assert_eq!(preview.uri(), "data:image/png;base64,bGVhZg==");
        assert_eq!(preview.candidate(), CandidateId(2));
    }
}
