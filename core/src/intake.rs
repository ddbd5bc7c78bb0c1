//! File intake: turns a dropped or picked file into a [`Candidate`].
//!
//! Both sources funnel through [`FileIntake::admit`], so a file is judged
//! the same way whether it arrived by drag-and-drop or through the picker.
//! Drag hover feedback lives in [`DragState`] and never influences validation.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{IntakeError, IntakeResult};

/// Where a file came from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    DragDrop,
    Picker,
    /// Read from disk (CLI).
    Path,
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::DragDrop => write!(f, "drop"),
            FileSource::Picker => write!(f, "picker"),
            FileSource::Path => write!(f, "path"),
        }
    }
}

/// A file as delivered by the platform, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Display name (no directories).
    pub name: String,
    /// Declared media type, e.g. `image/png`. May be empty.
    pub media_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving its media type from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = guess_media_type(&name).to_string();
        Ok(Self { name, media_type, bytes })
    }
}

/// Identity of an accepted candidate. Strictly increasing per workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An accepted image awaiting (or under) analysis.
///
/// Immutable once created. The payload is shared, so clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    id: CandidateId,
    name: String,
    media_type: String,
    payload: Arc<[u8]>,
}

impl Candidate {
    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (lower-case) media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Shared handle on the payload, for transports that need ownership.
    pub fn shared_payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.payload)
    }
}

/// Validation policy for incoming files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIntake {
    max_upload_bytes: usize,
}

impl FileIntake {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_upload_bytes())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Check a file without consuming it.
    pub fn validate(&self, raw: &RawFile) -> IntakeResult<()> {
        if !is_image_media_type(&raw.media_type) {
            return Err(IntakeError::NotAnImage {
                name: raw.name.clone(),
                media_type: raw.media_type.clone(),
            });
        }
        if raw.bytes.is_empty() {
            return Err(IntakeError::EmptyFile { name: raw.name.clone() });
        }
        if raw.bytes.len() > self.max_upload_bytes {
            return Err(IntakeError::TooLarge {
                name: raw.name.clone(),
                size: raw.bytes.len(),
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Validate and turn the file into a candidate carrying `id`.
    pub fn admit(&self, raw: RawFile, id: CandidateId) -> IntakeResult<Candidate> {
        self.validate(&raw)?;
        Ok(Candidate {
            id,
            name: raw.name,
            media_type: raw.media_type.trim().to_ascii_lowercase(),
            payload: Arc::from(raw.bytes),
        })
    }
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// `image/<subtype>`, case-insensitive, surrounding whitespace ignored.
pub fn is_image_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim();
    media_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && media_type.len() > 6
}

/// Media type for a file name, from its extension.
///
/// Unknown extensions map to `application/octet-stream`, which intake rejects.
pub fn guess_media_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Drag feedback
// =============================================================================

/// Hover feedback for the drop zone. Carries no file data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Hovering,
}

impl DragState {
    /// A drag entered or moved over the zone.
    pub fn enter(self) -> Self {
        DragState::Hovering
    }

    /// The drag left the zone.
    pub fn leave(self) -> Self {
        DragState::Idle
    }

    /// Something was dropped; hover ends regardless of what it was.
    pub fn drop(self) -> Self {
        DragState::Idle
    }

    pub fn is_hovering(self) -> bool {
        self == DragState::Hovering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn png(name: &str) -> RawFile {
        RawFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_accepts_image_types() {
        let intake = FileIntake::new(1024);
        for media_type in ["image/png", "IMAGE/JPEG", " image/webp ", "image/svg+xml"] {
            let raw = RawFile::new("leaf", media_type, vec![1, 2, 3]);
            assert!(intake.validate(&raw).is_ok(), "{media_type} should pass");
        }
    }

    #[test]
    fn test_rejects_non_images() {
        let intake = FileIntake::new(1024);
        for media_type in ["", "image/", "text/plain", "application/pdf", "imagery/png", "video/mp4"] {
            let raw = RawFile::new("leaf", media_type, vec![1, 2, 3]);
            assert!(
                matches!(intake.validate(&raw), Err(IntakeError::NotAnImage { .. })),
                "{media_type:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        let intake = FileIntake::new(3);
        let empty = RawFile::new("empty.png", "image/png", Vec::new());
        assert!(matches!(intake.validate(&empty), Err(IntakeError::EmptyFile { .. })));

        let big = RawFile::new("big.png", "image/png", vec![0; 4]);
        assert_eq!(
            intake.validate(&big),
            Err(IntakeError::TooLarge { name: "big.png".into(), size: 4, limit: 3 })
        );
    }

    #[test]
    fn test_admit_normalizes_media_type() {
        let raw = RawFile::new("leaf.PNG", " Image/PNG", vec![7; 10]);
        let candidate = FileIntake::default().admit(raw, CandidateId(4)).unwrap();

        assert_eq!(candidate.id(), CandidateId(4));
        assert_eq!(candidate.media_type(), "image/png");
        assert_eq!(candidate.name(), "leaf.PNG");
        assert_eq!(candidate.size(), 10);
    }

    #[test]
    fn test_candidate_clone_shares_payload() {
        let candidate = FileIntake::default().admit(png("a.png"), CandidateId(1)).unwrap();
        let copy = candidate.clone();
        assert!(Arc::ptr_eq(&candidate.shared_payload(), &copy.shared_payload()));
    }

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("tomato.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("leaf.webp"), "image/webp");
        assert_eq!(guess_media_type("scan.tiff"), "image/tiff");
        assert_eq!(guess_media_type("notes.txt"), "application/octet-stream");
        assert_eq!(guess_media_type("README"), "application/octet-stream");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".jpeg").tempfile().unwrap();
        file.write_all(b"\xff\xd8\xff").unwrap();

        let raw = RawFile::from_path(file.path()).unwrap();
        assert_eq!(raw.media_type, "image/jpeg");
        assert_eq!(raw.bytes, b"\xff\xd8\xff");
        assert!(raw.name.ends_with(".jpeg"));
    }

    #[test]
    fn test_drag_state() {
        let state = DragState::default().enter();
        assert!(state.is_hovering());
        assert_eq!(state.enter(), DragState::Hovering);
        assert_eq!(state.leave(), DragState::Idle);
        assert_eq!(state.drop(), DragState::Idle);
    }
}
