//! The upload workflow state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok───▶ Succeeded
//!                     │
//!                     └─────err───▶ Failed ──submit (retry)──▶ Loading
//!
//! any state ──accept(new file) / reset──▶ Idle
//! ```
//!
//! [`UploadWorkflow`] owns the candidate, its preview and the submission
//! state. All methods take `&self`: the session sits in a `RefCell` that is
//! never borrowed across an `.await`, so futures interleaving on one task
//! (a UI event loop, `futures::join!`) see consistent state.
//!
//! Every async continuation carries the [`CandidateId`] it started with and
//! only applies its result if that candidate is still current. Accepting a
//! new file or resetting advances the generation, which turns any pending
//! preview or prediction into a no-op on arrival.

use std::cell::RefCell;
use std::fmt;

use crate::client::{PredictionClient, PredictionTransport};
use crate::config::ClientConfig;
use crate::diagnosis::Diagnosis;
use crate::error::{ErrorKind, IntakeResult};
use crate::intake::{Candidate, CandidateId, FileIntake, FileSource, RawFile};
use crate::presenter::{self, ResultView};
use crate::preview::{Preview, PreviewGenerator};

// =============================================================================
// State types
// =============================================================================

/// Phase of the current submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Succeeded(Diagnosis),
    Failed(ErrorKind),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            SubmissionState::Succeeded(diagnosis) => Some(diagnosis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            SubmissionState::Failed(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Reset is offered once a submission has finished.
    pub fn is_finished(&self) -> bool {
        matches!(self, SubmissionState::Succeeded(_) | SubmissionState::Failed(_))
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Loading => write!(f, "loading"),
            SubmissionState::Succeeded(d) => write!(f, "succeeded ({})", d.disease_label),
            SubmissionState::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// Display-side facts about the current candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: String,
    pub media_type: String,
    pub size: usize,
}

impl From<&Candidate> for CandidateSummary {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id(),
            name: candidate.name().to_string(),
            media_type: candidate.media_type().to_string(),
            size: candidate.size(),
        }
    }
}

/// Owned copy of everything a view renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowSnapshot {
    pub candidate: Option<CandidateSummary>,
    pub preview: Option<Preview>,
    pub state: SubmissionState,
}

impl WorkflowSnapshot {
    /// `(absent, absent, Idle)`.
    pub fn is_initial(&self) -> bool {
        self.candidate.is_none() && self.preview.is_none() && self.state == SubmissionState::Idle
    }

    pub fn view(&self) -> ResultView {
        presenter::present(&self.state)
    }

    /// Whether `submit` would start a request: a candidate is selected and
    /// the state is `Idle` or `Failed`.
    pub fn can_submit(&self) -> bool {
        self.candidate.is_some()
            && matches!(self.state, SubmissionState::Idle | SubmissionState::Failed(_))
    }
}

#[derive(Debug, Default)]
struct Session {
    /// Id of the authoritative candidate; bumped on accept and reset.
    generation: u64,
    candidate: Option<Candidate>,
    preview: Option<Preview>,
    state: SubmissionState,
}

impl Session {
    fn is_current(&self, id: CandidateId) -> bool {
        self.generation == id.0 && self.candidate.is_some()
    }

    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            candidate: self.candidate.as_ref().map(CandidateSummary::from),
            preview: self.preview.clone(),
            state: self.state.clone(),
        }
    }
}

type Observer = Box<dyn Fn(&WorkflowSnapshot)>;

// =============================================================================
// Workflow
// =============================================================================

/// Intake → preview → prediction → presentation, one candidate at a time.
pub struct UploadWorkflow<T, P> {
    intake: FileIntake,
    client: PredictionClient<T>,
    previews: P,
    session: RefCell<Session>,
    observer: Option<Observer>,
}

impl<T, P> UploadWorkflow<T, P>
where
    T: PredictionTransport,
    P: PreviewGenerator,
{
    pub fn new(config: ClientConfig, transport: T, previews: P) -> Self {
        Self {
            intake: FileIntake::from_config(&config),
            client: PredictionClient::new(config, transport),
            previews,
            session: RefCell::new(Session::default()),
            observer: None,
        }
    }

    /// Call `observer` with a fresh snapshot after every applied transition.
    pub fn with_observer(mut self, observer: impl Fn(&WorkflowSnapshot) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Validate `raw` and make it the current candidate.
    ///
    /// On success the previous candidate, its preview and any result are
    /// dropped and the state returns to `Idle`. On failure nothing changes.
    /// Call [`Self::load_preview`] afterwards to render the new preview.
    pub fn accept(&self, raw: RawFile, source: FileSource) -> IntakeResult<Candidate> {
        let mut session = self.session.borrow_mut();
        let id = CandidateId(session.generation + 1);

        let candidate = match self.intake.admit(raw, id) {
            Ok(candidate) => candidate,
            Err(e) => {
                log::warn!("❌ Rejected file from {}: {}", source, e);
                return Err(e);
            }
        };

        let previous = session.state.clone();
        session.generation = id.0;
        session.candidate = Some(candidate.clone());
        session.state = SubmissionState::Idle;
        let stale_preview = session.preview.take();
        drop(session);

        if let Some(preview) = stale_preview {
            self.previews.release(&preview);
        }
        log::debug!(
            "Accepted {} {} from {} ({} bytes, was {})",
            id,
            candidate.name(),
            source,
            candidate.size(),
            previous
        );
        self.notify();
        Ok(candidate)
    }

    /// Render the preview for the current candidate.
    ///
    /// Returns `None` when there is no candidate or when a newer candidate
    /// (or a reset) superseded this one while the preview was being built;
    /// a superseded preview is released instead of applied.
    pub async fn load_preview(&self) -> Option<Preview> {
        let candidate = self.session.borrow().candidate.clone()?;

        let preview = self.previews.generate(&candidate).await;

        let replaced = {
            let mut session = self.session.borrow_mut();
            if session.is_current(candidate.id()) {
                Some(session.preview.replace(preview.clone()))
            } else {
                None
            }
        };

        match replaced {
            Some(old) => {
                if let Some(old) = old.filter(|old| old != &preview) {
                    self.previews.release(&old);
                }
                self.notify();
                Some(preview)
            }
            None => {
                log::debug!("Discarding stale preview for {}", candidate.id());
                self.previews.release(&preview);
                None
            }
        }
    }

    /// Submit the current candidate for diagnosis.
    ///
    /// Single-flight: while a submission is `Loading` this is a no-op that
    /// returns `Loading` without touching the network. It is also a no-op
    /// without a candidate or once the current candidate is diagnosed.
    /// A `Failed` submission may be retried.
    ///
    /// Returns the state after the call. If the candidate was replaced or
    /// reset while the request was in flight, the late result is dropped and
    /// the (newer) current state is returned.
    pub async fn submit(&self) -> SubmissionState {
        let candidate = {
            let mut session = self.session.borrow_mut();
            match &session.state {
                SubmissionState::Loading => {
                    log::debug!("Submission already in flight, ignoring");
                    return SubmissionState::Loading;
                }
                SubmissionState::Succeeded(_) => {
                    log::debug!("Current candidate already diagnosed, ignoring");
                    return session.state.clone();
                }
                SubmissionState::Idle | SubmissionState::Failed(_) => {}
            }
            let Some(candidate) = session.candidate.clone() else {
                log::warn!("⚠️  Submit requested without an image");
                return session.state.clone();
            };
            session.state = SubmissionState::Loading;
            candidate
        };
        self.notify();

        let next = match self.client.predict(&candidate).await {
            Ok(diagnosis) => {
                log::info!(
                    "✅ {}: {} ({}%)",
                    candidate.name(),
                    diagnosis.disease_label,
                    diagnosis.confidence_percent
                );
                SubmissionState::Succeeded(diagnosis)
            }
            Err(e) => {
                log::warn!("❌ Prediction failed for {}: {}", candidate.name(), e);
                SubmissionState::Failed(e.kind())
            }
        };

        let applied = {
            let mut session = self.session.borrow_mut();
            if session.is_current(candidate.id()) && session.state.is_loading() {
                session.state = next.clone();
                true
            } else {
                false
            }
        };

        if applied {
            self.notify();
            next
        } else {
            log::debug!("Discarding stale result for {}", candidate.id());
            self.state()
        }
    }

    /// Back to `(absent, absent, Idle)`. Idempotent.
    pub fn reset(&self) {
        let stale_preview = {
            let mut session = self.session.borrow_mut();
            session.generation += 1;
            session.candidate = None;
            session.state = SubmissionState::Idle;
            session.preview.take()
        };
        if let Some(preview) = stale_preview {
            self.previews.release(&preview);
        }
        log::debug!("Workflow reset");
        self.notify();
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.session.borrow().snapshot()
    }

    pub fn state(&self) -> SubmissionState {
        self.session.borrow().state.clone()
    }

    pub fn candidate(&self) -> Option<Candidate> {
        self.session.borrow().candidate.clone()
    }

    pub fn preview(&self) -> Option<Preview> {
        self.session.borrow().preview.clone()
    }

    /// Presenter output for the current state.
    pub fn view(&self) -> ResultView {
        presenter::present(&self.session.borrow().state)
    }

    pub fn client(&self) -> &PredictionClient<T> {
        &self.client
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.snapshot());
        }
    }
}
