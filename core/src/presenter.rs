//! Result presentation.
//!
//! Pure functions from workflow state to view models. Nothing here owns
//! state or performs I/O; the frontend and the CLI both render whatever
//! [`present`] returns.

use crate::diagnosis::{Diagnosis, Severity};
use crate::error::{ErrorKind, IntakeError};
use crate::workflow::{CandidateSummary, SubmissionState};

/// Shown before anything was submitted.
pub const PLACEHOLDER_MESSAGE: &str = "Upload an image to see the diagnosis results";

/// Shown while the prediction is running.
pub const PROGRESS_MESSAGE: &str = "Analyzing your plant...";

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Placeholder { message: &'static str },
    Progress { message: &'static str },
    Diagnosis(DiagnosisView),
    Failure(FailureView),
}

impl ResultView {
    /// Whether an "analyze another image" reset is offered.
    pub fn can_reset(&self) -> bool {
        matches!(self, ResultView::Diagnosis(_) | ResultView::Failure(_))
    }
}

/// A successful diagnosis, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisView {
    pub title: String,
    pub description: String,
    /// e.g. `87%`
    pub confidence_label: String,
    /// Bar fill in `[0, 1]`.
    pub confidence_fraction: f64,
    pub severity_badge: Option<SeverityBadge>,
    /// Numbered from 1.
    pub treatment: Vec<TreatmentStep>,
    pub healthy_banner: Option<HealthyBanner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityBadge {
    /// Upper-case severity, e.g. `HIGH`.
    pub label: String,
    pub tone: BadgeTone,
}

/// Colour family of a severity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Danger,
    Warning,
    Mild,
}

impl BadgeTone {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeTone::Danger => "badge-danger",
            BadgeTone::Warning => "badge-warning",
            BadgeTone::Mild => "badge-mild",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentStep {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthyBanner {
    pub headline: &'static str,
    pub detail: &'static str,
}

const HEALTHY_BANNER: HealthyBanner = HealthyBanner {
    headline: "Great news! Your plant is healthy.",
    detail: "Keep up the good care and continue monitoring your plant regularly.",
};

/// A failed submission. Carries the category only, never transport detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureView {
    pub kind: ErrorKind,
    pub title: &'static str,
    pub message: &'static str,
    pub can_retry: bool,
}

/// Selected-file card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCard {
    pub name: String,
    /// e.g. `12.3 KB`
    pub size_label: String,
}

// =============================================================================
// Mapping
// =============================================================================

/// Map a submission state to its view.
pub fn present(state: &SubmissionState) -> ResultView {
    match state {
        SubmissionState::Idle => ResultView::Placeholder { message: PLACEHOLDER_MESSAGE },
        SubmissionState::Loading => ResultView::Progress { message: PROGRESS_MESSAGE },
        SubmissionState::Succeeded(diagnosis) => ResultView::Diagnosis(present_diagnosis(diagnosis)),
        SubmissionState::Failed(kind) => ResultView::Failure(present_failure(*kind)),
    }
}

pub fn present_diagnosis(diagnosis: &Diagnosis) -> DiagnosisView {
    let severity_badge = diagnosis.reported_severity().map(|severity| SeverityBadge {
        label: severity.to_string(),
        tone: tone_for(severity),
    });

    let treatment = if diagnosis.is_healthy {
        Vec::new()
    } else {
        diagnosis
            .treatment_steps
            .iter()
            .enumerate()
            .map(|(idx, step)| TreatmentStep {
                number: idx + 1,
                text: step.clone(),
            })
            .collect()
    };

    DiagnosisView {
        title: diagnosis.disease_label.clone(),
        description: diagnosis.description.clone(),
        confidence_label: format!("{}%", format_percent(diagnosis.confidence_percent)),
        confidence_fraction: diagnosis.confidence_fraction().clamp(0.0, 1.0),
        severity_badge,
        treatment,
        healthy_banner: diagnosis.is_healthy.then_some(HEALTHY_BANNER),
    }
}

pub fn present_failure(kind: ErrorKind) -> FailureView {
    let (title, message) = failure_message(kind);
    FailureView {
        kind,
        title,
        message,
        can_retry: kind != ErrorKind::InvalidFile,
    }
}

/// `(title, message)` for each error category.
pub fn failure_message(kind: ErrorKind) -> (&'static str, &'static str) {
    match kind {
        ErrorKind::InvalidFile => (
            "Invalid file",
            "Please select a valid image file (JPG, PNG, JPEG).",
        ),
        ErrorKind::NetworkUnreachable => (
            "Service unreachable",
            "Could not reach the diagnosis service. Check your connection and try again.",
        ),
        ErrorKind::ServerError => (
            "Analysis failed",
            "The diagnosis service ran into a problem. Please try again later.",
        ),
        ErrorKind::MalformedResponse => (
            "Unexpected response",
            "The diagnosis service returned an answer we could not read. Please try again.",
        ),
    }
}

/// Notice for a rejected file.
pub fn intake_notice(err: &IntakeError) -> String {
    match err {
        IntakeError::NotAnImage { .. } => failure_message(ErrorKind::InvalidFile).1.to_string(),
        IntakeError::EmptyFile { name } => format!("'{name}' is empty. Please select another image."),
        IntakeError::TooLarge { name, limit, .. } => {
            format!("'{name}' is too large. Limit is {} per file.", format_size(*limit))
        }
    }
}

pub fn candidate_card(candidate: &CandidateSummary) -> CandidateCard {
    CandidateCard {
        name: candidate.name.clone(),
        size_label: format_size(candidate.size),
    }
}

/// Sizes in KB with one decimal, MB once above 1024 KB.
pub fn format_size(bytes: usize) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.1} KB", kb)
    } else {
        format!("{:.1} MB", kb / 1024.0)
    }
}

/// Up to two decimals, trailing zeros dropped.
pub fn format_percent(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn tone_for(severity: Severity) -> BadgeTone {
    match severity {
        Severity::High => BadgeTone::Danger,
        Severity::Moderate => BadgeTone::Warning,
        Severity::Low | Severity::None => BadgeTone::Mild,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::CandidateId;

    fn blight() -> Diagnosis {
        Diagnosis::from_json(
            r#"{"disease":"Blight","confidence":87,"severity":"high","description":"...",
                "treatment":["Step1","Step2"],"is_healthy":false}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_idle_and_loading() {
        assert_eq!(
            present(&SubmissionState::Idle),
            ResultView::Placeholder { message: PLACEHOLDER_MESSAGE }
        );
        assert_eq!(
            present(&SubmissionState::Loading),
            ResultView::Progress { message: PROGRESS_MESSAGE }
        );
        assert!(!present(&SubmissionState::Loading).can_reset());
    }

    #[test]
    fn test_diseased_view() {
        let view = match present(&SubmissionState::Succeeded(blight())) {
            ResultView::Diagnosis(view) => view,
            other => panic!("unexpected view: {other:?}"),
        };

        assert_eq!(view.title, "Blight");
        assert_eq!(view.confidence_label, "87%");
        assert!((view.confidence_fraction - 0.87).abs() < 1e-9);
        assert_eq!(
            view.severity_badge,
            Some(SeverityBadge { label: "HIGH".into(), tone: BadgeTone::Danger })
        );
        assert_eq!(
            view.treatment,
            vec![
                TreatmentStep { number: 1, text: "Step1".into() },
                TreatmentStep { number: 2, text: "Step2".into() },
            ]
        );
        assert!(view.healthy_banner.is_none());
    }

    #[test]
    fn test_healthy_view() {
        let diagnosis =
            Diagnosis::from_json(r#"{"disease":"None","confidence":99,"is_healthy":true}"#).unwrap();
        let view = present_diagnosis(&diagnosis);

        assert_eq!(view.healthy_banner, Some(HEALTHY_BANNER));
        assert!(view.severity_badge.is_none());
        assert!(view.treatment.is_empty());
        assert_eq!(view.confidence_label, "99%");
    }

    #[test]
    fn test_unhealthy_without_optional_fields() {
        let diagnosis = Diagnosis::from_json(r#"{"disease":"Rust","confidence":40.5}"#).unwrap();
        let view = present_diagnosis(&diagnosis);

        assert!(view.severity_badge.is_none());
        assert!(view.treatment.is_empty());
        assert!(view.healthy_banner.is_none());
        assert_eq!(view.confidence_label, "40.5%");
    }

    #[test]
    fn test_severity_none_has_no_badge() {
        let mut diagnosis = blight();
        diagnosis.severity = Some(Severity::None);
        assert!(present_diagnosis(&diagnosis).severity_badge.is_none());

        diagnosis.severity = Some(Severity::Moderate);
        let badge = present_diagnosis(&diagnosis).severity_badge.unwrap();
        assert_eq!(badge.label, "MODERATE");
        assert_eq!(badge.tone.css_class(), "badge-warning");
    }

    #[test]
    fn test_failure_views_hide_detail() {
        for kind in [
            ErrorKind::NetworkUnreachable,
            ErrorKind::ServerError,
            ErrorKind::MalformedResponse,
        ] {
            let view = match present(&SubmissionState::Failed(kind)) {
                ResultView::Failure(view) => view,
                other => panic!("unexpected view: {other:?}"),
            };
            assert_eq!(view.kind, kind);
            assert!(view.can_retry);
            assert!(!view.message.is_empty());
        }
        assert_ne!(
            failure_message(ErrorKind::ServerError),
            failure_message(ErrorKind::MalformedResponse)
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_size(12_595), "12.3 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_percent(87.0), "87");
        assert_eq!(format_percent(92.456), "92.46");
        assert_eq!(format_percent(0.0), "0");

        let card = candidate_card(&CandidateSummary {
            id: CandidateId(1),
            name: "leaf.jpg".into(),
            media_type: "image/jpeg".into(),
            size: 2048,
        });
        assert_eq!(card.size_label, "2.0 KB");
    }

    #[test]
    fn test_intake_notice() {
        let err = IntakeError::TooLarge { name: "huge.png".into(), size: 10, limit: 5 * 1024 * 1024 };
        assert_eq!(intake_notice(&err), "'huge.png' is too large. Limit is 5.0 MB per file.");
    }
}
