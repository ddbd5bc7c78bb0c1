//! Diagnosis results panel.
//!
//! Renders whatever [`ResultView`] the current snapshot maps to. The panel
//! holds no state of its own.

use leafscan::presenter::{DiagnosisView, FailureView};
use leafscan::{ResultView, WorkflowSnapshot};
use leptos::*;

use crate::SharedWorkflow;

#[component]
pub fn ResultsPanel(
    workflow: SharedWorkflow,
    snapshot: ReadSignal<WorkflowSnapshot>,
) -> impl IntoView {
    let on_reset = move |_| {
        log::info!("🔄 Analyze another image");
        workflow.with_value(|wf| wf.reset());
    };
    let on_retry = move |_| {
        spawn_local(async move {
            workflow.get_value().submit().await;
        });
    };

    view! {
        <div class="results-panel">
            <h2>"Diagnosis Results"</h2>
            {move || match snapshot.with(|s| s.view()) {
                ResultView::Placeholder { message } => view! {
                    <div class="results-placeholder">
                        <div class="placeholder-icon">"🌱"</div>
                        <p>{message}</p>
                    </div>
                }.into_view(),
                ResultView::Progress { message } => view! {
                    <div class="results-loading">
                        <div class="spinner"></div>
                        <p>{message}</p>
                    </div>
                }.into_view(),
                ResultView::Diagnosis(diagnosis) => diagnosis_card(diagnosis),
                ResultView::Failure(failure) => failure_card(failure, on_retry),
            }}

            <Show
                when=move || snapshot.with(|s| s.view().can_reset())
                fallback=|| view! { }
            >
                <button class="reset-button" on:click=on_reset>"Analyze Another Image"</button>
            </Show>
        </div>
    }
}

fn diagnosis_card(diagnosis: DiagnosisView) -> View {
    let bar_width = format!("width: {:.0}%", diagnosis.confidence_fraction * 100.0);

    let severity = diagnosis.severity_badge.map(|badge| view! {
        <div class="result-row">
            <span class="result-label">"Severity"</span>
            <span class=format!("severity-badge {}", badge.tone.css_class())>{badge.label}</span>
        </div>
    });

    let treatment = (!diagnosis.treatment.is_empty()).then(|| {
        let steps = diagnosis
            .treatment
            .into_iter()
            .map(|step| view! {
                <li>
                    <span class="step-number">{step.number}</span>
                    <span>{step.text}</span>
                </li>
            })
            .collect_view();
        view! {
            <div class="treatment">
                <h3>"💊 Recommended Treatment"</h3>
                <ol class="treatment-steps">{steps}</ol>
            </div>
        }
    });

    let healthy = diagnosis.healthy_banner.map(|banner| view! {
        <div class="healthy-banner">
            <strong>{banner.headline}</strong>
            <p>{banner.detail}</p>
        </div>
    });

    view! {
        <div class="diagnosis-card">
            <h3 class="disease-name">{diagnosis.title}</h3>
            <div class="result-row">
                <span class="result-label">"Confidence"</span>
                <span class="confidence-value">{diagnosis.confidence_label}</span>
            </div>
            <div class="confidence-bar">
                <div class="confidence-fill" style=bar_width></div>
            </div>
            {severity}
            <p class="disease-description">{diagnosis.description}</p>
            {treatment}
            {healthy}
        </div>
    }
    .into_view()
}

fn failure_card(failure: FailureView, on_retry: impl Fn(ev::MouseEvent) + 'static) -> View {
    view! {
        <div class="error-card">
            <div class="error-icon">"❌"</div>
            <h3>{failure.title}</h3>
            <p>{failure.message}</p>
            {failure.can_retry.then(|| view! {
                <button class="retry-button" on:click=on_retry>"Try Again"</button>
            })}
        </div>
    }
    .into_view()
}
