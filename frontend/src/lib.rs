//! LeafScan - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend that lets a user drop a leaf photo, preview it and
//! get a disease diagnosis from the prediction server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Hero (title, description)                                   │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  UploadSection               │  ResultsPanel                 │
//! │  (drop zone, preview,        │  (placeholder, progress,      │
//! │   analyze button)            │   diagnosis or failure)       │
//! └──────────────────────────────┴──────────────────────────────┘
//!                 │                          ▲
//!                 ▼                          │ snapshot signal
//!        UploadWorkflow<BrowserTransport, ObjectUrlPreview>
//! ```
//!
//! The workflow owns all state. Components call into it and re-render from
//! the snapshot it publishes after every transition.
//!
//! # Modules
//!
//! - [`config`] - Build-time configuration
//! - [`types`] - Frontend error type
//! - [`components`] - UI components (Hero, Upload, Results)
//! - [`services`] - Browser transport, previews, file reading

use std::rc::Rc;

use leafscan::{UploadWorkflow, WorkflowSnapshot};
use leptos::*;
use leptos_meta::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;
pub use types::{AppError, AppResult};
pub use components::*;
pub use services::*;

/// The workflow as wired in the browser.
pub type AppWorkflow = UploadWorkflow<BrowserTransport, ObjectUrlPreview>;

/// Handle components use to reach the workflow.
pub type SharedWorkflow = StoredValue<Rc<AppWorkflow>>;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install logging and the panic hook, then mount [`App`].
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🌿 {} - Starting Leptos App", APP_NAME);

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <main>
            <MainContent/>
        </main>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (snapshot, set_snapshot) = create_signal(WorkflowSnapshot::default());

    let config = client_config();
    log::info!("🔗 Prediction endpoint: {}", config.predict_url());

    let workflow = AppWorkflow::new(config, BrowserTransport::new(), ObjectUrlPreview)
        .with_observer(move |latest| set_snapshot.set(latest.clone()));
    let workflow: SharedWorkflow = store_value(Rc::new(workflow));

    // Revokes the last object URL when the page content goes away.
    on_cleanup(move || workflow.with_value(|wf| wf.reset()));

    view! {
        <div class="container">
            <Hero/>
            <div class="workspace">
                <UploadSection workflow=workflow snapshot=snapshot/>
                <ResultsPanel workflow=workflow snapshot=snapshot/>
            </div>
        </div>
    }
}
