//! # LeafScan - Plant leaf diagnosis upload workflow
//!
//! LeafScan takes a photo of a plant leaf, sends it to a prediction service
//! and turns the answer into a display-ready diagnosis (disease, confidence,
//! severity, treatment, or a healthy verdict).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Drop/Pick  │────▶│   Intake    │────▶│ Prediction  │────▶│  Presenter  │
//! │  (RawFile)  │     │ (validate)  │     │  (POST, 1x) │     │ (view model)│
//! └─────────────┘     └──────┬──────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │   Preview   │  (async, last candidate wins)
//!                     └─────────────┘
//! ```
//!
//! [`UploadWorkflow`] ties the stages together and owns all mutable state.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leafscan::{ClientConfig, DataUriPreview, FileSource, HttpTransport, RawFile, UploadWorkflow};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ClientConfig::from_env().unwrap();
//!     let workflow = UploadWorkflow::new(config, HttpTransport::new(), DataUriPreview);
//!
//!     let raw = RawFile::from_path("leaf.jpg".as_ref()).unwrap();
//!     workflow.accept(raw, FileSource::Path).unwrap();
//!     workflow.load_preview().await;
//!     println!("{}", workflow.submit().await);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error categories and error types
//! - [`config`] - Endpoint, timeout and upload limit
//! - [`intake`] - File validation and candidates
//! - [`preview`] - Local preview generation
//! - [`diagnosis`] - Diagnosis model and response normalization
//! - [`client`] - Prediction client and transports
//! - [`workflow`] - The state machine
//! - [`presenter`] - View models

// Core modules
pub mod error;
pub mod config;

// Stages
pub mod intake;
pub mod preview;
pub mod diagnosis;
pub mod client;

// Orchestration
pub mod workflow;
pub mod presenter;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError,
    ErrorKind,
    IntakeError,
    PredictionError,
    TransportError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::ClientConfig;

// =============================================================================
// Re-exports - Intake & Preview
// =============================================================================

pub use intake::{
    Candidate,
    CandidateId,
    DragState,
    FileIntake,
    FileSource,
    RawFile,
};

pub use preview::{DataUriPreview, Preview, PreviewGenerator};

// =============================================================================
// Re-exports - Prediction
// =============================================================================

pub use diagnosis::{Diagnosis, Severity};

pub use client::{
    PredictRequest,
    PredictionClient,
    PredictionTransport,
    TransportResponse,
};

#[cfg(not(target_arch = "wasm32"))]
pub use client::HttpTransport;

// =============================================================================
// Re-exports - Workflow & Presentation
// =============================================================================

pub use workflow::{
    CandidateSummary,
    SubmissionState,
    UploadWorkflow,
    WorkflowSnapshot,
};

pub use presenter::{
    present,
    DiagnosisView,
    FailureView,
    ResultView,
};
