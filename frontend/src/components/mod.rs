//! UI Components for LeafScan.
//!
//! # Layout Components
//! - [`Hero`] - Title and description
//!
//! # Feature Components
//! - [`UploadSection`] - Drop zone, file picker, preview and analyze button
//! - [`ResultsPanel`] - Placeholder, progress, diagnosis or failure

mod hero;
mod results;
mod upload;

pub use hero::*;
pub use results::*;
pub use upload::*;
