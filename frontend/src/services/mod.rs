//! Browser-side implementations of the workflow seams.
//!
//! # Services
//!
//! - [`predict`] - `POST /predict` through `fetch` (gloo-net)
//! - [`preview`] - Object URL previews
//! - [`files`] - Reading picked or dropped files

pub mod files;
pub mod predict;
pub mod preview;

pub use files::*;
pub use predict::*;
pub use preview::*;
