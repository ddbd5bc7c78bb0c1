//! Frontend error type.
//!
//! Browser calls fail with opaque `JsValue`s; they are flattened into
//! strings here so components only deal with [`AppError`].

use std::fmt;

use wasm_bindgen::JsValue;

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Reading the selected file failed.
    FileRead(String),
    /// Building the upload form failed.
    Form(String),
    /// Creating an object URL failed.
    Preview(String),
}

impl AppError {
    pub(crate) fn file_read(err: JsValue) -> Self {
        AppError::FileRead(js_message(&err))
    }

    pub(crate) fn form(err: JsValue) -> Self {
        AppError::Form(js_message(&err))
    }

    pub(crate) fn preview(err: JsValue) -> Self {
        AppError::Preview(js_message(&err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::FileRead(msg) => write!(f, "File read error: {}", msg),
            AppError::Form(msg) => write!(f, "Form error: {}", msg),
            AppError::Preview(msg) => write!(f, "Preview error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

/// Best-effort text of a thrown JS value.
fn js_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
