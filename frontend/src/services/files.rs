//! Turning browser `File`s into [`RawFile`]s.

use js_sys::Uint8Array;
use leafscan::RawFile;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

use crate::types::{AppError, AppResult};

/// First file of a picker or drop selection. Extra files are ignored.
pub fn first_file(files: Option<FileList>) -> Option<File> {
    files?.get(0)
}

/// Read the whole file into memory.
pub async fn read_file(file: &File) -> AppResult<RawFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(AppError::file_read)?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    log::debug!("📄 Read {} ({} bytes, '{}')", file.name(), bytes.len(), file.type_());
    Ok(RawFile::new(file.name(), file.type_(), bytes))
}
