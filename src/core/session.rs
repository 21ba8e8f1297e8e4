use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::info;

use super::buffer::TextBuffer;
use crate::io::{EolStyle, FileError, load_document, save_document};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error("document has no file name yet")]
    NoTarget,
}

/// Identity and modification state of the one open document.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    path: Option<PathBuf>,
    dirty: bool,
    eol: EolStyle,
    encoding: &'static Encoding,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSession {
    pub fn new() -> Self {
        Self {
            path: None,
            dirty: false,
            eol: EolStyle::Lf,
            encoding: UTF_8,
        }
    }

    /// A clean, empty document that will be written to `path` on first save.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::new()
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[cfg(test)]
    pub fn eol(&self) -> EolStyle {
        self.eol
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }

    pub fn new_document(&mut self, buffer: &mut impl TextBuffer) {
        buffer.set_text("");
        *self = Self::new();
    }

    /// Loads `path` into `buffer`. On failure neither the session nor the
    /// buffer is touched.
    pub fn open_document(
        &mut self,
        path: &Path,
        encoding: Option<&str>,
        buffer: &mut impl TextBuffer,
    ) -> Result<&'static Encoding, SessionError> {
        let doc = load_document(path, encoding)?;
        buffer.set_text(&doc.text);
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.eol = doc.eol;
        self.encoding = doc.encoding;
        info!(path = %path.display(), encoding = doc.encoding.name(), "document opened");
        Ok(doc.encoding)
    }

    /// Writes the buffer as UTF-8 to `target`, or to the current path.
    pub fn save_document(
        &mut self,
        target: Option<&Path>,
        buffer: &impl TextBuffer,
    ) -> Result<PathBuf, SessionError> {
        let path = target
            .or(self.path.as_deref())
            .map(Path::to_path_buf)
            .ok_or(SessionError::NoTarget)?;
        save_document(&path, &buffer.text(), self.eol)?;
        info!(path = %path.display(), "document saved");
        self.path = Some(path.clone());
        self.dirty = false;
        self.encoding = UTF_8;
        Ok(path)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
