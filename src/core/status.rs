use super::buffer::TextBuffer;
use super::session::DocumentSession;

pub const UNTITLED: &str = "[Untitled]";

/// What the status bar shows. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusProjection {
    pub line: usize,
    pub col: usize,
    pub words: usize,
    pub file_name: String,
    pub dirty: bool,
    pub encoding: &'static str,
}

impl StatusProjection {
    pub fn compute(session: &DocumentSession, buffer: &impl TextBuffer) -> Self {
        let cursor = buffer.cursor();
        Self {
            line: cursor.line + 1,
            col: cursor.col + 1,
            words: buffer.text().split_whitespace().count(),
            file_name: session.file_name().unwrap_or_else(|| UNTITLED.to_string()),
            dirty: session.is_dirty(),
            encoding: session.encoding().name(),
        }
    }

    pub fn display_name(&self) -> String {
        if self.dirty {
            format!("{} *", self.file_name)
        } else {
            self.file_name.clone()
        }
    }
}
