/// Zero-based position of the caret in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

/// The text widget the session reads snapshots from and loads content into.
///
/// Content changes are reported by whoever drives the widget (see
/// `WorkflowController::content_changed`); cursor moves are not changes.
pub trait TextBuffer {
    fn text(&self) -> String;
    /// Replaces the whole content and resets cursor and history.
    fn set_text(&mut self, text: &str);
    fn cursor(&self) -> Cursor;
    /// Moves the caret, clamping to the existing content.
    fn set_cursor(&mut self, cursor: Cursor);
}

#[cfg(test)]
pub(crate) use testing::MemoryBuffer;

#[cfg(test)]
mod testing {
    use super::{Cursor, TextBuffer};

    #[derive(Debug, Default)]
    pub(crate) struct MemoryBuffer {
        pub text: String,
        pub cursor: Cursor,
    }

    impl MemoryBuffer {
        pub fn with_text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                cursor: Cursor::default(),
            }
        }

        pub fn type_str(&mut self, s: &str) {
            self.text.push_str(s);
        }
    }

    impl TextBuffer for MemoryBuffer {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn set_text(&mut self, text: &str) {
            self.text = text.to_string();
            self.cursor = Cursor::default();
        }

        fn cursor(&self) -> Cursor {
            self.cursor
        }

        fn set_cursor(&mut self, cursor: Cursor) {
            let lines: Vec<&str> = self.text.split('\n').collect();
            let line = cursor.line.min(lines.len().saturating_sub(1));
            let col = cursor.col.min(lines[line].chars().count());
            self.cursor = Cursor { line, col };
        }
    }
}
