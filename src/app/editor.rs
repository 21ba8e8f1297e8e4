use ratatui::style::{Color, Modifier, Style};
use tui_textarea::{CursorMove, Input, TextArea};

use crate::core::{Cursor, TextBuffer};

/// The editing widget. Every mutating call reports whether the text changed.
pub struct EditorBuffer {
    area: TextArea<'static>,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self {
            area: styled(vec![String::new()]),
        }
    }

    pub fn widget(&self) -> &TextArea<'static> {
        &self.area
    }

    pub fn input(&mut self, input: Input) -> bool {
        self.area.input(input)
    }

    pub fn undo(&mut self) -> bool {
        self.area.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.area.redo()
    }

    pub fn cut(&mut self) -> bool {
        self.area.cut()
    }

    pub fn copy(&mut self) {
        self.area.copy();
    }

    pub fn paste(&mut self) -> bool {
        self.area.paste()
    }

    pub fn select_all(&mut self) {
        self.area.select_all();
    }
}

fn styled(lines: Vec<String>) -> TextArea<'static> {
    let mut area = TextArea::new(lines);
    area.set_line_number_style(Style::default().fg(Color::DarkGray));
    area.set_cursor_line_style(Style::default());
    area.set_selection_style(Style::default().add_modifier(Modifier::REVERSED).fg(Color::LightBlue));
    area
}

impl TextBuffer for EditorBuffer {
    fn text(&self) -> String {
        self.area.lines().join("\n")
    }

    fn set_text(&mut self, text: &str) {
        self.area = styled(text.split('\n').map(str::to_string).collect());
    }

    fn cursor(&self) -> Cursor {
        let (line, col) = self.area.cursor();
        Cursor { line, col }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.area.cancel_selection();
        let line = u16::try_from(cursor.line).unwrap_or(u16::MAX);
        let col = u16::try_from(cursor.col).unwrap_or(u16::MAX);
        self.area.move_cursor(CursorMove::Jump(line, col));
    }
}
