use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tui_textarea::{Input, Key};

use crate::core::Command;

pub fn map_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let mods = key.modifiers;
    let ctrl = mods.contains(KeyModifiers::CONTROL);
    let alt = mods.contains(KeyModifiers::ALT);
    let shift = mods.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') if ctrl && alt => Some(Command::ForceQuit),
        KeyCode::Char('s') | KeyCode::Char('S') if ctrl && shift => Some(Command::SaveAs),
        KeyCode::Char(c) if ctrl && !alt => match c.to_ascii_lowercase() {
            'n' => Some(Command::New),
            'o' => Some(Command::Open),
            's' => Some(Command::Save),
            'q' => Some(Command::Quit),
            'z' => Some(Command::Undo),
            'y' => Some(Command::Redo),
            'x' => Some(Command::Cut),
            'c' => Some(Command::Copy),
            'v' => Some(Command::Paste),
            'a' => Some(Command::SelectAll),
            'g' => Some(Command::GotoLine),
            _ => None,
        },
        KeyCode::F(1) => Some(Command::About),
        KeyCode::F(10) => Some(Command::ToggleMenu),
        KeyCode::F(12) => Some(Command::SaveAs),
        KeyCode::Esc => Some(Command::CloseMenu),
        _ => None,
    }
}

/// Translates a key press for the text widget. Keys bound to commands never
/// reach it.
pub fn to_textarea_input(key: KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let key_code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(Input {
        key: key_code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    })
}

pub fn mouse_to_textarea_input(event: MouseEvent) -> Option<Input> {
    let key = match event.kind {
        MouseEventKind::ScrollUp => Key::MouseScrollUp,
        MouseEventKind::ScrollDown => Key::MouseScrollDown,
        _ => return None,
    };
    Some(Input {
        key,
        ..Input::default()
    })
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use tui_textarea::Key;

    use super::{map_key_event, to_textarea_input};
    use crate::core::Command;

    fn press(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn file_shortcuts_map_to_commands() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(map_key_event(press(KeyCode::Char('n'), ctrl)), Some(Command::New));
        assert_eq!(map_key_event(press(KeyCode::Char('O'), ctrl)), Some(Command::Open));
        assert_eq!(map_key_event(press(KeyCode::Char('s'), ctrl)), Some(Command::Save));
        assert_eq!(
            map_key_event(press(KeyCode::Char('S'), ctrl | KeyModifiers::SHIFT)),
            Some(Command::SaveAs)
        );
        assert_eq!(map_key_event(press(KeyCode::Char('q'), ctrl)), Some(Command::Quit));
        assert_eq!(
            map_key_event(press(KeyCode::Char('q'), ctrl | KeyModifiers::ALT)),
            Some(Command::ForceQuit)
        );
    }

    #[test]
    fn plain_typing_is_not_a_command() {
        assert_eq!(map_key_event(press(KeyCode::Char('n'), KeyModifiers::NONE)), None);
        assert_eq!(map_key_event(press(KeyCode::Enter, KeyModifiers::NONE)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('q'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(key), None);
        assert!(to_textarea_input(key).is_none());
    }

    #[test]
    fn editing_keys_reach_the_widget() {
        let input =
            to_textarea_input(press(KeyCode::Char('É'), KeyModifiers::SHIFT)).expect("input");
        assert_eq!(input.key, Key::Char('É'));
        assert!(input.shift);
        assert!(to_textarea_input(press(KeyCode::F(5), KeyModifiers::NONE)).is_none());
    }
}
