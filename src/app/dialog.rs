//! Editable state of the modal currently on screen.
//!
//! A dialog is built from the pending `ModalRequest` and turns key presses
//! into a `DialogAction`; the answer itself goes back through the workflow
//! controller with the dialog's ticket.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{ModalRequest, ModalResponse, ModalTicket};
use crate::io::DirEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Open,
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Path,
    Entries,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Submit(ModalResponse),
    Cancel,
    Navigate(PathBuf),
    Warn(String),
}

#[derive(Debug, Clone)]
pub struct FilePicker {
    pub mode: PickerMode,
    pub dir: PathBuf,
    pub path_input: String,
    pub entries: Vec<DirEntry>,
    pub selected: usize,
    /// Encoding label when opening, file name when saving.
    pub field: String,
    pub focus: Focus,
}

#[derive(Debug, Clone)]
pub enum DialogForm {
    Confirm {
        title: String,
        message: String,
        choice: ConfirmChoice,
    },
    Input {
        title: String,
        placeholder: String,
        value: String,
    },
    Picker(FilePicker),
    Info {
        title: String,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub ticket: ModalTicket,
    pub form: DialogForm,
}

impl Dialog {
    pub fn from_request(ticket: ModalTicket, request: &ModalRequest) -> Self {
        let form = match request {
            ModalRequest::Confirm { title, message } => DialogForm::Confirm {
                title: title.clone(),
                message: message.clone(),
                choice: ConfirmChoice::No,
            },
            ModalRequest::TextInput {
                title,
                placeholder,
                default,
            } => DialogForm::Input {
                title: title.clone(),
                placeholder: placeholder.clone(),
                value: default.clone(),
            },
            ModalRequest::FileOpen { start_dir, entries } => DialogForm::Picker(FilePicker::new(
                PickerMode::Open,
                start_dir.clone(),
                entries.clone(),
                String::new(),
            )),
            ModalRequest::FileSave {
                start_dir,
                default_name,
                entries,
            } => {
                let mut picker = FilePicker::new(
                    PickerMode::Save,
                    start_dir.clone(),
                    entries.clone(),
                    default_name.clone(),
                );
                picker.focus = Focus::Field;
                DialogForm::Picker(picker)
            }
            ModalRequest::Info { title, lines } => DialogForm::Info {
                title: title.clone(),
                lines: lines.clone(),
            },
        };
        Self { ticket, form }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match &mut self.form {
            DialogForm::Confirm { choice, .. } => match key.code {
                KeyCode::Esc => DialogAction::Cancel,
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    DialogAction::Submit(ModalResponse::Confirmed(true))
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    DialogAction::Submit(ModalResponse::Confirmed(false))
                }
                KeyCode::Left | KeyCode::Up => {
                    *choice = ConfirmChoice::Yes;
                    DialogAction::None
                }
                KeyCode::Right | KeyCode::Down => {
                    *choice = ConfirmChoice::No;
                    DialogAction::None
                }
                KeyCode::Tab | KeyCode::BackTab => {
                    *choice = match choice {
                        ConfirmChoice::Yes => ConfirmChoice::No,
                        ConfirmChoice::No => ConfirmChoice::Yes,
                    };
                    DialogAction::None
                }
                KeyCode::Enter => {
                    DialogAction::Submit(ModalResponse::Confirmed(*choice == ConfirmChoice::Yes))
                }
                _ => DialogAction::None,
            },
            DialogForm::Input { value, .. } => match key.code {
                KeyCode::Esc => DialogAction::Cancel,
                KeyCode::Enter if value.is_empty() => DialogAction::Cancel,
                KeyCode::Enter => DialogAction::Submit(ModalResponse::Text(value.clone())),
                _ => {
                    edit_line(value, key);
                    DialogAction::None
                }
            },
            DialogForm::Info { .. } => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => {
                    DialogAction::Submit(ModalResponse::Acknowledged)
                }
                _ => DialogAction::None,
            },
            DialogForm::Picker(picker) => picker.handle_key(key),
        }
    }

    pub fn picker_mut(&mut self) -> Option<&mut FilePicker> {
        match &mut self.form {
            DialogForm::Picker(picker) => Some(picker),
            _ => None,
        }
    }
}

impl FilePicker {
    fn new(mode: PickerMode, dir: PathBuf, entries: Vec<DirEntry>, field: String) -> Self {
        Self {
            mode,
            path_input: dir.display().to_string(),
            dir,
            entries,
            selected: 0,
            field,
            focus: Focus::Entries,
        }
    }

    pub fn has_parent(&self) -> bool {
        self.dir.parent().is_some()
    }

    pub fn row_count(&self) -> usize {
        self.entries.len() + usize::from(self.has_parent())
    }

    /// Target of a listing row; the first row is `..` when there is a parent.
    pub fn row(&self, index: usize) -> Option<(PathBuf, bool)> {
        if self.has_parent() {
            if index == 0 {
                return self.dir.parent().map(|p| (p.to_path_buf(), true));
            }
            return self
                .entries
                .get(index - 1)
                .map(|e| (e.path.clone(), e.is_dir));
        }
        self.entries.get(index).map(|e| (e.path.clone(), e.is_dir))
    }

    /// Shows a freshly listed directory.
    pub fn enter(&mut self, dir: PathBuf, entries: Vec<DirEntry>) {
        self.path_input = dir.display().to_string();
        self.dir = dir;
        self.entries = entries;
        self.selected = 0;
    }

    fn encoding(&self) -> Option<String> {
        let label = self.field.trim();
        (!label.is_empty()).then(|| label.to_string())
    }

    fn open(&self, path: PathBuf) -> DialogAction {
        DialogAction::Submit(ModalResponse::OpenTarget {
            path,
            encoding: self.encoding(),
        })
    }

    fn save(&self) -> DialogAction {
        DialogAction::Submit(ModalResponse::SaveTarget {
            dir: self.dir.clone(),
            file_name: self.field.clone(),
        })
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match key.code {
            KeyCode::Esc => return DialogAction::Cancel,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Path => Focus::Entries,
                    Focus::Entries => Focus::Field,
                    Focus::Field => Focus::Path,
                };
                return DialogAction::None;
            }
            KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Path => Focus::Field,
                    Focus::Entries => Focus::Path,
                    Focus::Field => Focus::Entries,
                };
                return DialogAction::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Path => self.handle_path_key(key),
            Focus::Entries => self.handle_entries_key(key),
            Focus::Field => self.handle_field_key(key),
        }
    }

    fn handle_path_key(&mut self, key: KeyEvent) -> DialogAction {
        if key.code != KeyCode::Enter {
            edit_line(&mut self.path_input, key);
            return DialogAction::None;
        }
        let path = PathBuf::from(self.path_input.trim());
        if path.is_dir() {
            return DialogAction::Navigate(path);
        }
        match self.mode {
            PickerMode::Open => self.open(path),
            PickerMode::Save if path.is_file() => {
                self.field = file_name_of(&path);
                self.focus = Focus::Field;
                match path.parent() {
                    Some(parent) => DialogAction::Navigate(parent.to_path_buf()),
                    None => DialogAction::None,
                }
            }
            PickerMode::Save => {
                DialogAction::Warn(format!("Path does not exist: {}", path.display()))
            }
        }
    }

    fn handle_entries_key(&mut self, key: KeyEvent) -> DialogAction {
        let rows = self.row_count();
        match key.code {
            KeyCode::Up if rows > 0 => {
                self.selected = (self.selected + rows - 1) % rows;
                DialogAction::None
            }
            KeyCode::Down if rows > 0 => {
                self.selected = (self.selected + 1) % rows;
                DialogAction::None
            }
            KeyCode::Home => {
                self.selected = 0;
                DialogAction::None
            }
            KeyCode::End => {
                self.selected = rows.saturating_sub(1);
                DialogAction::None
            }
            KeyCode::Backspace => match self.dir.parent() {
                Some(parent) => DialogAction::Navigate(parent.to_path_buf()),
                None => DialogAction::None,
            },
            KeyCode::Enter => match self.row(self.selected) {
                Some((path, true)) => DialogAction::Navigate(path),
                Some((path, false)) => match self.mode {
                    PickerMode::Open => self.open(path),
                    PickerMode::Save => {
                        self.field = file_name_of(&path);
                        self.focus = Focus::Field;
                        DialogAction::None
                    }
                },
                None => DialogAction::None,
            },
            _ => DialogAction::None,
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) -> DialogAction {
        if key.code != KeyCode::Enter {
            edit_line(&mut self.field, key);
            return DialogAction::None;
        }
        match self.mode {
            PickerMode::Save => self.save(),
            PickerMode::Open => {
                let typed = PathBuf::from(self.path_input.trim());
                if typed.is_file() {
                    return self.open(typed);
                }
                match self.row(self.selected) {
                    Some((path, false)) => self.open(path),
                    _ => DialogAction::Warn("Please select a file".to_string()),
                }
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn edit_line(value: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            value.pop();
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            value.push(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::tempdir;

    use super::{ConfirmChoice, Dialog, DialogAction, DialogForm, Focus};
    use crate::core::{ModalRequest, ModalResponse, ModalTicket};
    use crate::io::{DirectoryBrowser, FsBrowser};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(dialog: &mut Dialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn ticket() -> ModalTicket {
        let mut modals = crate::core::ModalStack::new();
        modals.open(
            ModalRequest::Info {
                title: String::new(),
                lines: vec![],
            },
            (),
        )
    }

    fn confirm() -> Dialog {
        Dialog::from_request(
            ticket(),
            &ModalRequest::Confirm {
                title: "Quit?".into(),
                message: "Unsaved".into(),
            },
        )
    }

    #[test]
    fn confirm_defaults_to_no_and_escape_cancels() {
        let mut dialog = confirm();
        assert!(matches!(
            dialog.form,
            DialogForm::Confirm {
                choice: ConfirmChoice::No,
                ..
            }
        ));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::Confirmed(false))
        );
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogAction::Cancel);
    }

    #[test]
    fn confirm_shortcuts_and_arrows() {
        let mut dialog = confirm();
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('y'))),
            DialogAction::Submit(ModalResponse::Confirmed(true))
        );
        dialog.handle_key(key(KeyCode::Left));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::Confirmed(true))
        );
    }

    #[test]
    fn empty_text_input_counts_as_cancel() {
        let mut dialog = Dialog::from_request(
            ticket(),
            &ModalRequest::TextInput {
                title: "Go to line".into(),
                placeholder: String::new(),
                default: "1".into(),
            },
        );
        dialog.handle_key(key(KeyCode::Backspace));
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogAction::Cancel);
        typed(&mut dialog, "42");
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::Text("42".into()))
        );
    }

    #[test]
    fn open_picker_walks_directories_and_submits_files() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("docs")).expect("mkdir");
        std::fs::write(dir.path().join("docs").join("a.txt"), "a").expect("write");
        let entries = FsBrowser.list(dir.path()).expect("list");

        let mut dialog = Dialog::from_request(
            ticket(),
            &ModalRequest::FileOpen {
                start_dir: dir.path().to_path_buf(),
                entries,
            },
        );
        dialog.handle_key(key(KeyCode::Down));
        let docs = dir.path().join("docs");
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Navigate(docs.clone())
        );

        let listing = FsBrowser.list(&docs).expect("list");
        dialog.picker_mut().expect("picker").enter(docs.clone(), listing);
        dialog.handle_key(key(KeyCode::Tab));
        typed(&mut dialog, "gbk");
        dialog.handle_key(key(KeyCode::BackTab));
        dialog.handle_key(key(KeyCode::Down));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::OpenTarget {
                path: docs.join("a.txt"),
                encoding: Some("gbk".into()),
            })
        );
    }

    #[test]
    fn open_picker_field_enter_needs_a_file() {
        let dir = tempdir().expect("tempdir");
        let mut dialog = Dialog::from_request(
            ticket(),
            &ModalRequest::FileOpen {
                start_dir: dir.path().to_path_buf(),
                entries: vec![],
            },
        );
        dialog.handle_key(key(KeyCode::Tab));
        assert!(matches!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Warn(_)
        ));
    }

    #[test]
    fn typed_missing_path_is_submitted_for_validation() {
        let dir = tempdir().expect("tempdir");
        let mut dialog = Dialog::from_request(
            ticket(),
            &ModalRequest::FileOpen {
                start_dir: dir.path().to_path_buf(),
                entries: vec![],
            },
        );
        dialog.handle_key(key(KeyCode::BackTab));
        typed(&mut dialog, "/missing.txt");
        let expected = PathBuf::from(format!("{}/missing.txt", dir.path().display()));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::OpenTarget {
                path: expected,
                encoding: None,
            })
        );
    }

    #[test]
    fn save_picker_starts_in_the_name_field() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("old.txt"), "").expect("write");
        let entries = FsBrowser.list(dir.path()).expect("list");
        let mut dialog = Dialog::from_request(
            ticket(),
            &ModalRequest::FileSave {
                start_dir: dir.path().to_path_buf(),
                default_name: "draft".into(),
                entries,
            },
        );
        typed(&mut dialog, ".md");
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogAction::Submit(ModalResponse::SaveTarget {
                dir: dir.path().to_path_buf(),
                file_name: "draft.md".into(),
            })
        );

        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Down));
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogAction::None);
        match &dialog.form {
            DialogForm::Picker(picker) => {
                assert_eq!(picker.field, "old.txt");
                assert_eq!(picker.focus, Focus::Field);
            }
            other => panic!("unexpected form {other:?}"),
        }
    }
}
