//! The top-level state machine binding user actions to the session.
//!
//! There is one logical thread of control. A workflow that needs an answer
//! parks a [`Continuation`] on the modal stack and returns; the answer comes
//! back through [`WorkflowController::submit`] or
//! [`WorkflowController::cancel`], which resume it. Because the stack holds
//! at most one modal, at most one workflow is ever in flight.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::buffer::{Cursor, TextBuffer};
use super::commands::Menu;
use super::gate::{self, ConfirmPrompt, Gate};
use super::modal::{Dismissal, ModalRequest, ModalResponse, ModalStack, ModalTicket};
use super::notify::{NotificationSink, Severity};
use super::session::DocumentSession;
use super::status::StatusProjection;
use crate::io::{DirEntry, DirectoryBrowser, resolve_label};

const DISCARD_PROMPT: ConfirmPrompt = ConfirmPrompt {
    title: "Discard changes?",
    message: "The current file has unsaved changes. Discard them?",
};

const QUIT_PROMPT: ConfirmPrompt = ConfirmPrompt {
    title: "Quit?",
    message: "There are unsaved changes. Quit anyway?",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    New,
    Open,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrigin {
    /// Plain save of a buffer that has no file yet.
    Untitled,
    SaveAs,
}

/// What to do with the answer of the pending modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Discard(DestructiveAction),
    OpenChosen,
    SaveChosen(SaveOrigin),
    GotoLine,
    Acknowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    AwaitingConfirm,
    AwaitingFileOpen,
    AwaitingFileSave,
    AwaitingFilename,
    AwaitingInput,
    ShowingInfo,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Quit with nothing to lose.
    Clean,
    /// Quit after the user agreed to drop unsaved changes.
    Confirmed,
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("please enter a file name")]
    EmptyFileName,
    #[error("path does not exist: {0}")]
    Missing(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

/// How a submitted answer was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Resolved,
    /// The answer was rejected and the modal is still open.
    Reprompt,
    /// Nothing current to answer; the answer was dropped.
    Ignored,
}

pub struct WorkflowController<B, N, D> {
    session: DocumentSession,
    buffer: B,
    notifier: N,
    browser: D,
    modals: ModalStack<Continuation>,
    cwd: PathBuf,
    menu: Option<Menu>,
    exit: Option<ExitReason>,
}

impl<B, N, D> WorkflowController<B, N, D>
where
    B: TextBuffer,
    N: NotificationSink,
    D: DirectoryBrowser,
{
    pub fn new(buffer: B, notifier: N, browser: D, cwd: PathBuf) -> Self {
        Self {
            session: DocumentSession::new(),
            buffer,
            notifier,
            browser,
            modals: ModalStack::new(),
            cwd,
            menu: None,
            exit: None,
        }
    }

    /// Startup file: opened if it exists, otherwise remembered as the save
    /// target of an empty document. A file that fails to load stays the save
    /// target too.
    pub fn open_initial(&mut self, path: &Path, encoding: Option<&str>) {
        if path.exists() && self.open_path(path, encoding) {
            return;
        }
        info!(path = %path.display(), "starting new file");
        self.session = DocumentSession::with_path(path.to_path_buf());
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn menu(&self) -> Option<Menu> {
        self.menu
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    pub fn is_terminal(&self) -> bool {
        self.exit.is_some()
    }

    pub fn active_modal(&self) -> Option<(ModalTicket, &ModalRequest)> {
        self.modals.active()
    }

    pub fn state(&self) -> WorkflowState {
        if self.exit.is_some() {
            return WorkflowState::Terminal;
        }
        match self.modals.continuation() {
            None => WorkflowState::Idle,
            Some(Continuation::Discard(_)) => WorkflowState::AwaitingConfirm,
            Some(Continuation::OpenChosen) => WorkflowState::AwaitingFileOpen,
            Some(Continuation::SaveChosen(SaveOrigin::SaveAs)) => WorkflowState::AwaitingFileSave,
            Some(Continuation::SaveChosen(SaveOrigin::Untitled)) => {
                WorkflowState::AwaitingFilename
            }
            Some(Continuation::GotoLine) => WorkflowState::AwaitingInput,
            Some(Continuation::Acknowledge) => WorkflowState::ShowingInfo,
        }
    }

    pub fn status(&self) -> StatusProjection {
        StatusProjection::compute(&self.session, &self.buffer)
    }

    /// The buffer reported an edit. Cursor and selection moves must not call
    /// this.
    pub fn content_changed(&mut self) {
        if !self.is_terminal() {
            self.session.mark_dirty();
        }
    }

    pub fn notify(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!(message, "notify"),
            Severity::Warning => warn!(message, "notify"),
            Severity::Error => error!(message, "notify"),
        }
        self.notifier.notify(severity, message);
    }

    /// Lists `dir` for a picker, reporting failures.
    pub fn browse(&mut self, dir: &Path) -> Option<Vec<DirEntry>> {
        match self.browser.list(dir) {
            Ok(entries) => Some(entries),
            Err(e) => {
                self.notify(Severity::Error, &format!("Cannot list directory: {e}"));
                None
            }
        }
    }

    pub fn toggle_menu(&mut self, menu: Menu) {
        self.menu = if self.menu == Some(menu) {
            None
        } else {
            Some(menu)
        };
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    pub fn request_new(&mut self) {
        if self.busy("new") {
            return;
        }
        self.gated(DestructiveAction::New);
    }

    pub fn request_open(&mut self) {
        if self.busy("open") {
            return;
        }
        self.gated(DestructiveAction::Open);
    }

    pub fn request_quit(&mut self) {
        if self.busy("quit") {
            return;
        }
        self.gated(DestructiveAction::Quit);
    }

    pub fn force_quit(&mut self) {
        info!("force quit");
        self.menu = None;
        self.exit = Some(ExitReason::Forced);
    }

    pub fn request_save(&mut self) {
        if self.busy("save") {
            return;
        }
        if self.session.path().is_some() {
            self.save_to(None);
        } else {
            self.open_save_picker(SaveOrigin::Untitled);
        }
    }

    pub fn request_save_as(&mut self) {
        if self.busy("save as") {
            return;
        }
        self.open_save_picker(SaveOrigin::SaveAs);
    }

    pub fn request_goto(&mut self) {
        if self.busy("goto") {
            return;
        }
        self.menu = None;
        let current = self.buffer.cursor().line + 1;
        let request = ModalRequest::TextInput {
            title: "Go to line".to_string(),
            placeholder: "line number".to_string(),
            default: current.to_string(),
        };
        self.modals.open(request, Continuation::GotoLine);
    }

    pub fn show_about(&mut self) {
        if self.busy("about") {
            return;
        }
        self.menu = None;
        let request = ModalRequest::Info {
            title: format!("TermEdit v{}", env!("CARGO_PKG_VERSION")),
            lines: vec![
                "Terminal text editor".to_string(),
                String::new(),
                "Ctrl+N  New       Ctrl+S  Save".to_string(),
                "Ctrl+O  Open      Ctrl+Q  Quit".to_string(),
                "Ctrl+A  Select    Ctrl+Z  Undo".to_string(),
                "Ctrl+C  Copy      Ctrl+Y  Redo".to_string(),
                "Ctrl+X  Cut       Ctrl+V  Paste".to_string(),
                "Ctrl+G  Go to     F12     Save as".to_string(),
            ],
        };
        self.modals.open(request, Continuation::Acknowledge);
    }

    /// Answers the pending modal. Open targets are checked first and a bad
    /// one keeps the picker open.
    pub fn submit(&mut self, ticket: ModalTicket, response: ModalResponse) -> Submission {
        let is_current = self.modals.active().map(|(t, _)| t) == Some(ticket);
        if is_current {
            if let ModalResponse::OpenTarget { path, encoding } = &response {
                if let Err(e) = validate_open_target(path, encoding.as_deref()) {
                    self.notify(Severity::Warning, &e.to_string());
                    return Submission::Reprompt;
                }
            }
        }
        let outcome = self.modals.dismiss(ticket, Some(response));
        self.resolve(outcome)
    }

    pub fn cancel(&mut self, ticket: ModalTicket) -> Submission {
        let outcome = self.modals.cancel(ticket);
        self.resolve(outcome)
    }

    fn resolve(&mut self, outcome: Dismissal<Continuation>) -> Submission {
        match outcome {
            Dismissal::Resolved {
                continuation,
                response,
            } => {
                self.resume(continuation, response);
                Submission::Resolved
            }
            Dismissal::Stale { ticket } => {
                debug!(?ticket, "ignoring answer for a closed modal");
                Submission::Ignored
            }
            Dismissal::NothingPending => Submission::Ignored,
            Dismissal::WrongKind { expected, got } => {
                warn!(?expected, ?got, "modal answered with the wrong kind");
                Submission::Ignored
            }
        }
    }

    fn resume(&mut self, continuation: Continuation, response: Option<ModalResponse>) {
        match continuation {
            Continuation::Discard(action) => match gate::release(response.as_ref(), action) {
                Some(action) => self.perform(action, true),
                None => debug!(?action, "declined"),
            },
            Continuation::OpenChosen => {
                if let Some(ModalResponse::OpenTarget { path, encoding }) = response {
                    self.open_path(&path, encoding.as_deref());
                }
            }
            Continuation::SaveChosen(_) => {
                if let Some(ModalResponse::SaveTarget { dir, file_name }) = response {
                    let name = file_name.trim();
                    if name.is_empty() {
                        self.notify(Severity::Warning, &TargetError::EmptyFileName.to_string());
                    } else {
                        self.save_to(Some(&dir.join(name)));
                    }
                }
            }
            Continuation::GotoLine => {
                if let Some(ModalResponse::Text(input)) = response {
                    self.goto_line(&input);
                }
            }
            Continuation::Acknowledge => {}
        }
    }

    fn busy(&self, what: &str) -> bool {
        if self.is_terminal() || self.modals.is_pending() {
            debug!(request = what, state = ?self.state(), "request ignored");
            return true;
        }
        false
    }

    fn gated(&mut self, action: DestructiveAction) {
        self.menu = None;
        let prompt = match action {
            DestructiveAction::Quit => QUIT_PROMPT,
            _ => DISCARD_PROMPT,
        };
        match gate::guard(
            &self.session,
            &mut self.modals,
            prompt,
            action,
            Continuation::Discard,
        ) {
            Gate::Proceed(action) => self.perform(action, false),
            Gate::Held(ticket) => debug!(?ticket, ?action, "awaiting confirmation"),
        }
    }

    fn perform(&mut self, action: DestructiveAction, confirmed: bool) {
        match action {
            DestructiveAction::New => {
                self.session.new_document(&mut self.buffer);
                info!("new document");
            }
            DestructiveAction::Open => self.open_picker(),
            DestructiveAction::Quit => {
                info!(confirmed, "quit");
                self.exit = Some(if confirmed {
                    ExitReason::Confirmed
                } else {
                    ExitReason::Clean
                });
            }
        }
    }

    fn start_dir(&self) -> PathBuf {
        self.session
            .path()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    fn open_picker(&mut self) {
        let start_dir = self.start_dir();
        let entries = self.browse(&start_dir).unwrap_or_default();
        self.modals.open(
            ModalRequest::FileOpen { start_dir, entries },
            Continuation::OpenChosen,
        );
    }

    fn open_save_picker(&mut self, origin: SaveOrigin) {
        self.menu = None;
        let start_dir = self.start_dir();
        let entries = self.browse(&start_dir).unwrap_or_default();
        let default_name = self.session.file_name().unwrap_or_default();
        self.modals.open(
            ModalRequest::FileSave {
                start_dir,
                default_name,
                entries,
            },
            Continuation::SaveChosen(origin),
        );
    }

    fn open_path(&mut self, path: &Path, encoding: Option<&str>) -> bool {
        match self
            .session
            .open_document(path, encoding, &mut self.buffer)
        {
            Ok(used) => {
                let name = self.session.file_name().unwrap_or_default();
                self.notify(
                    Severity::Info,
                    &format!("Opened {name} (encoding: {})", used.name()),
                );
                true
            }
            Err(e) => {
                self.notify(Severity::Error, &format!("Cannot open: {e}"));
                false
            }
        }
    }

    fn save_to(&mut self, target: Option<&Path>) {
        match self.session.save_document(target, &self.buffer) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.notify(Severity::Info, &format!("Saved {name}"));
            }
            Err(e) => self.notify(Severity::Error, &format!("Cannot save: {e}")),
        }
    }

    fn goto_line(&mut self, input: &str) {
        match input.trim().parse::<usize>() {
            Ok(line) if line > 0 => self.buffer.set_cursor(Cursor {
                line: line - 1,
                col: 0,
            }),
            _ => self.notify(
                Severity::Warning,
                &format!("Not a line number: {}", input.trim()),
            ),
        }
    }
}

fn validate_open_target(path: &Path, encoding: Option<&str>) -> Result<(), TargetError> {
    if !path.exists() {
        return Err(TargetError::Missing(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(TargetError::NotAFile(path.display().to_string()));
    }
    if let Some(label) = encoding.filter(|l| !l.trim().is_empty()) {
        resolve_label(label).map_err(|_| TargetError::UnknownEncoding(label.trim().to_string()))?;
    }
    Ok(())
}
