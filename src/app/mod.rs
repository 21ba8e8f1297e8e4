mod dialog;
mod editor;
mod toast;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::core::{Command, Menu, Severity, Submission, WorkflowController};
use crate::input::{map_key_event, mouse_to_textarea_input, to_textarea_input};
use crate::io::FsBrowser;
use crate::ui::{UiModel, draw};

pub use dialog::{ConfirmChoice, Dialog, DialogForm, FilePicker, Focus, PickerMode};
pub use editor::EditorBuffer;
pub use toast::Toasts;

use dialog::DialogAction;

#[derive(Parser, Debug)]
#[command(author, version, about = "TermEdit - terminal text editor")]
struct Cli {
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
    /// Encoding label used to read FILE, e.g. gbk or shift_jis
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,
    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

type Workflow = WorkflowController<EditorBuffer, Toasts, FsBrowser>;

pub struct App {
    workflow: Workflow,
    dialog: Option<Dialog>,
    menu_selected: usize,
    needs_redraw: bool,
}

impl App {
    fn new(cwd: PathBuf) -> Self {
        Self {
            workflow: WorkflowController::new(
                EditorBuffer::new(),
                Toasts::default(),
                FsBrowser,
                cwd,
            ),
            dialog: None,
            menu_selected: 0,
            needs_redraw: true,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        self.needs_redraw = true;

        match map_key_event(key) {
            Some(Command::ForceQuit) => {
                self.workflow.force_quit();
                return;
            }
            cmd if self.dialog.is_none() && self.workflow.menu().is_some() => {
                self.handle_menu_key(key, cmd);
            }
            _ if self.dialog.is_some() => self.handle_dialog_key(key),
            Some(cmd) => self.apply_command(cmd),
            None => {
                if let Some(input) = to_textarea_input(key) {
                    if self.workflow.buffer_mut().input(input) {
                        self.workflow.content_changed();
                    }
                }
            }
        }
        self.sync_dialog();
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        if self.dialog.is_some() {
            return;
        }
        if let Some(input) = mouse_to_textarea_input(event) {
            self.workflow.buffer_mut().input(input);
            self.needs_redraw = true;
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let ticket = dialog.ticket;
        match dialog.handle_key(key) {
            DialogAction::None => {}
            DialogAction::Submit(response) => {
                if self.workflow.submit(ticket, response) != Submission::Reprompt {
                    self.dialog = None;
                }
            }
            DialogAction::Cancel => {
                self.workflow.cancel(ticket);
                self.dialog = None;
            }
            DialogAction::Navigate(dir) => self.navigate(&dir),
            DialogAction::Warn(message) => self.workflow.notify(Severity::Warning, &message),
        }
    }

    fn navigate(&mut self, dir: &Path) {
        let Some(entries) = self.workflow.browse(dir) else {
            return;
        };
        if let Some(picker) = self.dialog.as_mut().and_then(Dialog::picker_mut) {
            picker.enter(dir.to_path_buf(), entries);
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent, cmd: Option<Command>) {
        let Some(menu) = self.workflow.menu() else {
            return;
        };
        let items = menu.items();
        match key.code {
            KeyCode::Left => self.switch_menu(menu.prev()),
            KeyCode::Right => self.switch_menu(menu.next()),
            KeyCode::Up if !items.is_empty() => {
                self.menu_selected = (self.menu_selected + items.len() - 1) % items.len();
            }
            KeyCode::Down if !items.is_empty() => {
                self.menu_selected = (self.menu_selected + 1) % items.len();
            }
            KeyCode::Enter => {
                let chosen = items.get(self.menu_selected).map(|item| item.command);
                self.workflow.close_menu();
                if let Some(command) = chosen {
                    self.apply_command(command);
                }
            }
            _ => match cmd {
                Some(Command::ToggleMenu) | Some(Command::CloseMenu) => self.workflow.close_menu(),
                Some(command) => {
                    self.workflow.close_menu();
                    self.apply_command(command);
                }
                None => {}
            },
        }
    }

    fn switch_menu(&mut self, menu: Menu) {
        self.workflow.toggle_menu(menu);
        self.menu_selected = 0;
    }

    fn apply_command(&mut self, cmd: Command) {
        match cmd {
            Command::New => self.workflow.request_new(),
            Command::Open => self.workflow.request_open(),
            Command::Save => self.workflow.request_save(),
            Command::SaveAs => self.workflow.request_save_as(),
            Command::Quit => self.workflow.request_quit(),
            Command::ForceQuit => self.workflow.force_quit(),
            Command::GotoLine => self.workflow.request_goto(),
            Command::About => self.workflow.show_about(),
            Command::Undo => self.edit(EditorBuffer::undo),
            Command::Redo => self.edit(EditorBuffer::redo),
            Command::Cut => self.edit(EditorBuffer::cut),
            Command::Paste => self.edit(EditorBuffer::paste),
            Command::Copy => self.workflow.buffer_mut().copy(),
            Command::SelectAll => self.workflow.buffer_mut().select_all(),
            Command::ToggleMenu => {
                if self.workflow.menu().is_some() {
                    self.workflow.close_menu();
                } else {
                    self.switch_menu(Menu::File);
                }
            }
            Command::CloseMenu => self.workflow.close_menu(),
        }
    }

    fn edit(&mut self, op: fn(&mut EditorBuffer) -> bool) {
        if op(self.workflow.buffer_mut()) {
            self.workflow.content_changed();
        }
    }

    /// Rebuilds the dialog whenever the pending modal changed underneath it.
    fn sync_dialog(&mut self) {
        let active = self.workflow.active_modal();
        let current = self.dialog.as_ref().map(|d| d.ticket);
        match active {
            Some((ticket, _)) if current == Some(ticket) => {}
            Some((ticket, request)) => self.dialog = Some(Dialog::from_request(ticket, request)),
            None => self.dialog = None,
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.workflow.notifier_mut().expire(now) {
            self.needs_redraw = true;
        }
    }

    fn ui_model(&self) -> UiModel<'_> {
        UiModel {
            editor: self.workflow.buffer().widget(),
            status: self.workflow.status(),
            menu: self.workflow.menu(),
            menu_selected: self.menu_selected,
            dialog: self.dialog.as_ref(),
            toasts: self.workflow.notifier(),
        }
    }
}

fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let Some(path) = &cli.log_file else {
        return Ok(None);
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        Err(_) => Ok(None),
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let cwd = env::current_dir().context("reading current directory")?;
    let mut app = App::new(cwd);
    if let Some(path) = &cli.file {
        app.workflow.open_initial(path, cli.encoding.as_deref());
    }
    app.sync_dialog();

    let (_guard, mut terminal) = setup_terminal()?;
    info!("editor started");

    while !app.workflow.is_terminal() {
        if app.needs_redraw {
            terminal.draw(|f| draw(f, app.ui_model()))?;
            app.needs_redraw = false;
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => app.needs_redraw = true,
                _ => {}
            }
        }
        app.tick(Instant::now());
    }

    info!(reason = ?app.workflow.exit_reason(), "editor exiting");
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
    }
}

fn setup_terminal() -> Result<(TerminalGuard, Terminal<CrosstermBackend<io::Stdout>>)> {
    enable_raw_mode().context("enabling raw mode")?;
    execute!(
        io::stdout(),
        EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )
    .context("enter alternate screen")?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        tracing::error!(%panic_info, "panic");
        hook(panic_info);
    }));

    let guard = TerminalGuard;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend).context("creating terminal")?;
    Ok((guard, terminal))
}
