#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    ForceQuit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    GotoLine,
    About,
    ToggleMenu,
    CloseMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    File,
    Edit,
    Help,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub shortcut: &'static str,
    pub command: Command,
}

const FILE_ITEMS: [MenuItem; 5] = [
    MenuItem { label: "New", shortcut: "Ctrl+N", command: Command::New },
    MenuItem { label: "Open...", shortcut: "Ctrl+O", command: Command::Open },
    MenuItem { label: "Save", shortcut: "Ctrl+S", command: Command::Save },
    MenuItem { label: "Save As...", shortcut: "F12", command: Command::SaveAs },
    MenuItem { label: "Exit", shortcut: "Ctrl+Q", command: Command::Quit },
];

const EDIT_ITEMS: [MenuItem; 7] = [
    MenuItem { label: "Undo", shortcut: "Ctrl+Z", command: Command::Undo },
    MenuItem { label: "Redo", shortcut: "Ctrl+Y", command: Command::Redo },
    MenuItem { label: "Cut", shortcut: "Ctrl+X", command: Command::Cut },
    MenuItem { label: "Copy", shortcut: "Ctrl+C", command: Command::Copy },
    MenuItem { label: "Paste", shortcut: "Ctrl+V", command: Command::Paste },
    MenuItem { label: "Select All", shortcut: "Ctrl+A", command: Command::SelectAll },
    MenuItem { label: "Go to Line...", shortcut: "Ctrl+G", command: Command::GotoLine },
];

const HELP_ITEMS: [MenuItem; 1] = [MenuItem {
    label: "About",
    shortcut: "F1",
    command: Command::About,
}];

impl Menu {
    pub const ALL: [Menu; 3] = [Menu::File, Menu::Edit, Menu::Help];

    pub fn title(self) -> &'static str {
        match self {
            Menu::File => "File",
            Menu::Edit => "Edit",
            Menu::Help => "Help",
        }
    }

    pub fn items(self) -> &'static [MenuItem] {
        match self {
            Menu::File => &FILE_ITEMS,
            Menu::Edit => &EDIT_ITEMS,
            Menu::Help => &HELP_ITEMS,
        }
    }

    pub fn next(self) -> Menu {
        match self {
            Menu::File => Menu::Edit,
            Menu::Edit => Menu::Help,
            Menu::Help => Menu::File,
        }
    }

    pub fn prev(self) -> Menu {
        match self {
            Menu::File => Menu::Help,
            Menu::Edit => Menu::File,
            Menu::Help => Menu::Edit,
        }
    }
}
