//! Command vocabulary shared by the menu bar, toolbar and keyboard shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Every user-invocable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // File
    New,
    Open,
    Save,
    SaveAs,
    Close,
    // Edit
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Delete,
    Find,
    Replace,
    GoToLine,
    SelectAll,
    TimeDate,
    // View
    ToggleWordWrap,
    ToggleLineNumbers,
    ToggleStatusBar,
    ToggleDarkMode,
    // Format
    Font,
    ToggleBold,
    ToggleItalic,
    TextColor,
    BackgroundColor,
    // Help
    About,
    Shortcuts,
}

impl Command {
    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Command::New => "New",
            Command::Open => "Open...",
            Command::Save => "Save",
            Command::SaveAs => "Save As...",
            Command::Close => "Close",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::Delete => "Delete",
            Command::Find => "Find...",
            Command::Replace => "Replace...",
            Command::GoToLine => "Go To Line...",
            Command::SelectAll => "Select All",
            Command::TimeDate => "Time/Date",
            Command::ToggleWordWrap => "Word Wrap",
            Command::ToggleLineNumbers => "Line Numbers",
            Command::ToggleStatusBar => "Status Bar",
            Command::ToggleDarkMode => "Dark Mode",
            Command::Font => "Font...",
            Command::ToggleBold => "Bold",
            Command::ToggleItalic => "Italic",
            Command::TextColor => "Text Color...",
            Command::BackgroundColor => "Background Color...",
            Command::About => "About",
            Command::Shortcuts => "Keyboard Shortcuts",
        }
    }

    /// Shortcut hint shown next to the menu label.
    pub fn shortcut(&self) -> Option<&'static str> {
        let hint = match self {
            Command::New => "Ctrl+N",
            Command::Open => "Ctrl+O",
            Command::Save => "Ctrl+S",
            Command::SaveAs => "Ctrl+Shift+S",
            Command::Close => "Ctrl+Q",
            Command::Undo => "Ctrl+Z",
            Command::Redo => "Ctrl+Y",
            Command::Cut => "Ctrl+X",
            Command::Copy => "Ctrl+C",
            Command::Paste => "Ctrl+V",
            Command::Delete => "Del",
            Command::Find => "Ctrl+F",
            Command::Replace => "Ctrl+H",
            Command::GoToLine => "Ctrl+G",
            Command::SelectAll => "Ctrl+A",
            Command::TimeDate => "F5",
            Command::ToggleWordWrap => "Ctrl+W",
            Command::ToggleLineNumbers => "Ctrl+L",
            Command::ToggleStatusBar => "Ctrl+D",
            Command::ToggleBold => "Ctrl+B",
            Command::ToggleItalic => "Ctrl+I",
            Command::Shortcuts => "F1",
            Command::ToggleDarkMode
            | Command::Font
            | Command::TextColor
            | Command::BackgroundColor
            | Command::About => return None,
        };
        Some(hint)
    }

    /// Whether the menu shows a check mark for this item.
    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            Command::ToggleWordWrap
                | Command::ToggleLineNumbers
                | Command::ToggleStatusBar
                | Command::ToggleDarkMode
                | Command::ToggleBold
                | Command::ToggleItalic
        )
    }
}

/// A row of a dropdown menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(Command),
    Separator,
}

/// A top-level menu.
#[derive(Debug)]
pub struct Menu {
    pub title: &'static str,
    /// Letter that opens the menu with Alt.
    pub mnemonic: char,
    pub entries: &'static [MenuEntry],
}

impl Menu {
    /// Command at a row, `None` for separators and out-of-range rows.
    pub fn command_at(&self, index: usize) -> Option<Command> {
        match self.entries.get(index)? {
            MenuEntry::Item(cmd) => Some(*cmd),
            MenuEntry::Separator => None,
        }
    }

    /// First selectable row.
    pub fn first_item(&self) -> usize {
        self.entries
            .iter()
            .position(|e| matches!(e, MenuEntry::Item(_)))
            .unwrap_or(0)
    }

    /// Next selectable row in the given direction, wrapping around.
    pub fn step(&self, from: usize, forward: bool) -> usize {
        let len = self.entries.len();
        if len == 0 {
            return 0;
        }
        let mut idx = from.min(len - 1);
        for _ in 0..len {
            idx = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            if matches!(self.entries[idx], MenuEntry::Item(_)) {
                return idx;
            }
        }
        from
    }
}

use MenuEntry::{Item, Separator};

const FILE_ENTRIES: &[MenuEntry] = &[
    Item(Command::New),
    Item(Command::Open),
    Item(Command::Save),
    Item(Command::SaveAs),
    Separator,
    Item(Command::Close),
];

const EDIT_ENTRIES: &[MenuEntry] = &[
    Item(Command::Undo),
    Item(Command::Redo),
    Separator,
    Item(Command::Cut),
    Item(Command::Copy),
    Item(Command::Paste),
    Item(Command::Delete),
    Separator,
    Item(Command::Find),
    Item(Command::Replace),
    Item(Command::GoToLine),
    Separator,
    Item(Command::SelectAll),
    Item(Command::TimeDate),
];

const VIEW_ENTRIES: &[MenuEntry] = &[
    Item(Command::ToggleWordWrap),
    Item(Command::ToggleLineNumbers),
    Item(Command::ToggleStatusBar),
    Separator,
    Item(Command::ToggleDarkMode),
];

const FORMAT_ENTRIES: &[MenuEntry] = &[
    Item(Command::Font),
    Item(Command::ToggleBold),
    Item(Command::ToggleItalic),
    Separator,
    Item(Command::TextColor),
    Item(Command::BackgroundColor),
];

const HELP_ENTRIES: &[MenuEntry] = &[Item(Command::About), Item(Command::Shortcuts)];

/// The menu bar, left to right.
pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        mnemonic: 'f',
        entries: FILE_ENTRIES,
    },
    Menu {
        title: "Edit",
        mnemonic: 'e',
        entries: EDIT_ENTRIES,
    },
    Menu {
        title: "View",
        mnemonic: 'v',
        entries: VIEW_ENTRIES,
    },
    Menu {
        title: "Format",
        mnemonic: 'o',
        entries: FORMAT_ENTRIES,
    },
    Menu {
        title: "Help",
        mnemonic: 'h',
        entries: HELP_ENTRIES,
    },
];

/// A toolbar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarEntry {
    Button(&'static str, Command),
    Separator,
}

pub const TOOLBAR: &[ToolbarEntry] = &[
    ToolbarEntry::Button("New", Command::New),
    ToolbarEntry::Button("Open", Command::Open),
    ToolbarEntry::Button("Save", Command::Save),
    ToolbarEntry::Separator,
    ToolbarEntry::Button("Cut", Command::Cut),
    ToolbarEntry::Button("Copy", Command::Copy),
    ToolbarEntry::Button("Paste", Command::Paste),
    ToolbarEntry::Separator,
    ToolbarEntry::Button("Find", Command::Find),
];

/// Index of the menu opened by Alt+`letter`.
pub fn menu_for_mnemonic(letter: char) -> Option<usize> {
    let letter = letter.to_ascii_lowercase();
    MENUS.iter().position(|m| m.mnemonic == letter)
}

/// Global shortcut bound to a key press, if any.
///
/// Plain editing keys (arrows, Backspace, Delete, printable characters)
/// are not commands and return `None`.
pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::F(1) => Some(Command::Shortcuts),
        KeyCode::F(5) => Some(Command::TimeDate),
        KeyCode::F(4) if alt => Some(Command::Close),
        KeyCode::Char(c) if ctrl && !alt => {
            // Terminals report Ctrl+Shift+S as either 'S' or 's' + SHIFT.
            let shifted = shift || c.is_ascii_uppercase();
            match (c.to_ascii_lowercase(), shifted) {
                ('s', true) => Some(Command::SaveAs),
                ('n', _) => Some(Command::New),
                ('o', _) => Some(Command::Open),
                ('s', false) => Some(Command::Save),
                ('q', _) => Some(Command::Close),
                ('z', _) => Some(Command::Undo),
                ('y', _) => Some(Command::Redo),
                ('x', _) => Some(Command::Cut),
                ('c', _) => Some(Command::Copy),
                ('v', _) => Some(Command::Paste),
                ('f', _) => Some(Command::Find),
                ('h', _) | ('r', _) => Some(Command::Replace),
                ('g', _) => Some(Command::GoToLine),
                ('a', _) => Some(Command::SelectAll),
                ('w', _) => Some(Command::ToggleWordWrap),
                ('l', _) => Some(Command::ToggleLineNumbers),
                ('d', _) => Some(Command::ToggleStatusBar),
                ('b', _) => Some(Command::ToggleBold),
                ('i', _) => Some(Command::ToggleItalic),
                _ => None,
            }
        }
        _ => None,
    }
}
