use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::layout::Rect;

use crate::command::{Command, MENUS};
use crate::config::{AppConfig, ThemeConfig};
use crate::document::Document;
use crate::format::{parse_color_input, ColorTarget, FontStyle, TextFormat, PRESET_COLORS};
use crate::search::{self, SearchOptions, SearchState};
use crate::theme::{resolve_palette, resolve_theme, starts_dark, ThemeColors};

/// What to do once the user agrees to discard unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    Quit,
}

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    OpenFile,
    SaveAs,
    GoToLine,
    FindReplace,
    Font,
    ColorPicker { target: ColorTarget },
    CustomColor { target: ColorTarget },
    ConfirmDiscard { pending: PendingAction },
    About,
    Shortcuts,
}

impl DialogKind {
    /// Whether the dialog edits the shared single-line input.
    pub fn uses_text_input(&self) -> bool {
        matches!(
            self,
            DialogKind::OpenFile
                | DialogKind::SaveAs
                | DialogKind::GoToLine
                | DialogKind::CustomColor { .. }
        )
    }
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// A dropdown is open: menu index and highlighted row.
    Menu { index: usize, selected: usize },
    Dialog(DialogKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Modal message box shown above everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub level: MessageLevel,
}

/// Single-line text input with a byte-indexed cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub input: String,
    pub cursor_position: usize,
}

impl TextInput {
    pub fn with_text(text: &str) -> Self {
        Self {
            input: text.to_string(),
            cursor_position: text.len(),
        }
    }

    /// Insert a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    /// Insert pasted text, dropping line breaks.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if let Some(prev) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
            self.input.remove(self.cursor_position);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor_position < self.input.len() {
            self.input.remove(self.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.input[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input.len();
    }

    /// Cursor position in characters, for rendering.
    pub fn cursor_chars(&self) -> usize {
        self.input[..self.cursor_position].chars().count()
    }
}

/// Focusable controls of the find/replace dialog, in Tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindFocus {
    #[default]
    Find,
    Replace,
    MatchCase,
    WholeWord,
    FindButton,
    ReplaceButton,
    ReplaceAllButton,
}

impl FindFocus {
    const ORDER: [FindFocus; 7] = [
        FindFocus::Find,
        FindFocus::Replace,
        FindFocus::MatchCase,
        FindFocus::WholeWord,
        FindFocus::FindButton,
        FindFocus::ReplaceButton,
        FindFocus::ReplaceAllButton,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// State of the open find/replace dialog.
#[derive(Debug, Default)]
pub struct FindDialogState {
    pub find: TextInput,
    pub replace: TextInput,
    pub match_case: bool,
    pub whole_word: bool,
    pub focus: FindFocus,
    pub search: SearchState,
    /// Every occurrence in the document, for highlighting and the counter.
    pub matches: Vec<Range<usize>>,
}

impl FindDialogState {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.match_case,
            whole_word: self.whole_word,
        }
    }

    /// The text input owning keyboard focus, if a field is focused.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FindFocus::Find => Some(&mut self.find),
            FindFocus::Replace => Some(&mut self.replace),
            _ => None,
        }
    }

    /// Copy the dialog fields into the search state. A changed query or
    /// option set restarts the search from the top.
    fn sync(&mut self) {
        let options = self.options();
        if self.search.query != self.find.input || self.search.options != options {
            self.search = SearchState::new(self.find.input.clone(), options);
        }
    }
}

/// State of the font style dialog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontDialogState {
    pub selected: usize,
    /// Style to restore on Cancel.
    pub original: FontStyle,
}

/// Rows of the colour picker: the presets followed by "Custom...".
pub const COLOR_PICKER_ROWS: usize = PRESET_COLORS.len() + 1;

/// Which View menu toggles are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub status_bar: bool,
}

/// Screen rectangles recorded during the last render, for mouse hit tests.
#[derive(Debug, Default, Clone)]
pub struct ScreenLayout {
    pub menu_titles: Vec<Rect>,
    /// Open dropdown including its border.
    pub dropdown: Option<Rect>,
    pub toolbar_buttons: Vec<(Rect, Command)>,
    /// Text area of the editor, excluding the gutter.
    pub editor: Rect,
}

/// Whether the cell at (`x`, `y`) lies within `rect`.
pub fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Main application state.
pub struct App {
    pub document: Document,
    pub should_quit: bool,
    pub mode: AppMode,
    /// Input shared by the path, line number and custom colour dialogs.
    pub dialog_input: TextInput,
    pub find: Option<FindDialogState>,
    pub font_dialog: FontDialogState,
    pub color_picker_selected: usize,
    pub message: Option<Message>,
    pub view: ViewSettings,
    pub format: TextFormat,
    pub theme: ThemeColors,
    pub dark_mode: bool,
    theme_config: ThemeConfig,
    pub tab_width: usize,
    pub confirm_discard: bool,
    pub status_message: Option<(String, Instant)>,
    pub help_scroll: usize,
    pub layout: ScreenLayout,
    /// Mouse button held inside the editor.
    pub dragging: bool,
}

impl App {
    /// Create the application around a document, applying config defaults.
    pub fn new(config: &AppConfig, document: Document) -> Self {
        let dark_mode = starts_dark(&config.theme);
        let mut app = Self {
            document,
            should_quit: false,
            mode: AppMode::Normal,
            dialog_input: TextInput::default(),
            find: None,
            font_dialog: FontDialogState::default(),
            color_picker_selected: 0,
            message: None,
            view: ViewSettings {
                word_wrap: config.word_wrap(),
                line_numbers: config.line_numbers(),
                status_bar: config.status_bar(),
            },
            format: TextFormat::from_config(&config.format),
            theme: resolve_theme(&config.theme),
            dark_mode,
            theme_config: config.theme.clone(),
            tab_width: config.tab_width(),
            confirm_discard: config.confirm_discard(),
            status_message: None,
            help_scroll: 0,
            layout: ScreenLayout::default(),
            dragging: false,
        };
        app.document.wrap = app.view.word_wrap;
        app
    }

    /// Open `path` for editing. A missing file starts an empty document
    /// that will be created on first save.
    pub fn load_document(path: &Path) -> std::io::Result<Document> {
        if path.exists() {
            Document::from_file(path)
        } else {
            tracing::info!(file = %path.display(), "starting new file");
            Ok(Document::new("", Some(path.to_path_buf())))
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Status & messages ────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() >= 3 {
                self.status_message = None;
            }
        }
    }

    pub fn show_message(&mut self, title: &str, body: impl Into<String>, level: MessageLevel) {
        self.message = Some(Message {
            title: title.to_string(),
            body: body.into(),
            level,
        });
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// Left half of the status bar.
    pub fn status_counts(&self) -> String {
        format!(
            "Characters: {} | Words: {}",
            self.document.char_count(),
            self.document.word_count()
        )
    }

    /// Right half of the status bar (1-based).
    pub fn status_position(&self) -> String {
        format!(
            "Line: {}, Column: {}",
            self.document.cursor_line + 1,
            self.document.cursor_col + 1
        )
    }

    // ── Dialog plumbing ──────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_input = match &kind {
            DialogKind::SaveAs => self
                .document
                .file_path
                .as_ref()
                .map(|p| TextInput::with_text(&p.to_string_lossy()))
                .unwrap_or_default(),
            DialogKind::GoToLine => {
                TextInput::with_text(&(self.document.cursor_line + 1).to_string())
            }
            _ => TextInput::default(),
        };
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        if matches!(self.mode, AppMode::Dialog(DialogKind::FindReplace)) {
            self.find = None;
        }
        self.mode = AppMode::Normal;
        self.dialog_input = TextInput::default();
    }

    /// Ask before an action that would lose unsaved changes. Returns true
    /// when the action may proceed right away.
    fn guard_discard(&mut self, pending: PendingAction) -> bool {
        if self.document.modified && self.confirm_discard {
            self.open_dialog(DialogKind::ConfirmDiscard { pending });
            false
        } else {
            true
        }
    }

    /// The user agreed to discard changes.
    pub fn confirm_discard_accept(&mut self) {
        if let AppMode::Dialog(DialogKind::ConfirmDiscard { pending }) = self.mode {
            self.close_dialog();
            tracing::info!(?pending, "discarding unsaved changes");
            self.run_pending(pending);
        }
    }

    fn run_pending(&mut self, pending: PendingAction) {
        match pending {
            PendingAction::New => self.new_document(),
            PendingAction::Open => self.open_dialog(DialogKind::OpenFile),
            PendingAction::Quit => self.quit(),
        }
    }

    fn new_document(&mut self) {
        self.replace_document(Document::untitled());
        self.set_status_message("New document".to_string());
    }

    fn replace_document(&mut self, mut document: Document) {
        document.wrap = self.view.word_wrap;
        document.visible_height = self.document.visible_height;
        document.visible_width = self.document.visible_width;
        // The clipboard belongs to the session, not the file.
        document.clipboard = std::mem::take(&mut self.document.clipboard);
        self.document = document;
    }

    /// Enter on the shared-input dialogs.
    pub fn submit_dialog(&mut self) {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return;
        };
        match kind {
            DialogKind::OpenFile => self.submit_open(),
            DialogKind::SaveAs => self.submit_save_as(),
            DialogKind::GoToLine => self.submit_go_to_line(),
            DialogKind::CustomColor { target } => self.submit_custom_color(target),
            DialogKind::ConfirmDiscard { .. } => self.confirm_discard_accept(),
            DialogKind::ColorPicker { target } => self.color_picker_accept(target),
            DialogKind::Font => self.font_accept(),
            DialogKind::FindReplace => self.find_activate(),
            DialogKind::About | DialogKind::Shortcuts => self.close_dialog(),
        }
    }

    fn submit_open(&mut self) {
        let raw = self.dialog_input.input.trim().to_string();
        if raw.is_empty() {
            self.close_dialog();
            return;
        }
        let path = PathBuf::from(&raw);
        match Document::from_file(&path) {
            Ok(doc) => {
                self.close_dialog();
                self.replace_document(doc);
                self.set_status_message(format!("Opened {}", self.document.display_name()));
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "file_open_error");
                self.show_message(
                    "Open",
                    format!("Cannot open {}: {e}", path.display()),
                    MessageLevel::Error,
                );
            }
        }
    }

    fn submit_save_as(&mut self) {
        let raw = self.dialog_input.input.trim().to_string();
        if raw.is_empty() {
            self.close_dialog();
            return;
        }
        let path = PathBuf::from(&raw);
        match self.document.save_as(&path) {
            Ok(()) => {
                self.close_dialog();
                self.set_status_message(format!("Saved {}", self.document.display_name()));
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "file_save_error");
                self.show_message(
                    "Save As",
                    format!("Cannot save {}: {e}", path.display()),
                    MessageLevel::Error,
                );
            }
        }
    }

    fn save(&mut self) {
        if self.document.file_path.is_none() {
            self.open_dialog(DialogKind::SaveAs);
            return;
        }
        match self.document.save() {
            Ok(()) => self.set_status_message(format!("Saved {}", self.document.display_name())),
            Err(e) => {
                tracing::warn!(error = %e, "file_save_error");
                self.show_message("Save", format!("Cannot save: {e}"), MessageLevel::Error);
            }
        }
    }

    fn submit_go_to_line(&mut self) {
        match self.dialog_input.input.trim().parse::<usize>() {
            Ok(line) if line > 0 => {
                self.close_dialog();
                self.document.go_to_line(line);
            }
            _ => self.show_message(
                "Go To Line",
                "Please enter a valid line number.",
                MessageLevel::Warning,
            ),
        }
    }

    fn submit_custom_color(&mut self, target: ColorTarget) {
        match parse_color_input(&self.dialog_input.input) {
            Some(color) => {
                self.close_dialog();
                self.format.set_color(target, Some(color));
            }
            None => self.show_message(
                target.title(),
                "Enter a colour name (e.g. red, light blue) or #rrggbb.",
                MessageLevel::Warning,
            ),
        }
    }

    // ── Colour picker ────────────────────────────────────────────────────

    pub fn color_picker_move(&mut self, down: bool) {
        self.color_picker_selected = if down {
            (self.color_picker_selected + 1) % COLOR_PICKER_ROWS
        } else {
            (self.color_picker_selected + COLOR_PICKER_ROWS - 1) % COLOR_PICKER_ROWS
        };
    }

    fn color_picker_accept(&mut self, target: ColorTarget) {
        match PRESET_COLORS.get(self.color_picker_selected) {
            Some((_, color)) => {
                self.format.set_color(target, *color);
                self.close_dialog();
            }
            None => self.open_dialog(DialogKind::CustomColor { target }),
        }
    }

    // ── Font dialog ──────────────────────────────────────────────────────

    fn open_font_dialog(&mut self) {
        let current = self.format.font_style();
        self.font_dialog = FontDialogState {
            selected: FontStyle::ALL.iter().position(|s| *s == current).unwrap_or(0),
            original: current,
        };
        self.open_dialog(DialogKind::Font);
    }

    /// Move the style highlight; the editor previews it live.
    pub fn font_move(&mut self, down: bool) {
        let len = FontStyle::ALL.len();
        let sel = self.font_dialog.selected;
        self.font_dialog.selected = if down {
            (sel + 1) % len
        } else {
            (sel + len - 1) % len
        };
        self.format
            .set_font_style(FontStyle::ALL[self.font_dialog.selected]);
    }

    pub fn font_reset(&mut self) {
        self.font_dialog.selected = 0;
        self.format.set_font_style(FontStyle::Regular);
    }

    pub fn font_accept(&mut self) {
        self.format
            .set_font_style(FontStyle::ALL[self.font_dialog.selected]);
        self.close_dialog();
    }

    pub fn font_cancel(&mut self) {
        self.format.set_font_style(self.font_dialog.original);
        self.close_dialog();
    }

    // ── Find / replace ───────────────────────────────────────────────────

    /// Open the find/replace dialog, prefilling the query from a one-line
    /// selection.
    pub fn open_find_dialog(&mut self, focus: FindFocus) {
        let selected = self.document.selected_text();
        let mut state = FindDialogState {
            focus,
            ..Default::default()
        };
        if !selected.is_empty() && !selected.contains('\n') {
            state.find = TextInput::with_text(&selected);
        }
        self.find = Some(state);
        self.mode = AppMode::Dialog(DialogKind::FindReplace);
        self.refresh_find_matches();
    }

    /// Recompute highlighted matches after the query, options or text changed.
    pub fn refresh_find_matches(&mut self) {
        if let Some(find) = self.find.as_mut() {
            find.sync();
            find.matches = search::find_all(
                &self.document.contents(),
                &find.search.query,
                find.search.options,
            );
        }
    }

    /// Enter inside the dialog: activate the focused control.
    pub fn find_activate(&mut self) {
        let Some(focus) = self.find.as_ref().map(|f| f.focus) else {
            return;
        };
        match focus {
            FindFocus::Find | FindFocus::FindButton => self.find_next(),
            FindFocus::Replace | FindFocus::ReplaceButton => self.replace_next(),
            FindFocus::ReplaceAllButton => self.replace_all(),
            FindFocus::MatchCase | FindFocus::WholeWord => self.find_toggle_focused(),
        }
    }

    /// Space on a checkbox.
    pub fn find_toggle_focused(&mut self) {
        if let Some(find) = self.find.as_mut() {
            match find.focus {
                FindFocus::MatchCase => find.match_case = !find.match_case,
                FindFocus::WholeWord => find.whole_word = !find.whole_word,
                _ => return,
            }
        }
        self.refresh_find_matches();
    }

    pub fn find_next(&mut self) {
        let Some(find) = self.find.as_mut() else {
            return;
        };
        find.sync();
        if find.search.query.is_empty() {
            return;
        }
        if find.search.find_next(&mut self.document).is_none() {
            self.show_message("Find", "Text not found", MessageLevel::Info);
        }
    }

    pub fn replace_next(&mut self) {
        let Some(find) = self.find.as_mut() else {
            return;
        };
        find.sync();
        if find.search.query.is_empty() {
            return;
        }
        let replacement = find.replace.input.clone();
        let outcome = find
            .search
            .replace_current(&mut self.document, &replacement);
        self.refresh_find_matches();
        if outcome.next.is_none() {
            self.show_message("Find", "Text not found", MessageLevel::Info);
        }
    }

    pub fn replace_all(&mut self) {
        let Some(find) = self.find.as_mut() else {
            return;
        };
        find.sync();
        if find.search.query.is_empty() {
            return;
        }
        let query = find.search.query.clone();
        let replacement = find.replace.input.clone();
        let options = find.search.options;
        let count = self
            .document
            .transaction(|doc| search::replace_all(doc, &query, &replacement, options));
        self.refresh_find_matches();
        self.show_message(
            "Replace All",
            format!("Replaced {count} occurrences"),
            MessageLevel::Info,
        );
    }

    // ── Menus ────────────────────────────────────────────────────────────

    pub fn open_menu(&mut self, index: usize) {
        if let Some(menu) = MENUS.get(index) {
            self.mode = AppMode::Menu {
                index,
                selected: menu.first_item(),
            };
        }
    }

    pub fn close_menu(&mut self) {
        if matches!(self.mode, AppMode::Menu { .. }) {
            self.mode = AppMode::Normal;
        }
    }

    /// Left/right between menus, keeping the dropdown open.
    pub fn menu_switch(&mut self, forward: bool) {
        if let AppMode::Menu { index, .. } = self.mode {
            let len = MENUS.len();
            let next = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            self.open_menu(next);
        }
    }

    /// Up/down within the open dropdown.
    pub fn menu_move(&mut self, down: bool) {
        if let AppMode::Menu { index, selected } = self.mode {
            self.mode = AppMode::Menu {
                index,
                selected: MENUS[index].step(selected, down),
            };
        }
    }

    /// Run the highlighted menu item.
    pub fn menu_activate(&mut self) {
        if let AppMode::Menu { index, selected } = self.mode {
            self.mode = AppMode::Normal;
            if let Some(cmd) = MENUS[index].command_at(selected) {
                self.execute(cmd);
            }
        }
    }

    /// Check mark state of a toggle command.
    pub fn is_checked(&self, cmd: Command) -> bool {
        match cmd {
            Command::ToggleWordWrap => self.view.word_wrap,
            Command::ToggleLineNumbers => self.view.line_numbers,
            Command::ToggleStatusBar => self.view.status_bar,
            Command::ToggleDarkMode => self.dark_mode,
            Command::ToggleBold => self.format.bold,
            Command::ToggleItalic => self.format.italic,
            _ => false,
        }
    }

    /// Whether a command would do anything right now (dims menu items).
    pub fn is_enabled(&self, cmd: Command) -> bool {
        match cmd {
            Command::Undo => self.document.can_undo(),
            Command::Redo => self.document.can_redo(),
            Command::Cut | Command::Copy | Command::Delete => self.document.has_selection(),
            Command::Paste => !self.document.clipboard.is_empty(),
            _ => true,
        }
    }

    // ── Command dispatch ─────────────────────────────────────────────────

    /// Execute a menu, toolbar or shortcut command.
    pub fn execute(&mut self, cmd: Command) {
        tracing::debug!(?cmd, "execute");
        match cmd {
            Command::New => {
                if self.guard_discard(PendingAction::New) {
                    self.new_document();
                }
            }
            Command::Open => {
                if self.guard_discard(PendingAction::Open) {
                    self.open_dialog(DialogKind::OpenFile);
                }
            }
            Command::Save => self.save(),
            Command::SaveAs => self.open_dialog(DialogKind::SaveAs),
            Command::Close => {
                if self.guard_discard(PendingAction::Quit) {
                    self.quit();
                }
            }
            Command::Undo => {
                if !self.document.undo() {
                    self.set_status_message("Nothing to undo".to_string());
                }
            }
            Command::Redo => {
                if !self.document.redo() {
                    self.set_status_message("Nothing to redo".to_string());
                }
            }
            Command::Cut => {
                self.document.cut();
            }
            Command::Copy => {
                self.document.copy();
            }
            Command::Paste => {
                self.document.paste();
            }
            Command::Delete => self.document.delete_selection(),
            Command::Find => self.open_find_dialog(FindFocus::Find),
            Command::Replace => self.open_find_dialog(FindFocus::Replace),
            Command::GoToLine => self.open_dialog(DialogKind::GoToLine),
            Command::SelectAll => self.document.select_all(),
            Command::TimeDate => {
                let stamp = chrono::Local::now().format("%-I:%M %p %-m/%-d/%Y").to_string();
                self.document.insert_time_date(&stamp);
            }
            Command::ToggleWordWrap => {
                self.view.word_wrap = !self.view.word_wrap;
                self.document.wrap = self.view.word_wrap;
                self.document.ensure_cursor_visible();
            }
            Command::ToggleLineNumbers => self.view.line_numbers = !self.view.line_numbers,
            Command::ToggleStatusBar => self.view.status_bar = !self.view.status_bar,
            Command::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                self.theme = resolve_palette(&self.theme_config, self.dark_mode);
            }
            Command::Font => self.open_font_dialog(),
            Command::ToggleBold => self.format.bold = !self.format.bold,
            Command::ToggleItalic => self.format.italic = !self.format.italic,
            Command::TextColor => {
                self.color_picker_selected = 0;
                self.open_dialog(DialogKind::ColorPicker {
                    target: ColorTarget::Text,
                });
            }
            Command::BackgroundColor => {
                self.color_picker_selected = 0;
                self.open_dialog(DialogKind::ColorPicker {
                    target: ColorTarget::Background,
                });
            }
            Command::About => self.open_dialog(DialogKind::About),
            Command::Shortcuts => {
                self.help_scroll = 0;
                self.open_dialog(DialogKind::Shortcuts);
            }
        }
    }

    // ── Mouse helpers ────────────────────────────────────────────────────

    /// Document (line, col) under a screen cell inside the editor area.
    pub fn editor_position_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let area = self.layout.editor;
        if area.width == 0 || !rect_contains(area, x, y) {
            return None;
        }
        let dx = (x - area.x) as usize;
        let dy = (y - area.y) as usize;
        let doc = &self.document;
        let last_line = doc.line_count().saturating_sub(1);

        if !doc.wrap {
            let line = (doc.scroll_offset + dy).min(last_line);
            return Some((line, doc.h_scroll + dx));
        }

        let width = area.width as usize;
        let mut row = 0usize;
        for line in doc.scroll_offset..doc.line_count() {
            let rows = doc.visual_rows(line);
            if dy < row + rows {
                return Some((line, (dy - row) * width + dx));
            }
            row += rows;
        }
        Some((last_line, usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::TextBuffer;
    use ratatui::style::Color;

    fn app_with(content: &str) -> App {
        App::new(&AppConfig::default(), Document::new(content, None))
    }

    fn type_into_input(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dialog_input.insert_char(c);
        }
    }

    #[test]
    fn new_applies_config_defaults() {
        let app = app_with("");
        assert!(app.view.word_wrap);
        assert!(app.document.wrap);
        assert!(app.dark_mode);
        assert_eq!(app.tab_width, 4);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn text_input_editing() {
        let mut input = TextInput::default();
        input.insert_char('a');
        input.insert_char('é');
        input.insert_char('c');
        assert_eq!(input.input, "aéc");
        input.move_cursor_left();
        input.move_cursor_left();
        assert_eq!(input.cursor_chars(), 1);
        input.delete_forward();
        assert_eq!(input.input, "ac");
        input.delete_char();
        assert_eq!(input.input, "c");
        input.delete_char();
        assert_eq!(input.input, "c");
        input.cursor_end();
        input.move_cursor_right();
        assert_eq!(input.cursor_position, 1);
        input.insert_str("x\r\ny");
        assert_eq!(input.input, "cxy");
        input.cursor_home();
        assert_eq!(input.cursor_position, 0);
    }

    #[test]
    fn open_dialog_sets_mode_and_close_returns_to_normal() {
        let mut app = app_with("");
        app.open_dialog(DialogKind::OpenFile);
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::OpenFile));
        app.close_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.dialog_input.input.is_empty());
    }

    #[test]
    fn go_to_line_prefills_current_line() {
        let mut app = app_with("a\nb\nc");
        app.document.set_cursor_position(1, 0);
        app.execute(Command::GoToLine);
        assert_eq!(app.dialog_input.input, "2");
    }

    #[test]
    fn go_to_line_valid_moves_cursor() {
        let mut app = app_with("a\nb\nc");
        app.open_dialog(DialogKind::GoToLine);
        app.dialog_input = TextInput::with_text("3");
        app.submit_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.document.cursor_line, 2);
    }

    #[test]
    fn go_to_line_rejects_garbage_and_zero() {
        for bad in ["abc", "0", "-1", ""] {
            let mut app = app_with("a\nb");
            app.open_dialog(DialogKind::GoToLine);
            app.dialog_input = TextInput::with_text(bad);
            app.submit_dialog();
            let msg = app.message.as_ref().expect("warning shown");
            assert_eq!(msg.level, MessageLevel::Warning);
            assert_eq!(app.mode, AppMode::Dialog(DialogKind::GoToLine));
            assert_eq!(app.document.cursor_line, 0);
        }
    }

    #[test]
    fn new_on_unmodified_document_skips_confirmation() {
        let mut app = app_with("text");
        app.execute(Command::New);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.document.contents(), "");
    }

    #[test]
    fn new_on_modified_document_asks_first() {
        let mut app = app_with("");
        app.document.insert_char('x');
        app.execute(Command::New);
        assert_eq!(
            app.mode,
            AppMode::Dialog(DialogKind::ConfirmDiscard {
                pending: PendingAction::New
            })
        );
        assert_eq!(app.document.contents(), "x");
        app.confirm_discard_accept();
        assert_eq!(app.document.contents(), "");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn close_modified_then_accept_quits() {
        let mut app = app_with("");
        app.document.insert_char('x');
        app.execute(Command::Close);
        assert!(!app.should_quit);
        app.submit_dialog();
        assert!(app.should_quit);
    }

    #[test]
    fn confirm_discard_disabled_by_config() {
        let mut app = app_with("");
        app.confirm_discard = false;
        app.document.insert_char('x');
        app.execute(Command::Close);
        assert!(app.should_quit);
    }

    #[test]
    fn open_modified_then_accept_shows_open_dialog() {
        let mut app = app_with("");
        app.document.insert_char('x');
        app.execute(Command::Open);
        app.confirm_discard_accept();
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::OpenFile));
    }

    #[test]
    fn open_file_loads_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello\nworld").expect("write");

        let mut app = app_with("");
        app.document.clipboard = "kept".into();
        app.execute(Command::Open);
        type_into_input(&mut app, &path.to_string_lossy());
        app.submit_dialog();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.document.lines, vec!["hello", "world"]);
        assert_eq!(app.document.clipboard, "kept");
        assert!(app.document.wrap);
        let (msg, _) = app.status_message.as_ref().expect("status");
        assert_eq!(msg, "Opened notes.txt");
    }

    #[test]
    fn open_missing_file_shows_error() {
        let mut app = app_with("");
        app.execute(Command::Open);
        type_into_input(&mut app, "/definitely/not/here.txt");
        app.submit_dialog();
        let msg = app.message.as_ref().expect("error shown");
        assert_eq!(msg.level, MessageLevel::Error);
        assert!(msg.body.contains("/definitely/not/here.txt"));
    }

    #[test]
    fn save_without_path_opens_save_as() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        let mut app = app_with("");
        app.document.insert_str("data");
        app.execute(Command::Save);
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::SaveAs));
        type_into_input(&mut app, &path.to_string_lossy());
        app.submit_dialog();
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "data");
        assert!(!app.document.modified);
        assert_eq!(app.document.title(), "out.txt");
    }

    #[test]
    fn save_as_prefills_current_path() {
        let mut app = App::new(
            &AppConfig::default(),
            Document::new("", Some(PathBuf::from("/tmp/a.txt"))),
        );
        app.execute(Command::SaveAs);
        assert_eq!(app.dialog_input.input, "/tmp/a.txt");
    }

    #[test]
    fn load_document_missing_path_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fresh.txt");
        let doc = App::load_document(&path).expect("load");
        assert_eq!(doc.lines, vec![""]);
        assert_eq!(doc.file_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn find_dialog_prefills_single_line_selection() {
        let mut app = app_with("alpha beta\ngamma");
        app.document.set_selection(6, 10);
        app.execute(Command::Find);
        let find = app.find.as_ref().expect("find open");
        assert_eq!(find.find.input, "beta");
        assert_eq!(find.matches, vec![6..10]);

        app.close_dialog();
        assert!(app.find.is_none());

        app.document.set_selection(6, 13);
        app.execute(Command::Replace);
        let find = app.find.as_ref().expect("find open");
        assert!(find.find.input.is_empty());
        assert_eq!(find.focus, FindFocus::Replace);
    }

    #[test]
    fn find_next_walks_matches_then_reports_not_found() {
        let mut app = app_with("the cat sat on the mat");
        app.execute(Command::Find);
        app.find.as_mut().expect("find").find = TextInput::with_text("at");
        app.refresh_find_matches();
        assert_eq!(app.find.as_ref().expect("find").matches.len(), 3);

        app.find_next();
        assert_eq!(app.document.selection_offsets(), Some(5..7));
        app.find_next();
        assert_eq!(app.document.selection_offsets(), Some(9..11));

        app.find.as_mut().expect("find").find = TextInput::with_text("dog");
        app.find_next();
        let msg = app.message.as_ref().expect("message");
        assert_eq!(msg.body, "Text not found");
        assert_eq!(msg.level, MessageLevel::Info);
    }

    #[test]
    fn changing_query_restarts_from_top() {
        let mut app = app_with("ab ab ac");
        app.execute(Command::Find);
        app.find.as_mut().expect("find").find = TextInput::with_text("ab");
        app.find_next();
        app.find_next();
        assert_eq!(app.document.selection_offsets(), Some(3..5));

        app.find.as_mut().expect("find").find = TextInput::with_text("a");
        app.find_next();
        assert_eq!(app.document.selection_offsets(), Some(0..1));
    }

    #[test]
    fn find_with_empty_query_is_silent() {
        let mut app = app_with("abc");
        app.execute(Command::Find);
        app.find_next();
        app.replace_all();
        assert!(app.message.is_none());
    }

    #[test]
    fn replace_all_reports_count_and_is_one_undo_step() {
        let mut app = app_with("aaa");
        app.execute(Command::Replace);
        {
            let find = app.find.as_mut().expect("find");
            find.find = TextInput::with_text("a");
            find.replace = TextInput::with_text("bb");
            find.match_case = true;
        }
        app.replace_all();
        assert_eq!(app.document.contents(), "bbbbbb");
        assert_eq!(
            app.message.as_ref().map(|m| m.body.as_str()),
            Some("Replaced 3 occurrences")
        );
        assert!(app.find.as_ref().expect("find").matches.is_empty());
        app.document.undo();
        assert_eq!(app.document.contents(), "aaa");
    }

    #[test]
    fn replace_next_replaces_selected_match() {
        let mut app = app_with("Foo foo");
        app.execute(Command::Replace);
        {
            let find = app.find.as_mut().expect("find");
            find.find = TextInput::with_text("foo");
            find.replace = TextInput::with_text("bar");
        }
        app.find_next();
        app.replace_next();
        assert_eq!(app.document.contents(), "bar foo");
        assert_eq!(app.document.selection_offsets(), Some(4..7));
    }

    #[test]
    fn toggling_checkbox_refreshes_matches() {
        let mut app = app_with("Cat cat");
        app.execute(Command::Find);
        app.find.as_mut().expect("find").find = TextInput::with_text("cat");
        app.refresh_find_matches();
        assert_eq!(app.find.as_ref().expect("find").matches.len(), 2);
        app.find.as_mut().expect("find").focus = FindFocus::MatchCase;
        app.find_activate();
        assert_eq!(app.find.as_ref().expect("find").matches, vec![4..7]);
    }

    #[test]
    fn find_focus_cycles() {
        assert_eq!(FindFocus::Find.next(), FindFocus::Replace);
        assert_eq!(FindFocus::ReplaceAllButton.next(), FindFocus::Find);
        assert_eq!(FindFocus::Find.prev(), FindFocus::ReplaceAllButton);
    }

    #[test]
    fn view_toggles() {
        let mut app = app_with("");
        app.execute(Command::ToggleWordWrap);
        assert!(!app.view.word_wrap);
        assert!(!app.document.wrap);
        app.execute(Command::ToggleLineNumbers);
        assert!(app.is_checked(Command::ToggleLineNumbers));
        app.execute(Command::ToggleStatusBar);
        assert!(!app.view.status_bar);
    }

    #[test]
    fn dark_mode_switches_palette() {
        let mut app = app_with("");
        let dark_fg = app.theme.editor_fg;
        app.execute(Command::ToggleDarkMode);
        assert!(!app.dark_mode);
        assert_ne!(app.theme.editor_fg, dark_fg);
        assert_eq!(app.theme, crate::theme::light_theme());
    }

    #[test]
    fn bold_italic_toggles() {
        let mut app = app_with("");
        app.execute(Command::ToggleBold);
        app.execute(Command::ToggleItalic);
        assert_eq!(app.format.font_style(), FontStyle::BoldItalic);
    }

    #[test]
    fn font_dialog_previews_and_cancel_restores() {
        let mut app = app_with("");
        app.execute(Command::Font);
        app.font_move(true);
        assert_eq!(app.format.font_style(), FontStyle::Bold);
        app.font_cancel();
        assert_eq!(app.format.font_style(), FontStyle::Regular);
        assert_eq!(app.mode, AppMode::Normal);

        app.execute(Command::Font);
        app.font_move(false);
        app.submit_dialog();
        assert_eq!(app.format.font_style(), FontStyle::BoldItalic);
    }

    #[test]
    fn font_reset_goes_back_to_regular() {
        let mut app = app_with("");
        app.execute(Command::ToggleBold);
        app.execute(Command::Font);
        assert_eq!(app.font_dialog.selected, 1);
        app.font_reset();
        app.font_accept();
        assert_eq!(app.format.font_style(), FontStyle::Regular);
    }

    #[test]
    fn color_picker_presets_and_default() {
        let mut app = app_with("");
        app.execute(Command::TextColor);
        app.color_picker_move(true);
        app.color_picker_move(true);
        app.submit_dialog();
        assert_eq!(app.format.fg, Some(Color::Red));

        app.execute(Command::TextColor);
        app.color_picker_selected = 5;
        app.submit_dialog();
        assert_eq!(app.format.fg, None);
    }

    #[test]
    fn color_picker_custom_validates_input() {
        let mut app = app_with("");
        app.execute(Command::BackgroundColor);
        app.color_picker_move(false); // wraps to Custom...
        app.submit_dialog();
        let target = ColorTarget::Background;
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::CustomColor { target }));

        type_into_input(&mut app, "nope");
        app.submit_dialog();
        assert_eq!(
            app.message.as_ref().map(|m| m.level),
            Some(MessageLevel::Warning)
        );
        assert_eq!(app.format.bg, None);

        app.dismiss_message();
        app.dialog_input = TextInput::with_text("#102030");
        app.submit_dialog();
        assert_eq!(app.format.bg, Some(Color::Rgb(16, 32, 48)));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn menu_navigation_and_activation() {
        let mut app = app_with("");
        app.open_menu(2); // View
        app.menu_move(true);
        assert_eq!(app.mode, AppMode::Menu { index: 2, selected: 1 });
        app.menu_activate();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.view.line_numbers);

        app.open_menu(0);
        app.menu_switch(false);
        assert_eq!(app.mode, AppMode::Menu { index: 4, selected: 0 });
        app.close_menu();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn enabled_state_tracks_document() {
        let mut app = app_with("abc");
        assert!(!app.is_enabled(Command::Undo));
        assert!(!app.is_enabled(Command::Copy));
        assert!(!app.is_enabled(Command::Paste));
        app.document.select_all();
        app.execute(Command::Copy);
        assert!(app.is_enabled(Command::Paste));
        app.execute(Command::Delete);
        assert!(app.is_enabled(Command::Undo));
        assert_eq!(app.document.contents(), "");
    }

    #[test]
    fn undo_with_empty_history_sets_status() {
        let mut app = app_with("");
        app.execute(Command::Undo);
        let (msg, _) = app.status_message.as_ref().expect("status");
        assert_eq!(msg, "Nothing to undo");
    }

    #[test]
    fn time_date_inserts_text() {
        let mut app = app_with("");
        app.execute(Command::TimeDate);
        let text = app.document.contents();
        assert!(text.contains('/'));
        assert!(text.contains(':'));
        assert!(app.document.modified);
    }

    #[test]
    fn status_bar_strings() {
        let mut app = app_with("hello world\nfoo");
        app.document.set_cursor_position(1, 2);
        assert_eq!(app.status_counts(), "Characters: 15 | Words: 3");
        assert_eq!(app.status_position(), "Line: 2, Column: 3");
    }

    #[test]
    fn set_status_message_and_expiry() {
        let mut app = app_with("");
        app.set_status_message("fresh".to_string());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".to_string(),
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn editor_position_without_wrap() {
        let mut app = app_with("abc\ndefgh\nij");
        app.execute(Command::ToggleWordWrap);
        app.layout.editor = Rect::new(4, 2, 20, 10);
        assert_eq!(app.editor_position_at(5, 3), Some((1, 1)));
        assert_eq!(app.editor_position_at(4, 11), Some((2, 0)));
        assert_eq!(app.editor_position_at(0, 0), None);
    }

    #[test]
    fn editor_position_with_wrap() {
        let mut app = app_with("abcdefghij\nxy");
        app.layout.editor = Rect::new(0, 0, 4, 10);
        app.document.visible_width = 4;
        // "abcdefghij" occupies rows 0..3 at width 4
        assert_eq!(app.editor_position_at(1, 2), Some((0, 9)));
        assert_eq!(app.editor_position_at(0, 3), Some((1, 0)));
        assert_eq!(app.editor_position_at(0, 9).map(|p| p.0), Some(1));
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(2, 2, 3, 1);
        assert!(rect_contains(r, 2, 2));
        assert!(rect_contains(r, 4, 2));
        assert!(!rect_contains(r, 5, 2));
        assert!(!rect_contains(r, 2, 3));
    }
}
