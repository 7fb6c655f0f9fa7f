use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::search::TextBuffer;

/// A single reversible change: `removed` was replaced by `inserted` at
/// character offset `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub removed: String,
    pub inserted: String,
    /// Cursor offset before the edit was applied (restored on undo).
    pub cursor_before: usize,
}

/// A group of edits undone and redone together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoStep {
    pub edits: Vec<Edit>,
}

/// How an edit was produced, for merging consecutive keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Typing,
    Erasing,
    Other,
}

/// Line terminator detected when a file was loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
        }
    }
}

/// Represents a text selection range in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Anchor position (where selection started): (line, col).
    pub anchor_line: usize,
    pub anchor_col: usize,
    // The active end is the document cursor.
}

impl Selection {
    pub fn new(line: usize, col: usize) -> Self {
        Self {
            anchor_line: line,
            anchor_col: col,
        }
    }
}

/// Maximum entries in the undo stack.
const MAX_UNDO_ENTRIES: usize = 1000;

/// Grouping timeout: consecutive keystrokes within this duration are merged.
const GROUPING_TIMEOUT_MS: u128 = 500;

/// Full state for the text being edited.
#[derive(Debug)]
pub struct Document {
    /// Lines of text, without terminators.
    pub lines: Vec<String>,
    /// Current cursor line (0-indexed).
    pub cursor_line: usize,
    /// Current cursor column in characters (0-indexed).
    pub cursor_col: usize,
    /// Active text selection (None if no selection).
    pub selection: Option<Selection>,
    /// Whether the buffer has been modified since the last save.
    pub modified: bool,
    /// File backing this document, `None` until first saved.
    pub file_path: Option<PathBuf>,
    pub line_ending: LineEnding,
    /// Line index of the topmost visible line.
    pub scroll_offset: usize,
    /// Column of the leftmost visible character (word wrap off).
    pub h_scroll: usize,
    /// Visible height of the text area (set during render).
    pub visible_height: usize,
    /// Visible width of the text area (set during render).
    pub visible_width: usize,
    /// Whether the renderer soft-wraps long lines.
    pub wrap: bool,
    /// Document-local clipboard.
    pub clipboard: String,
    undo_stack: Vec<UndoStep>,
    undo_index: usize,
    open_group: Option<UndoStep>,
    last_edit: Option<(EditKind, Instant)>,
}

impl Document {
    /// Create a document from raw text.
    pub fn new(content: &str, file_path: Option<PathBuf>) -> Self {
        let (normalized, line_ending) = normalize_line_endings(content);
        // split keeps a trailing empty line when content ends with '\n'.
        let lines: Vec<String> = normalized.split('\n').map(String::from).collect();

        Self {
            lines,
            cursor_line: 0,
            cursor_col: 0,
            selection: None,
            modified: false,
            file_path,
            line_ending,
            scroll_offset: 0,
            h_scroll: 0,
            visible_height: 24,
            visible_width: 80,
            wrap: false,
            clipboard: String::new(),
            undo_stack: Vec::new(),
            undo_index: 0,
            open_group: None,
            last_edit: None,
        }
    }

    /// An empty, untitled document.
    pub fn untitled() -> Self {
        Self::new("", None)
    }

    /// Load a document from a file path.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc = Self::new(&content, Some(path.to_path_buf()));
        tracing::info!(
            file = %path.display(),
            lines = doc.line_count(),
            line_ending = doc.line_ending.label(),
            "file_read_ok"
        );
        Ok(doc)
    }

    /// Write the document to its current path.
    pub fn save(&mut self) -> std::io::Result<()> {
        let path = self.file_path.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "document has no file path")
        })?;
        self.write_to(&path)
    }

    /// Write the document to `path` and make it the current path.
    pub fn save_as(&mut self, path: &Path) -> std::io::Result<()> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> std::io::Result<()> {
        let content = self.lines.join(self.line_ending.as_str());
        std::fs::write(path, content)?;
        self.modified = false;
        tracing::info!(file = %path.display(), lines = self.line_count(), "file_write_ok");
        Ok(())
    }

    /// File name for window titles, `Untitled` when unsaved.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Title with a `*` marker when there are unsaved changes.
    pub fn title(&self) -> String {
        if self.modified {
            format!("*{}", self.display_name())
        } else {
            self.display_name()
        }
    }

    // ── Metrics ───────────────────────────────────────────────────────

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get the length of the current line in characters.
    pub fn current_line_len(&self) -> usize {
        self.line_len(self.cursor_line)
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Number of characters, counting each line break as one.
    pub fn char_count(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len().saturating_sub(1)
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.split_whitespace().count())
            .sum()
    }

    /// Width of the line number gutter (digits + space + separator).
    pub fn gutter_width(&self) -> u16 {
        let max_line = self.line_count();
        let digits = if max_line == 0 {
            1
        } else {
            (max_line as f64).log10().floor() as u16 + 1
        };
        digits + 2
    }

    // ── Offsets ───────────────────────────────────────────────────────

    /// Convert a (line, col) position to a character offset.
    pub fn position_to_offset(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.lines.len().saturating_sub(1));
        let before: usize = self.lines[..line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum();
        before + col.min(self.line_len(line))
    }

    /// Convert a character offset to a (line, col) position, clamping to
    /// the end of the document.
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return (idx, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.lines.len().saturating_sub(1);
        (last, self.line_len(last))
    }

    /// Cursor position as a character offset.
    pub fn cursor_offset(&self) -> usize {
        self.position_to_offset(self.cursor_line, self.cursor_col)
    }

    fn set_cursor_offset(&mut self, offset: usize) {
        let (line, col) = self.offset_to_position(offset);
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Full text with `\n` line breaks.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    fn text_between(&self, start: (usize, usize), end: (usize, usize)) -> String {
        let ((sl, sc), (el, ec)) = (start, end);
        if sl == el {
            let line = &self.lines[sl];
            let s = char_to_byte_index(line, sc);
            let e = char_to_byte_index(line, ec);
            return line[s..e].to_string();
        }
        let mut result = String::new();
        for idx in sl..=el {
            let line = &self.lines[idx];
            if idx == sl {
                result.push_str(&line[char_to_byte_index(line, sc)..]);
                result.push('\n');
            } else if idx == el {
                result.push_str(&line[..char_to_byte_index(line, ec)]);
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }
        result
    }

    // ── Cursor & viewport ─────────────────────────────────────────────

    /// Set the cursor to a specific line and column, clamping to valid bounds.
    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        self.cursor_line = line.min(self.lines.len().saturating_sub(1));
        self.cursor_col = col.min(self.current_line_len());
        self.selection = None;
        self.ensure_cursor_visible();
    }

    /// Clamp cursor position to valid bounds.
    pub fn clamp_cursor(&mut self) {
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len().saturating_sub(1);
        }
        let line_len = self.current_line_len();
        if self.cursor_col > line_len {
            self.cursor_col = line_len;
        }
    }

    /// Number of screen rows a line occupies at the current wrap width.
    pub fn visual_rows(&self, line: usize) -> usize {
        if !self.wrap || self.visible_width == 0 {
            return 1;
        }
        let len = self.line_len(line);
        (len / self.visible_width) + 1
    }

    /// Ensure the viewport scrolls to keep the cursor visible.
    pub fn ensure_cursor_visible(&mut self) {
        let margin = 2usize;
        if self.visible_height == 0 {
            return;
        }
        // Scroll up if cursor is above the viewport
        if self.cursor_line < self.scroll_offset + margin {
            self.scroll_offset = self.cursor_line.saturating_sub(margin);
        }
        if self.wrap {
            // Scroll down one logical line at a time until the cursor row fits.
            loop {
                let rows: usize = (self.scroll_offset..self.cursor_line)
                    .map(|l| self.visual_rows(l))
                    .sum::<usize>()
                    + self.cursor_col / self.visible_width.max(1)
                    + 1;
                if rows <= self.visible_height || self.scroll_offset >= self.cursor_line {
                    break;
                }
                self.scroll_offset += 1;
            }
            self.h_scroll = 0;
            return;
        }
        let bottom = self.scroll_offset + self.visible_height;
        if self.cursor_line >= bottom.saturating_sub(margin) {
            self.scroll_offset = self
                .cursor_line
                .saturating_sub(self.visible_height.saturating_sub(margin + 1));
        }
        if self.visible_width > 0 {
            if self.cursor_col < self.h_scroll {
                self.h_scroll = self.cursor_col;
            } else if self.cursor_col >= self.h_scroll + self.visible_width {
                self.h_scroll = self.cursor_col + 1 - self.visible_width;
            }
        }
    }

    /// Scroll the viewport without moving the cursor (mouse wheel).
    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max);
    }

    // ── Undo/Redo infrastructure ──────────────────────────────────────

    /// Apply an edit, recording it for undo.
    fn apply(&mut self, start: usize, end: usize, text: &str, kind: EditKind) {
        let cursor_before = self.cursor_offset();
        let removed = self.splice(start, end, text);
        if removed.is_empty() && text.is_empty() {
            return;
        }
        self.set_cursor_offset(start + text.chars().count());
        self.selection = None;
        self.modified = true;
        self.record(
            Edit {
                offset: start,
                removed,
                inserted: text.to_string(),
                cursor_before,
            },
            kind,
        );
        self.ensure_cursor_visible();
    }

    /// Raw replacement of `start..end` with `text`. Returns the removed text.
    fn splice(&mut self, start: usize, end: usize, text: &str) -> String {
        let start_pos = self.offset_to_position(start);
        let end_pos = self.offset_to_position(end.max(start));
        let removed = self.text_between(start_pos, end_pos);

        let (sl, sc) = start_pos;
        let (el, ec) = end_pos;
        let prefix = {
            let line = &self.lines[sl];
            &line[..char_to_byte_index(line, sc)]
        };
        let suffix = {
            let line = &self.lines[el];
            &line[char_to_byte_index(line, ec)..]
        };
        let joined = format!("{prefix}{text}{suffix}");
        let replacement: Vec<String> = joined.split('\n').map(String::from).collect();
        self.lines.splice(sl..=el, replacement);
        removed
    }

    fn record(&mut self, edit: Edit, kind: EditKind) {
        if let Some(group) = self.open_group.as_mut() {
            group.edits.push(edit);
            return;
        }

        let now = Instant::now();
        let recent = self
            .last_edit
            .map(|(k, t)| k == kind && now.duration_since(t).as_millis() < GROUPING_TIMEOUT_MS)
            .unwrap_or(false);
        self.last_edit = Some((kind, now));

        // Only the newest step can absorb a keystroke, and only if no
        // undo has happened since it was recorded.
        if recent && self.undo_index == self.undo_stack.len() {
            if let Some(last) = self
                .undo_stack
                .last_mut()
                .and_then(|step| step.edits.last_mut())
            {
                match kind {
                    EditKind::Typing
                        if last.removed.is_empty()
                            && edit.removed.is_empty()
                            && edit.offset == last.offset + last.inserted.chars().count() =>
                    {
                        last.inserted.push_str(&edit.inserted);
                        return;
                    }
                    EditKind::Erasing
                        if last.inserted.is_empty()
                            && edit.inserted.is_empty()
                            && edit.offset + edit.removed.chars().count() == last.offset =>
                    {
                        last.removed.insert_str(0, &edit.removed);
                        last.offset = edit.offset;
                        return;
                    }
                    EditKind::Erasing
                        if last.inserted.is_empty()
                            && edit.inserted.is_empty()
                            && edit.offset == last.offset =>
                    {
                        // Forward delete keeps the offset and grows to the right.
                        last.removed.push_str(&edit.removed);
                        return;
                    }
                    _ => {}
                }
            }
        }

        self.push_step(UndoStep { edits: vec![edit] });
    }

    /// Push a step onto the undo stack, truncating any redo history.
    fn push_step(&mut self, step: UndoStep) {
        self.undo_stack.truncate(self.undo_index);
        self.undo_stack.push(step);
        if self.undo_stack.len() > MAX_UNDO_ENTRIES {
            let excess = self.undo_stack.len() - MAX_UNDO_ENTRIES;
            self.undo_stack.drain(..excess);
        }
        self.undo_index = self.undo_stack.len();
    }

    /// Run `f`, collecting every edit it makes into a single undo step.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let outer = self.open_group.is_some();
        if !outer {
            self.open_group = Some(UndoStep::default());
        }
        let result = f(self);
        if !outer {
            if let Some(step) = self.open_group.take() {
                if !step.edits.is_empty() {
                    self.push_step(step);
                }
            }
            self.last_edit = None;
        }
        result
    }

    pub fn can_undo(&self) -> bool {
        self.undo_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.undo_index < self.undo_stack.len()
    }

    /// Undo the most recent step. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.undo_index -= 1;
        let step = self.undo_stack[self.undo_index].clone();
        for edit in step.edits.iter().rev() {
            let end = edit.offset + edit.inserted.chars().count();
            self.splice(edit.offset, end, &edit.removed);
        }
        if let Some(first) = step.edits.first() {
            self.set_cursor_offset(first.cursor_before);
        }
        self.after_history_move();
        true
    }

    /// Redo the most recently undone step.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        let step = self.undo_stack[self.undo_index].clone();
        self.undo_index += 1;
        for edit in &step.edits {
            let end = edit.offset + edit.removed.chars().count();
            self.splice(edit.offset, end, &edit.inserted);
        }
        if let Some(last) = step.edits.last() {
            self.set_cursor_offset(last.offset + last.inserted.chars().count());
        }
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        self.selection = None;
        self.last_edit = None;
        self.modified = true;
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    // ── Buffer mutation methods ───────────────────────────────────────

    /// Insert a character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let (start, end) = self.edit_span();
        let mut buf = [0u8; 4];
        self.apply(start, end, ch.encode_utf8(&mut buf), EditKind::Typing);
    }

    /// Insert a string at the cursor, replacing any selection.
    pub fn insert_str(&mut self, text: &str) {
        let (start, end) = self.edit_span();
        self.apply(start, end, text, EditKind::Other);
    }

    /// Split the current line at the cursor (Enter).
    pub fn insert_newline(&mut self) {
        let (start, end) = self.edit_span();
        self.apply(start, end, "\n", EditKind::Other);
    }

    /// Insert spaces up to the next tab stop.
    pub fn insert_tab(&mut self, tab_width: usize) {
        let width = tab_width.max(1);
        let pad = width - (self.cursor_col % width);
        self.insert_str(&" ".repeat(pad));
    }

    /// Delete the character before the cursor (Backspace).
    /// If there is a selection, delete it instead.
    pub fn delete_char_before(&mut self) {
        if self.has_selection() {
            self.delete_selection();
            return;
        }
        let offset = self.cursor_offset();
        if offset > 0 {
            self.apply(offset - 1, offset, "", EditKind::Erasing);
        }
    }

    /// Delete the character at the cursor (Delete key).
    /// If there is a selection, delete it instead.
    pub fn delete_char_at(&mut self) {
        if self.has_selection() {
            self.delete_selection();
            return;
        }
        let offset = self.cursor_offset();
        if offset < self.char_count() {
            self.apply(offset, offset + 1, "", EditKind::Erasing);
        }
    }

    /// Delete the currently selected text, leaving the cursor at its start.
    pub fn delete_selection(&mut self) {
        if let Some(range) = self.selection_offsets() {
            self.apply(range.start, range.end, "", EditKind::Other);
        }
        self.selection = None;
    }

    /// Insert a time/date stamp at the cursor.
    pub fn insert_time_date(&mut self, stamp: &str) {
        self.insert_str(stamp);
    }

    /// Range the next insertion replaces: the selection, or the cursor.
    fn edit_span(&self) -> (usize, usize) {
        match self.selection_offsets() {
            Some(r) => (r.start, r.end),
            None => {
                let offset = self.cursor_offset();
                (offset, offset)
            }
        }
    }

    // ── Clipboard ─────────────────────────────────────────────────────

    /// Copy the selection. Returns false when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let text = self.selected_text();
        if text.is_empty() {
            return false;
        }
        self.clipboard = text;
        true
    }

    /// Cut the selection. Returns false when nothing is selected.
    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        self.delete_selection();
        true
    }

    /// Paste the clipboard at the cursor, replacing any selection.
    pub fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let text = self.clipboard.clone();
        self.insert_str(&text);
        true
    }

    // ── Navigation ────────────────────────────────────────────────────

    /// Move cursor up one line (clears selection).
    pub fn move_up(&mut self) {
        self.selection = None;
        self.step_up();
    }

    /// Move cursor down one line (clears selection).
    pub fn move_down(&mut self) {
        self.selection = None;
        self.step_down();
    }

    /// Move cursor left one character (clears selection).
    pub fn move_left(&mut self) {
        self.selection = None;
        self.step_left();
    }

    /// Move cursor right one character (clears selection).
    pub fn move_right(&mut self) {
        self.selection = None;
        self.step_right();
    }

    /// Move cursor to the start of the current line (clears selection).
    pub fn move_home(&mut self) {
        self.selection = None;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    /// Move cursor to the end of the current line (clears selection).
    pub fn move_end(&mut self) {
        self.selection = None;
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    /// Move cursor to the start of the document (clears selection).
    pub fn move_to_top(&mut self) {
        self.selection = None;
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    /// Move cursor to the end of the document (clears selection).
    pub fn move_to_bottom(&mut self) {
        self.selection = None;
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    /// Move cursor up by one page (clears selection).
    pub fn page_up(&mut self) {
        self.selection = None;
        self.step_page(false);
    }

    /// Move cursor down by one page (clears selection).
    pub fn page_down(&mut self) {
        self.selection = None;
        self.step_page(true);
    }

    /// Jump to a 1-based line number, clamped to the document.
    pub fn go_to_line(&mut self, line_number: usize) {
        self.set_cursor_position(line_number.saturating_sub(1), 0);
    }

    fn step_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    fn step_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    fn step_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
        self.ensure_cursor_visible();
    }

    fn step_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
        self.ensure_cursor_visible();
    }

    fn step_page(&mut self, down: bool) {
        let jump = self.visible_height.max(1);
        self.cursor_line = if down {
            (self.cursor_line + jump).min(self.lines.len().saturating_sub(1))
        } else {
            self.cursor_line.saturating_sub(jump)
        };
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    // ── Selection-aware navigation (Shift+Arrow) ─────────────────────

    /// Ensure a selection anchor exists; if not, set it at the current cursor pos.
    fn ensure_selection_anchor(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::new(self.cursor_line, self.cursor_col));
        }
    }

    /// Extend selection upward one line.
    pub fn select_up(&mut self) {
        self.ensure_selection_anchor();
        self.step_up();
    }

    /// Extend selection downward one line.
    pub fn select_down(&mut self) {
        self.ensure_selection_anchor();
        self.step_down();
    }

    /// Extend selection left one character.
    pub fn select_left(&mut self) {
        self.ensure_selection_anchor();
        self.step_left();
    }

    /// Extend selection right one character.
    pub fn select_right(&mut self) {
        self.ensure_selection_anchor();
        self.step_right();
    }

    /// Extend selection to start of current line.
    pub fn select_home(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    /// Extend selection to end of current line.
    pub fn select_end(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    /// Extend selection to beginning of document.
    pub fn select_to_top(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    /// Extend selection to end of document.
    pub fn select_to_bottom(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    /// Extend selection up by one page.
    pub fn select_page_up(&mut self) {
        self.ensure_selection_anchor();
        self.step_page(false);
    }

    /// Extend selection down by one page.
    pub fn select_page_down(&mut self) {
        self.ensure_selection_anchor();
        self.step_page(true);
    }

    /// Extend the selection to (line, col), anchoring at the cursor if needed.
    pub fn select_to(&mut self, line: usize, col: usize) {
        self.ensure_selection_anchor();
        self.cursor_line = line.min(self.lines.len().saturating_sub(1));
        self.cursor_col = col.min(self.current_line_len());
        self.ensure_cursor_visible();
    }

    /// Select all text in the buffer (Ctrl+A).
    pub fn select_all(&mut self) {
        self.selection = Some(Selection::new(0, 0));
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    // ── Selection helpers ─────────────────────────────────────────────

    /// Whether a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        self.selection_range().map(|(a, b)| a != b).unwrap_or(false)
    }

    /// Get the ordered (start, end) of the current selection as ((line, col), (line, col)).
    pub fn selection_range(&self) -> Option<((usize, usize), (usize, usize))> {
        let sel = self.selection.as_ref()?;
        let a = (sel.anchor_line, sel.anchor_col);
        let b = (self.cursor_line, self.cursor_col);
        if a <= b {
            Some((a, b))
        } else {
            Some((b, a))
        }
    }

    /// The selection as a character offset range, `None` when empty.
    pub fn selection_offsets(&self) -> Option<Range<usize>> {
        let ((sl, sc), (el, ec)) = self.selection_range()?;
        let start = self.position_to_offset(sl, sc);
        let end = self.position_to_offset(el, ec);
        (start < end).then_some(start..end)
    }

    /// Check if a character position (line, col) is within the current selection.
    pub fn is_selected(&self, line: usize, col: usize) -> bool {
        if let Some(((sl, sc), (el, ec))) = self.selection_range() {
            if line < sl || line > el {
                return false;
            }
            if line == sl && line == el {
                return col >= sc && col < ec;
            }
            if line == sl {
                return col >= sc;
            }
            if line == el {
                return col < ec;
            }
            true // line is strictly between start and end
        } else {
            false
        }
    }

    /// Get the selected text as a String. Returns empty string if no selection.
    pub fn selected_text(&self) -> String {
        match self.selection_range() {
            Some((start, end)) => self.text_between(start, end),
            None => String::new(),
        }
    }
}

impl TextBuffer for Document {
    fn text(&self) -> String {
        self.contents()
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let (sl, sc) = self.offset_to_position(start);
        self.selection = Some(Selection::new(sl, sc));
        self.set_cursor_offset(end);
        self.ensure_cursor_visible();
    }

    fn selected_text(&self) -> String {
        Document::selected_text(self)
    }

    fn selection(&self) -> Option<Range<usize>> {
        self.selection_offsets()
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        self.apply(start, end, text, EditKind::Other);
    }
}

/// Strip `\r\n` down to `\n`, reporting which terminator the text used.
fn normalize_line_endings(content: &str) -> (String, LineEnding) {
    if content.contains("\r\n") {
        (content.replace("\r\n", "\n"), LineEnding::CrLf)
    } else {
        (content.to_string(), LineEnding::Lf)
    }
}

/// Utility: Convert a char-based column index to a byte index in a string.
pub fn char_to_byte_index(s: &str, char_col: usize) -> usize {
    s.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
