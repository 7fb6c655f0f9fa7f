use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{rect_contains, App, AppMode, DialogKind, FindFocus, TextInput};
use crate::command::{command_for_key, menu_for_mnemonic, MENUS};
use crate::components::help;

/// Lines scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Terminals with keyboard enhancement also report releases and repeats.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // A message box swallows input until dismissed.
    if app.message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_message();
        }
        return;
    }

    match app.mode.clone() {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Menu { .. } => handle_menu_mode(app, key),
        AppMode::Dialog(kind) => handle_dialog_mode(app, key, kind),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if key.code == KeyCode::F(10) {
        app.open_menu(0);
        return;
    }
    if let KeyCode::Char(c) = key.code {
        if alt && !ctrl {
            if let Some(index) = menu_for_mnemonic(c) {
                app.open_menu(index);
            }
            return;
        }
    }
    if let Some(cmd) = command_for_key(&key) {
        app.execute(cmd);
        return;
    }

    let doc = &mut app.document;
    match key.code {
        KeyCode::Esc => doc.selection = None,

        KeyCode::Home if ctrl && shift => doc.select_to_top(),
        KeyCode::End if ctrl && shift => doc.select_to_bottom(),
        KeyCode::Home if ctrl => doc.move_to_top(),
        KeyCode::End if ctrl => doc.move_to_bottom(),
        KeyCode::Up if ctrl => doc.scroll_by(-1),
        KeyCode::Down if ctrl => doc.scroll_by(1),

        KeyCode::Up if shift => doc.select_up(),
        KeyCode::Down if shift => doc.select_down(),
        KeyCode::Left if shift => doc.select_left(),
        KeyCode::Right if shift => doc.select_right(),
        KeyCode::Home if shift => doc.select_home(),
        KeyCode::End if shift => doc.select_end(),
        KeyCode::PageUp if shift => doc.select_page_up(),
        KeyCode::PageDown if shift => doc.select_page_down(),

        KeyCode::Up => doc.move_up(),
        KeyCode::Down => doc.move_down(),
        KeyCode::Left => doc.move_left(),
        KeyCode::Right => doc.move_right(),
        KeyCode::Home => doc.move_home(),
        KeyCode::End => doc.move_end(),
        KeyCode::PageUp => doc.page_up(),
        KeyCode::PageDown => doc.page_down(),

        KeyCode::Enter => doc.insert_newline(),
        KeyCode::Backspace => doc.delete_char_before(),
        KeyCode::Delete => doc.delete_char_at(),
        KeyCode::Tab => doc.insert_tab(app.tab_width),
        KeyCode::Char(c) if !ctrl && !alt => doc.insert_char(c),
        _ => {}
    }
}

fn handle_menu_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.menu_switch(false),
        KeyCode::Right => app.menu_switch(true),
        KeyCode::Up => app.menu_move(false),
        KeyCode::Down => app.menu_move(true),
        KeyCode::Enter => app.menu_activate(),
        KeyCode::Esc | KeyCode::F(10) => app.close_menu(),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => {
            if let Some(index) = menu_for_mnemonic(c) {
                app.open_menu(index);
            }
        }
        _ => {}
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent, kind: DialogKind) {
    if kind.uses_text_input() {
        match key.code {
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Enter => app.submit_dialog(),
            _ => {
                edit_text_input(&mut app.dialog_input, key);
            }
        }
        return;
    }

    match kind {
        DialogKind::FindReplace => handle_find_dialog(app, key),
        DialogKind::Font => match key.code {
            KeyCode::Up => app.font_move(false),
            KeyCode::Down => app.font_move(true),
            KeyCode::Char('r') | KeyCode::Char('R') => app.font_reset(),
            KeyCode::Enter => app.font_accept(),
            KeyCode::Esc => app.font_cancel(),
            _ => {}
        },
        DialogKind::ColorPicker { .. } => match key.code {
            KeyCode::Up => app.color_picker_move(false),
            KeyCode::Down => app.color_picker_move(true),
            KeyCode::Enter => app.submit_dialog(),
            KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        DialogKind::ConfirmDiscard { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_discard_accept()
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        DialogKind::About => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.close_dialog();
            }
        }
        DialogKind::Shortcuts => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::F(1) => app.close_dialog(),
            KeyCode::Up => scroll_help(app, -1),
            KeyCode::Down => scroll_help(app, 1),
            KeyCode::PageUp => scroll_help(app, -10),
            KeyCode::PageDown => scroll_help(app, 10),
            KeyCode::Home => app.help_scroll = 0,
            _ => {}
        },
        // Text-input dialogs were handled above.
        _ => {}
    }
}

fn handle_find_dialog(app: &mut App, key: KeyEvent) {
    let Some(find) = app.find.as_mut() else {
        app.close_dialog();
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Tab => find.focus = find.focus.next(),
        KeyCode::BackTab => find.focus = find.focus.prev(),
        KeyCode::Enter => app.find_activate(),
        KeyCode::F(3) => app.find_next(),
        KeyCode::Char(' ')
            if !matches!(find.focus, FindFocus::Find | FindFocus::Replace) =>
        {
            app.find_activate()
        }
        _ => {
            let query_focused = find.focus == FindFocus::Find;
            let changed = find
                .focused_input_mut()
                .map(|input| edit_text_input(input, key))
                .unwrap_or(false);
            if changed && query_focused {
                app.refresh_find_matches();
            }
        }
    }
}

/// Apply an editing key to a single-line input. Returns true when the text
/// changed.
fn edit_text_input(input: &mut TextInput, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(c) if !ctrl && !alt => {
            input.insert_char(c);
            true
        }
        KeyCode::Backspace => {
            let before = input.input.len();
            input.delete_char();
            before != input.input.len()
        }
        KeyCode::Delete => {
            let before = input.input.len();
            input.delete_forward();
            before != input.input.len()
        }
        KeyCode::Left => {
            input.move_cursor_left();
            false
        }
        KeyCode::Right => {
            input.move_cursor_right();
            false
        }
        KeyCode::Home => {
            input.cursor_home();
            false
        }
        KeyCode::End => {
            input.cursor_end();
            false
        }
        _ => false,
    }
}

fn scroll_help(app: &mut App, delta: isize) {
    let max = help::shortcut_line_count().saturating_sub(1);
    app.help_scroll = app.help_scroll.saturating_add_signed(delta).min(max);
}

/// Handle a mouse event. Dialogs and message boxes are keyboard-only.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.message.is_some() {
        return;
    }
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match app.mode.clone() {
            AppMode::Menu { index, .. } => click_in_menu(app, index, x, y),
            AppMode::Normal => click_in_normal(app, x, y),
            AppMode::Dialog(_) => {}
        },
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.dragging && app.mode == AppMode::Normal {
                if let Some((line, col)) = app.editor_position_at(x, y) {
                    app.document.select_to(line, col);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.dragging = false,
        MouseEventKind::ScrollUp => scroll_wheel(app, -WHEEL_STEP),
        MouseEventKind::ScrollDown => scroll_wheel(app, WHEEL_STEP),
        _ => {}
    }
}

fn click_in_normal(app: &mut App, x: u16, y: u16) {
    if let Some(index) = menu_title_at(app, x, y) {
        app.open_menu(index);
        return;
    }
    let button = app
        .layout
        .toolbar_buttons
        .iter()
        .find(|(rect, _)| rect_contains(*rect, x, y))
        .map(|(_, cmd)| *cmd);
    if let Some(cmd) = button {
        app.execute(cmd);
        return;
    }
    if let Some((line, col)) = app.editor_position_at(x, y) {
        app.document.set_cursor_position(line, col);
        app.dragging = true;
    }
}

fn click_in_menu(app: &mut App, index: usize, x: u16, y: u16) {
    if let Some(dropdown) = app.layout.dropdown {
        if rect_contains(dropdown, x, y) {
            // Row 0 is the top border.
            let row = (y - dropdown.y) as usize;
            if row >= 1 && MENUS[index].command_at(row - 1).is_some() {
                app.mode = AppMode::Menu {
                    index,
                    selected: row - 1,
                };
                app.menu_activate();
            }
            return;
        }
    }
    match menu_title_at(app, x, y) {
        Some(clicked) if clicked != index => app.open_menu(clicked),
        _ => app.close_menu(),
    }
}

fn menu_title_at(app: &App, x: u16, y: u16) -> Option<usize> {
    app.layout
        .menu_titles
        .iter()
        .position(|rect| rect_contains(*rect, x, y))
}

fn scroll_wheel(app: &mut App, delta: isize) {
    match app.mode {
        AppMode::Normal => app.document.scroll_by(delta),
        AppMode::Dialog(DialogKind::Shortcuts) => scroll_help(app, delta),
        _ => {}
    }
}

/// Handle bracketed paste: into the focused input, or the document.
pub fn handle_paste(app: &mut App, text: String) {
    if app.message.is_some() {
        return;
    }
    match app.mode.clone() {
        AppMode::Normal => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            app.document.insert_str(&text);
        }
        AppMode::Dialog(DialogKind::FindReplace) => {
            let mut query_changed = false;
            if let Some(find) = app.find.as_mut() {
                query_changed = find.focus == FindFocus::Find;
                if let Some(input) = find.focused_input_mut() {
                    input.insert_str(&text);
                }
            }
            if query_changed {
                app.refresh_find_matches();
            }
        }
        AppMode::Dialog(kind) if kind.uses_text_input() => app.dialog_input.insert_str(&text),
        _ => {}
    }
}
