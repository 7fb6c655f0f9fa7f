use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, DialogKind};
use crate::command::{Command, MenuEntry, ToolbarEntry, MENUS, TOOLBAR};
use crate::components::dialog::{DialogWidget, MessageBox};
use crate::components::editor::EditorWidget;
use crate::components::find_dialog::FindDialogWidget;
use crate::components::font_dialog::FontDialogWidget;
use crate::components::help::{AboutDialog, HelpOverlay};
use crate::components::menu_bar::{dropdown_rect, title_rects, MenuBar, MenuDropdown};
use crate::components::status_bar::StatusBarWidget;
use crate::components::toolbar::{button_rects, Toolbar};

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let status_height = if app.view.status_bar { 1 } else { 0 };
    let [menu_area, toolbar_area, editor_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(status_height),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.border_fg));
    let text_area = EditorWidget::text_area(block.inner(editor_area), &app.document, app.view.line_numbers);
    sync_viewport(app, text_area);

    app.layout.menu_titles = title_rects(menu_area);
    app.layout.toolbar_buttons = button_rects(toolbar_area);
    app.layout.editor = text_area;
    app.layout.dropdown = match app.mode {
        AppMode::Menu { index, .. } => dropdown_rect(index, menu_area, area),
        _ => None,
    };

    let open_menu = match app.mode {
        AppMode::Menu { index, .. } => Some(index),
        _ => None,
    };
    let title = app.document.title();
    frame.render_widget(MenuBar::new(&app.theme).open(open_menu).title(&title), menu_area);

    let toolbar_disabled: Vec<Command> = TOOLBAR
        .iter()
        .filter_map(|e| match e {
            ToolbarEntry::Button(_, cmd) if !app.is_enabled(*cmd) => Some(*cmd),
            _ => None,
        })
        .collect();
    frame.render_widget(
        Toolbar::new(&app.theme).disabled(&toolbar_disabled),
        toolbar_area,
    );

    let matches = app
        .find
        .as_ref()
        .map(|f| f.matches.as_slice())
        .unwrap_or(&[]);
    let editor = EditorWidget::new(&app.document, &app.theme, app.format)
        .line_numbers(app.view.line_numbers)
        .matches(matches)
        .show_cursor(app.mode == AppMode::Normal)
        .block(block);
    frame.render_widget(editor, editor_area);

    if app.view.status_bar {
        let counts = app.status_counts();
        let position = app.status_position();
        let mut status = StatusBarWidget::new(&counts, &position, &app.theme);
        if let Some((msg, _)) = &app.status_message {
            status = status.status_message(msg);
        }
        frame.render_widget(status, status_area);
    }

    render_overlays(app, frame, area);
}

/// Keep the document's idea of the viewport in step with the screen.
fn sync_viewport(app: &mut App, text_area: Rect) {
    let doc = &mut app.document;
    let height = text_area.height as usize;
    let width = text_area.width as usize;
    if doc.visible_height != height || doc.visible_width != width {
        doc.visible_height = height;
        doc.visible_width = width;
        doc.ensure_cursor_visible();
    }
}

fn render_overlays(app: &App, frame: &mut Frame, area: Rect) {
    if let (AppMode::Menu { index, selected }, Some(rect)) = (&app.mode, app.layout.dropdown) {
        let menu = &MENUS[*index];
        let mut checked = Vec::new();
        let mut disabled = Vec::new();
        for entry in menu.entries {
            if let MenuEntry::Item(cmd) = entry {
                if app.is_checked(*cmd) {
                    checked.push(*cmd);
                }
                if !app.is_enabled(*cmd) {
                    disabled.push(*cmd);
                }
            }
        }
        frame.render_widget(
            MenuDropdown::new(menu, *selected, &app.theme)
                .checked(&checked)
                .disabled(&disabled),
            rect,
        );
    }

    if let AppMode::Dialog(kind) = &app.mode {
        match kind {
            DialogKind::FindReplace => {
                if let Some(find) = &app.find {
                    frame.render_widget(FindDialogWidget::new(find, &app.theme), area);
                }
            }
            DialogKind::Font => frame.render_widget(
                FontDialogWidget::new(app.font_dialog.selected, app.format, &app.theme),
                area,
            ),
            DialogKind::About => frame.render_widget(AboutDialog::new(&app.theme), area),
            DialogKind::Shortcuts => {
                frame.render_widget(HelpOverlay::new(&app.theme, app.help_scroll), area)
            }
            _ => frame.render_widget(DialogWidget::new(app), area),
        }
    }

    if let Some(message) = &app.message {
        frame.render_widget(MessageBox::new(message, &app.theme), area);
    }
}
