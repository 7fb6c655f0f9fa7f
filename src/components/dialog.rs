use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::app::{App, AppMode, DialogKind, Message, MessageLevel, TextInput, COLOR_PICKER_ROWS};
use crate::format::{ColorTarget, PRESET_COLORS};
use crate::theme::ThemeColors;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

/// Bordered dialog frame; returns the inner area.
pub fn dialog_frame(
    title: &str,
    rect: Rect,
    border: Color,
    theme: &ThemeColors,
    buf: &mut Buffer,
) -> Rect {
    Clear.render(rect, buf);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.dialog_bg).fg(theme.editor_fg))
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}

/// Hint line in the bottom row of a dialog.
pub fn render_hint(hint: &str, inner: Rect, theme: &ThemeColors, buf: &mut Buffer) {
    if inner.height == 0 {
        return;
    }
    let hint_style = Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint.to_string(), hint_style));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

/// Single-line input with a block cursor, scrolled so the cursor stays visible.
pub fn render_text_input(
    input: &TextInput,
    area: Rect,
    focused: bool,
    theme: &ThemeColors,
    buf: &mut Buffer,
) {
    if area.width == 0 {
        return;
    }
    let field_style = Style::default().bg(theme.editor_bg).fg(theme.editor_fg);
    buf.set_style(area, field_style);

    let chars: Vec<char> = input.input.chars().collect();
    let cursor = input.cursor_chars();
    let width = area.width as usize;
    // Keep one column for the cursor at the end.
    let skip = (cursor + 1).saturating_sub(width);

    for (i, ch) in chars.iter().skip(skip).take(width).enumerate() {
        let mut s = [0u8; 4];
        buf.set_string(area.x + i as u16, area.y, ch.encode_utf8(&mut s), field_style);
    }
    if focused {
        let cx = area.x + (cursor - skip) as u16;
        if let Some(cell) = buf.cell_mut((cx, area.y)) {
            cell.set_style(
                Style::default()
                    .bg(theme.editor_cursor_bg)
                    .fg(theme.editor_cursor_fg)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Renders the path, line-number, custom colour, confirm and colour picker dialogs.
pub struct DialogWidget<'a> {
    app: &'a App,
}

impl<'a> DialogWidget<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.app.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };
        let theme = &self.app.theme;
        let input = &self.app.dialog_input;

        match kind {
            DialogKind::OpenFile => {
                render_input_dialog("Open", "File name:", input, theme, area, buf);
            }
            DialogKind::SaveAs => {
                render_input_dialog("Save As", "File name:", input, theme, area, buf);
            }
            DialogKind::GoToLine => {
                render_input_dialog("Go To Line", "Line number:", input, theme, area, buf);
            }
            DialogKind::CustomColor { target } => {
                render_input_dialog(
                    target.title(),
                    "Colour name or #rrggbb:",
                    input,
                    theme,
                    area,
                    buf,
                );
            }
            DialogKind::ConfirmDiscard { .. } => {
                render_confirm_dialog(&self.app.document.display_name(), theme, area, buf);
            }
            DialogKind::ColorPicker { target } => {
                let current = self.app.format.color(*target);
                render_color_picker(*target, self.app.color_picker_selected, current, theme, area, buf);
            }
            // Rendered by their own widgets.
            DialogKind::FindReplace | DialogKind::Font | DialogKind::About | DialogKind::Shortcuts => {}
        }
    }
}

fn render_input_dialog(
    title: &str,
    prompt: &str,
    input: &TextInput,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let rect = centered_rect(dialog_width, 6, area);
    let inner = dialog_frame(title, rect, theme.dialog_border_fg, theme, buf);
    if inner.height < 2 || inner.width == 0 {
        return;
    }

    buf.set_string(inner.x, inner.y, prompt, Style::default().fg(theme.editor_fg));
    let field = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    render_text_input(input, field, true, theme, buf);
    if inner.height > 2 {
        render_hint("[Enter] OK  [Esc] Cancel", inner, theme, buf);
    }
}

fn render_confirm_dialog(name: &str, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let question = format!("Discard unsaved changes to {name}?");
    let width = (question.chars().count() as u16 + 6)
        .max(36)
        .min(area.width.saturating_sub(4));
    let rect = centered_rect(width, 5, area);
    let inner = dialog_frame("Notepad", rect, theme.warning_fg, theme, buf);
    if inner.height == 0 {
        return;
    }
    buf.set_line(
        inner.x,
        inner.y,
        &Line::from(Span::styled(question, Style::default().fg(theme.editor_fg))),
        inner.width,
    );
    if inner.height > 1 {
        render_hint("[y] Yes  [n/Esc] Cancel", inner, theme, buf);
    }
}

fn render_color_picker(
    target: ColorTarget,
    selected: usize,
    current: Option<Color>,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let rect = centered_rect(34, COLOR_PICKER_ROWS as u16 + 4, area);
    let inner = dialog_frame(target.title(), rect, theme.dialog_border_fg, theme, buf);

    for row in 0..COLOR_PICKER_ROWS {
        let y = inner.y + row as u16;
        if y + 1 >= inner.y + inner.height {
            break;
        }
        let (label, swatch, is_current) = match PRESET_COLORS.get(row) {
            Some((name, color)) => (*name, *color, *color == current),
            None => ("Custom...", None, false),
        };
        let row_style = if row == selected {
            Style::default().bg(theme.menu_selected_bg).fg(theme.menu_selected_fg)
        } else {
            Style::default().bg(theme.dialog_bg).fg(theme.editor_fg)
        };
        let mark = if is_current { "●" } else { " " };
        let text = format!(" {mark} {label:<20}");
        buf.set_line(inner.x, y, &Line::from(Span::styled(text, row_style)), inner.width);
        if let Some(color) = swatch {
            let sx = inner.x + inner.width.saturating_sub(3);
            buf.set_string(sx, y, "██", Style::default().fg(color));
        }
    }
    render_hint("[↑↓] Select  [Enter] OK  [Esc]", inner, theme, buf);
}

/// Modal message box; sized to fit its body.
pub struct MessageBox<'a> {
    message: &'a Message,
    theme: &'a ThemeColors,
}

impl<'a> MessageBox<'a> {
    pub fn new(message: &'a Message, theme: &'a ThemeColors) -> Self {
        Self { message, theme }
    }
}

impl<'a> Widget for MessageBox<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body_len = self.message.body.chars().count() as u16;
        let title_len = self.message.title.chars().count() as u16;
        let width = (body_len.max(title_len) + 6)
            .max(30)
            .min(area.width.saturating_sub(4).max(10));
        let text_width = width.saturating_sub(4).max(1);
        let body_rows = body_len.div_ceil(text_width).max(1);
        let rect = centered_rect(width, body_rows + 4, area);

        let border = match self.message.level {
            MessageLevel::Info => self.theme.info_fg,
            MessageLevel::Warning => self.theme.warning_fg,
            MessageLevel::Error => self.theme.error_fg,
        };
        let inner = dialog_frame(&self.message.title, rect, border, self.theme, buf);
        if inner.height == 0 {
            return;
        }

        let body_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
        Paragraph::new(self.message.body.as_str())
            .style(Style::default().fg(self.theme.editor_fg))
            .wrap(Wrap { trim: true })
            .render(body_area, buf);
        render_hint("[Enter] OK", inner, self.theme, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::document::Document;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    fn render_app(app: &App) -> (Buffer, Rect) {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(app).render(area, &mut buf);
        (buf, area)
    }

    #[test]
    fn centered_rect_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect(100, 30, area), area);
    }

    #[test]
    fn input_dialog_shows_title_prompt_and_text() {
        let mut app = App::new(&AppConfig::default(), Document::new("", None));
        app.open_dialog(DialogKind::OpenFile);
        app.dialog_input = TextInput::with_text("notes.txt");
        let (buf, area) = render_app(&app);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains(" Open "));
        assert!(text.contains("File name:"));
        assert!(text.contains("notes.txt"));
        assert!(text.contains("[Enter] OK  [Esc] Cancel"));
    }

    #[test]
    fn go_to_line_dialog_prefilled() {
        let mut app = App::new(&AppConfig::default(), Document::new("a\nb", None));
        app.document.set_cursor_position(1, 0);
        app.open_dialog(DialogKind::GoToLine);
        let (buf, area) = render_app(&app);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains("Line number:"));
        assert!(text.contains("2"));
    }

    #[test]
    fn confirm_dialog_names_document() {
        let mut app = App::new(&AppConfig::default(), Document::untitled());
        app.open_dialog(DialogKind::ConfirmDiscard {
            pending: crate::app::PendingAction::Quit,
        });
        let (buf, area) = render_app(&app);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains("Discard unsaved changes to Untitled?"));
        assert!(text.contains("[y] Yes"));
    }

    #[test]
    fn color_picker_lists_presets_and_custom() {
        let mut app = App::new(&AppConfig::default(), Document::untitled());
        app.format.fg = Some(Color::Red);
        app.open_dialog(DialogKind::ColorPicker {
            target: ColorTarget::Text,
        });
        app.color_picker_selected = 1;
        let (buf, area) = render_app(&app);
        let text = buffer_to_string(&buf, area);
        for (name, _) in PRESET_COLORS {
            assert!(text.contains(name), "{name} missing");
        }
        assert!(text.contains("Custom..."));
        assert!(text.contains("● Red"));
        assert!(text.contains(" Text Color "));
    }

    #[test]
    fn non_widget_dialogs_render_nothing() {
        let mut app = App::new(&AppConfig::default(), Document::untitled());
        app.open_dialog(DialogKind::About);
        let (buf, area) = render_app(&app);
        assert!(buffer_to_string(&buf, area).trim().is_empty());
    }

    #[test]
    fn text_input_scrolls_to_cursor() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        let input = TextInput::with_text("abcdefgh");
        render_text_input(&input, area, true, &theme, &mut buf);
        assert_eq!(buffer_to_string(&buf, area), "efgh \n");
        assert_eq!(buf.cell((4, 0)).unwrap().bg, theme.editor_cursor_bg);
    }

    #[test]
    fn message_box_wraps_body_and_colors_border() {
        let theme = dark_theme();
        let message = Message {
            title: "Open".into(),
            body: "Cannot open missing.txt: No such file or directory (os error 2)".into(),
            level: MessageLevel::Error,
        };
        let area = Rect::new(0, 0, 50, 20);
        let mut buf = Buffer::empty(area);
        MessageBox::new(&message, &theme).render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains(" Open "));
        assert!(text.contains("Cannot open"));
        assert!(text.contains("[Enter] OK"));
        let top_left = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .find(|pos| buf.cell(*pos).unwrap().symbol() == "┌")
            .expect("border drawn");
        assert_eq!(buf.cell(top_left).unwrap().fg, theme.error_fg);
    }
}
