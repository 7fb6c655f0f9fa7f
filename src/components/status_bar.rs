use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar: counts on the left, cursor position on the right. A
/// transient message temporarily takes over the left side.
pub struct StatusBarWidget<'a> {
    counts: &'a str,
    position: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(counts: &'a str, position: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            counts,
            position,
            theme,
            status_message: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let base = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);
        buf.set_style(area, base);

        let width = area.width as usize;
        let right = format!("{} ", self.position);
        let right_len = right.chars().count();

        let (left_text, left_style) = match self.status_message {
            Some(msg) => (msg, base.fg(self.theme.success_fg)),
            None => (self.counts, base),
        };
        let left_budget = width.saturating_sub(right_len + 1);
        let left = truncate(&format!(" {left_text}"), left_budget);
        let gap = width.saturating_sub(left.chars().count() + right_len);

        let line = Line::from(vec![
            Span::styled(left, left_style),
            Span::styled(" ".repeat(gap), base),
            Span::styled(right, base),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        s
    }

    #[test]
    fn shows_counts_left_and_position_right() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("Characters: 5 | Words: 1", "Line: 1, Column: 6", &theme)
            .render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.starts_with(" Characters: 5 | Words: 1"));
        assert!(text.ends_with("Line: 1, Column: 6 "));
    }

    #[test]
    fn status_message_replaces_counts() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("Characters: 5 | Words: 1", "Line: 1, Column: 1", &theme)
            .status_message("Saved notes.txt")
            .render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains("Saved notes.txt"));
        assert!(!text.contains("Characters"));
        assert!(text.contains("Line: 1, Column: 1"));
        assert_eq!(buf.cell((1, 0)).unwrap().fg, theme.success_fg);
    }

    #[test]
    fn uses_status_colors() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("a", "b", &theme).render(area, &mut buf);
        let cell = buf.cell((20, 0)).unwrap();
        assert_eq!(cell.bg, theme.status_bg);
    }

    #[test]
    fn narrow_area_keeps_position_visible() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 24, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("Characters: 12345 | Words: 678", "Line: 1, Column: 1", &theme)
            .render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.ends_with("Line: 1, Column: 1 "));
    }
}
