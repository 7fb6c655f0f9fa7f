use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::components::dialog::{centered_rect, dialog_frame, render_hint};
use crate::format::{FontStyle, TextFormat};
use crate::theme::ThemeColors;

const SAMPLE: &str = "AaBbYyZz 0123";

/// Font style picker with a live sample.
pub struct FontDialogWidget<'a> {
    selected: usize,
    format: TextFormat,
    theme: &'a ThemeColors,
}

impl<'a> FontDialogWidget<'a> {
    pub fn new(selected: usize, format: TextFormat, theme: &'a ThemeColors) -> Self {
        Self {
            selected,
            format,
            theme,
        }
    }
}

impl<'a> Widget for FontDialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = FontStyle::ALL.len() as u16;
        let rect = centered_rect(44, rows + 7, area);
        let inner = dialog_frame("Font", rect, self.theme.dialog_border_fg, self.theme, buf);
        if inner.height < rows + 3 {
            return;
        }

        buf.set_string(inner.x, inner.y, "Font style:", Style::default().fg(self.theme.editor_fg));
        for (i, style) in FontStyle::ALL.iter().enumerate() {
            let y = inner.y + 1 + i as u16;
            let mut preview = TextFormat::default();
            preview.set_font_style(*style);
            let mut row_style = preview.style(self.theme.editor_fg, self.theme.dialog_bg);
            if i == self.selected {
                row_style = row_style
                    .bg(self.theme.menu_selected_bg)
                    .fg(self.theme.menu_selected_fg);
            }
            let marker = if i == self.selected { "▸" } else { " " };
            let text = format!(" {marker} {:<16}", style.label());
            buf.set_line(inner.x, y, &Line::from(Span::styled(text, row_style)), inner.width);
        }

        // Sample in the full current format, colours included.
        let sample_y = inner.y + rows + 2;
        let sample_style = self.format.style(self.theme.editor_fg, self.theme.editor_bg);
        buf.set_line(
            inner.x,
            sample_y,
            &Line::from(vec![
                Span::styled("Sample: ", Style::default().fg(self.theme.dim_fg)),
                Span::styled(SAMPLE, sample_style),
            ]),
            inner.width,
        );

        render_hint("[↑↓] Style  [r] Reset  [Enter] OK  [Esc]", inner, self.theme, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;
    use ratatui::style::Modifier;

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

    fn find(buf: &Buffer, area: Rect, needle: char) -> (u16, u16) {
        (area.y..area.y + area.height)
            .flat_map(|y| (area.x..area.x + area.width).map(move |x| (x, y)))
            .find(|pos| buf.cell(*pos).unwrap().symbol() == needle.to_string())
            .expect("symbol rendered")
    }

    #[test]
    fn lists_every_style_and_marks_selection() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        FontDialogWidget::new(2, TextFormat::default(), &theme).render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        for style in FontStyle::ALL {
            assert!(text.contains(style.label()));
        }
        assert!(text.contains("▸ Italic"));
        assert!(text.contains("Sample: AaBbYyZz"));
    }

    #[test]
    fn rows_preview_their_style() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        FontDialogWidget::new(0, TextFormat::default(), &theme).render(area, &mut buf);
        // "Bold Italic" is the only row with a capital I after a B.
        let text = buffer_to_string(&buf, area);
        let row = text
            .lines()
            .position(|l| l.contains("Bold Italic"))
            .expect("row") as u16;
        let col = text.lines().nth(row as usize).and_then(|l| {
            l.chars().position(|c| c == 'B')
        });
        let cell = buf.cell((col.expect("col") as u16, row)).unwrap();
        assert!(cell.modifier.contains(Modifier::BOLD | Modifier::ITALIC));
        let (x, y) = find(&buf, area, '▸');
        assert_eq!(buf.cell((x, y)).unwrap().bg, theme.menu_selected_bg);
    }

    #[test]
    fn sample_uses_current_format() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let format = TextFormat {
            bold: true,
            ..Default::default()
        };
        FontDialogWidget::new(1, format, &theme).render(area, &mut buf);
        let (x, y) = find(&buf, area, 'Z');
        assert!(buf.cell((x, y)).unwrap().modifier.contains(Modifier::BOLD));
    }
}
