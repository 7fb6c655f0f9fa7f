use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Widget},
};

use crate::document::Document;
use crate::format::TextFormat;
use crate::theme::ThemeColors;

/// Widget for rendering the document with optional line numbers, word wrap,
/// selection and search-match highlighting.
pub struct EditorWidget<'a> {
    document: &'a Document,
    theme: &'a ThemeColors,
    format: TextFormat,
    line_numbers: bool,
    matches: &'a [Range<usize>],
    show_cursor: bool,
    block: Option<Block<'a>>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(document: &'a Document, theme: &'a ThemeColors, format: TextFormat) -> Self {
        Self {
            document,
            theme,
            format,
            line_numbers: false,
            matches: &[],
            show_cursor: true,
            block: None,
        }
    }

    pub fn line_numbers(mut self, on: bool) -> Self {
        self.line_numbers = on;
        self
    }

    /// Search hits to highlight, sorted by start offset.
    pub fn matches(mut self, matches: &'a [Range<usize>]) -> Self {
        self.matches = matches;
        self
    }

    pub fn show_cursor(mut self, on: bool) -> Self {
        self.show_cursor = on;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Area left for text once the gutter is taken out of `inner`.
    pub fn text_area(inner: Rect, document: &Document, line_numbers: bool) -> Rect {
        let gutter = if line_numbers {
            document.gutter_width().min(inner.width)
        } else {
            0
        };
        Rect::new(inner.x + gutter, inner.y, inner.width - gutter, inner.height)
    }

    fn is_match(&self, offset: usize) -> bool {
        let idx = self.matches.partition_point(|r| r.end <= offset);
        self.matches
            .get(idx)
            .map(|r| r.start <= offset)
            .unwrap_or(false)
    }

    fn render_gutter(&self, line_idx: Option<usize>, x: u16, y: u16, gutter_w: u16, buf: &mut Buffer) {
        let digits = gutter_w.saturating_sub(2) as usize;
        let (label, style) = match line_idx {
            Some(idx) if idx == self.document.cursor_line => (
                format!("{:>digits$} ", idx + 1),
                Style::default()
                    .fg(self.theme.editor_line_nr_current)
                    .add_modifier(Modifier::BOLD),
            ),
            Some(idx) => (
                format!("{:>digits$} ", idx + 1),
                Style::default().fg(self.theme.editor_line_nr),
            ),
            None => (" ".repeat(digits + 1), Style::default()),
        };
        buf.set_span(x, y, &Span::styled(label, style), gutter_w);
        let sep_style = Style::default().fg(self.theme.editor_gutter_sep);
        buf.set_string(x + gutter_w - 1, y, "│", sep_style);
    }

    /// Draw one visual row: characters `start..end` of `line_idx`.
    #[allow(clippy::too_many_arguments)]
    fn render_row(
        &self,
        line_idx: usize,
        chars: &[char],
        start: usize,
        end: usize,
        line_offset: usize,
        text: Rect,
        y: u16,
        base: Style,
        buf: &mut Buffer,
    ) {
        let selection = self.theme.selection_bg;
        for (i, col) in (start..end).enumerate() {
            let x = text.x + i as u16;
            let Some(ch) = chars.get(col) else { break };
            let style = if self.document.is_selected(line_idx, col) {
                base.bg(selection).fg(self.theme.selection_fg)
            } else if self.is_match(line_offset + col) {
                base.bg(self.theme.find_match_bg).fg(self.theme.editor_cursor_fg)
            } else {
                base
            };
            let mut s = [0u8; 4];
            buf.set_string(x, y, ch.encode_utf8(&mut s), style);
        }
    }

    fn draw_cursor(&self, x: u16, y: u16, text: Rect, buf: &mut Buffer) {
        if !self.show_cursor || x >= text.x + text.width || y >= text.y + text.height {
            return;
        }
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_style(
                Style::default()
                    .fg(self.theme.editor_cursor_fg)
                    .bg(self.theme.editor_cursor_bg),
            );
        }
    }
}

impl<'a> Widget for EditorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let base = self.format.style(self.theme.editor_fg, self.theme.editor_bg);
        buf.set_style(inner, base);

        let text = Self::text_area(inner, self.document, self.line_numbers);
        let gutter_w = text.x - inner.x;
        if text.width == 0 {
            return;
        }
        let width = text.width as usize;
        let doc = self.document;

        let mut y = inner.y;
        let bottom = inner.y + inner.height;
        let mut line_idx = doc.scroll_offset;
        let mut line_offset = doc.position_to_offset(line_idx, 0);

        while y < bottom && line_idx < doc.line_count() {
            let chars: Vec<char> = doc.lines[line_idx].chars().collect();
            let is_cursor_line = line_idx == doc.cursor_line;

            if doc.wrap {
                let rows = chars.len() / width + 1;
                for sub in 0..rows {
                    if y >= bottom {
                        break;
                    }
                    if gutter_w > 0 {
                        let label = (sub == 0).then_some(line_idx);
                        self.render_gutter(label, inner.x, y, gutter_w, buf);
                    }
                    let start = sub * width;
                    let end = (start + width).min(chars.len());
                    self.render_row(line_idx, &chars, start, end, line_offset, text, y, base, buf);
                    if is_cursor_line && doc.cursor_col / width == sub {
                        self.draw_cursor(text.x + (doc.cursor_col % width) as u16, y, text, buf);
                    }
                    y += 1;
                }
            } else {
                if gutter_w > 0 {
                    self.render_gutter(Some(line_idx), inner.x, y, gutter_w, buf);
                }
                let start = doc.h_scroll.min(chars.len());
                let end = (doc.h_scroll + width).min(chars.len());
                self.render_row(line_idx, &chars, start, end, line_offset, text, y, base, buf);
                if is_cursor_line && doc.cursor_col >= doc.h_scroll {
                    let x = text.x as usize + (doc.cursor_col - doc.h_scroll);
                    if x < (text.x + text.width) as usize {
                        self.draw_cursor(x as u16, y, text, buf);
                    }
                }
                y += 1;
            }

            line_offset += chars.len() + 1;
            line_idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;
    use ratatui::style::Color;

    fn render(widget: EditorWidget, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn renders_lines_without_gutter() {
        let doc = Document::new("hello\nworld", None);
        let theme = dark_theme();
        let area = Rect::new(0, 0, 20, 3);
        let buf = render(EditorWidget::new(&doc, &theme, TextFormat::default()), area);
        assert!(row_text(&buf, 0, 20).starts_with("hello"));
        assert!(row_text(&buf, 1, 20).starts_with("world"));
    }

    #[test]
    fn line_numbers_add_gutter() {
        let doc = Document::new("a\nb", None);
        let theme = dark_theme();
        let area = Rect::new(0, 0, 20, 3);
        let widget = EditorWidget::new(&doc, &theme, TextFormat::default()).line_numbers(true);
        let buf = render(widget, area);
        assert_eq!(row_text(&buf, 0, 4), "1 │a");
        assert_eq!(row_text(&buf, 1, 4), "2 │b");
        let text = EditorWidget::text_area(area, &doc, true);
        assert_eq!(text.x, 3);
    }

    #[test]
    fn wrap_splits_long_lines() {
        let mut doc = Document::new("abcdefgh\nz", None);
        doc.wrap = true;
        let theme = dark_theme();
        let area = Rect::new(0, 0, 5, 4);
        let buf = render(EditorWidget::new(&doc, &theme, TextFormat::default()), area);
        assert_eq!(row_text(&buf, 0, 5), "abcde");
        assert_eq!(row_text(&buf, 1, 5).trim_end(), "fgh");
        assert_eq!(row_text(&buf, 2, 5).trim_end(), "z");
    }

    #[test]
    fn no_wrap_uses_horizontal_scroll() {
        let mut doc = Document::new("abcdefgh", None);
        doc.h_scroll = 3;
        let theme = dark_theme();
        let area = Rect::new(0, 0, 4, 1);
        let buf = render(EditorWidget::new(&doc, &theme, TextFormat::default()), area);
        assert_eq!(row_text(&buf, 0, 4), "defg");
    }

    #[test]
    fn selection_is_highlighted() {
        let mut doc = Document::new("hello", None);
        doc.select_right();
        doc.select_right();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 10, 1);
        let buf = render(
            EditorWidget::new(&doc, &theme, TextFormat::default()).show_cursor(false),
            area,
        );
        assert_eq!(buf.cell((0, 0)).map(|c| c.bg), Some(theme.selection_bg));
        assert_eq!(buf.cell((1, 0)).map(|c| c.bg), Some(theme.selection_bg));
        assert_ne!(buf.cell((2, 0)).map(|c| c.bg), Some(theme.selection_bg));
    }

    #[test]
    fn matches_are_highlighted_on_later_lines() {
        let doc = Document::new("xx\nab ab", None);
        let theme = dark_theme();
        let area = Rect::new(0, 0, 10, 2);
        let matches = vec![3..5, 6..8];
        let buf = render(
            EditorWidget::new(&doc, &theme, TextFormat::default())
                .matches(&matches)
                .show_cursor(false),
            area,
        );
        assert_eq!(buf.cell((0, 1)).map(|c| c.bg), Some(theme.find_match_bg));
        assert_eq!(buf.cell((1, 1)).map(|c| c.bg), Some(theme.find_match_bg));
        assert_ne!(buf.cell((2, 1)).map(|c| c.bg), Some(theme.find_match_bg));
        assert_eq!(buf.cell((3, 1)).map(|c| c.bg), Some(theme.find_match_bg));
    }

    #[test]
    fn format_applies_to_text() {
        let doc = Document::new("hi", None);
        let theme = dark_theme();
        let format = TextFormat {
            bold: true,
            italic: false,
            fg: Some(Color::Red),
            bg: Some(Color::Blue),
        };
        let area = Rect::new(0, 0, 5, 1);
        let buf = render(EditorWidget::new(&doc, &theme, format).show_cursor(false), area);
        let cell = buf.cell((1, 0)).expect("cell");
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.bg, Color::Blue);
        assert!(cell.modifier.contains(Modifier::BOLD));
        // Empty space is painted with the background too.
        assert_eq!(buf.cell((4, 0)).map(|c| c.bg), Some(Color::Blue));
    }

    #[test]
    fn cursor_drawn_at_end_of_line() {
        let mut doc = Document::new("ab", None);
        doc.move_end();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 5, 1);
        let buf = render(EditorWidget::new(&doc, &theme, TextFormat::default()), area);
        assert_eq!(buf.cell((2, 0)).map(|c| c.bg), Some(theme.editor_cursor_bg));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let doc = Document::new("abc", None);
        let theme = dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let _ = render(EditorWidget::new(&doc, &theme, TextFormat::default()), area);
    }
}
