use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::{FindDialogState, FindFocus};
use crate::components::dialog::{centered_rect, dialog_frame, render_hint, render_text_input};
use crate::theme::ThemeColors;

const LABEL_WIDTH: u16 = 14;

/// Find and replace dialog. Placed near the top so hits stay visible.
pub struct FindDialogWidget<'a> {
    state: &'a FindDialogState,
    theme: &'a ThemeColors,
}

impl<'a> FindDialogWidget<'a> {
    pub fn new(state: &'a FindDialogState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }

    fn focus_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.theme.menu_selected_bg)
                .fg(self.theme.menu_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.editor_fg)
        }
    }

    fn checkbox(&self, label: &'static str, on: bool, focus: FindFocus) -> Span<'static> {
        let mark = if on { "[x]" } else { "[ ]" };
        Span::styled(
            format!("{mark} {label}"),
            self.focus_style(self.state.focus == focus),
        )
    }

    fn button(&self, label: &'static str, focus: FindFocus) -> Span<'static> {
        Span::styled(
            format!("[ {label} ]"),
            self.focus_style(self.state.focus == focus),
        )
    }
}

/// Where the dialog sits within `area`.
pub fn find_dialog_rect(area: Rect) -> Rect {
    let rect = centered_rect(60, 9, area);
    Rect::new(rect.x, area.y + area.height.saturating_sub(9).min(3), rect.width, rect.height)
}

impl<'a> Widget for FindDialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = find_dialog_rect(area);
        let inner = dialog_frame(
            "Find and Replace",
            rect,
            self.theme.dialog_border_fg,
            self.theme,
            buf,
        );
        if inner.height < 6 || inner.width <= LABEL_WIDTH {
            return;
        }
        let label_style = Style::default().fg(self.theme.editor_fg);
        let field_width = inner.width - LABEL_WIDTH;

        let fields = [
            ("Find what:", &self.state.find, FindFocus::Find),
            ("Replace with:", &self.state.replace, FindFocus::Replace),
        ];
        for (row, (label, input, focus)) in fields.into_iter().enumerate() {
            let y = inner.y + row as u16;
            let focused = self.state.focus == focus;
            let style = if focused {
                label_style.add_modifier(Modifier::BOLD)
            } else {
                label_style
            };
            buf.set_string(inner.x, y, label, style);
            let field = Rect::new(inner.x + LABEL_WIDTH, y, field_width, 1);
            render_text_input(input, field, focused, self.theme, buf);
        }

        let options = Line::from(vec![
            self.checkbox("Match case", self.state.match_case, FindFocus::MatchCase),
            Span::raw("   "),
            self.checkbox("Whole word", self.state.whole_word, FindFocus::WholeWord),
        ]);
        buf.set_line(inner.x, inner.y + 3, &options, inner.width);

        let buttons = Line::from(vec![
            self.button("Find Next", FindFocus::FindButton),
            Span::raw("  "),
            self.button("Replace", FindFocus::ReplaceButton),
            Span::raw("  "),
            self.button("Replace All", FindFocus::ReplaceAllButton),
        ]);
        buf.set_line(inner.x, inner.y + 5, &buttons, inner.width);

        if !self.state.find.input.is_empty() {
            let count = self.state.matches.len();
            let label = if count == 1 {
                "1 match".to_string()
            } else {
                format!("{count} matches")
            };
            let x = inner.x + inner.width.saturating_sub(label.chars().count() as u16);
            let style = Style::default().fg(if count == 0 {
                self.theme.warning_fg
            } else {
                self.theme.info_fg
            });
            buf.set_string(x, inner.y + 3, label, style);
        }

        render_hint("[Tab] Next  [Space] Toggle  [Enter] Run  [Esc] Close", inner, self.theme, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TextInput;
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

    fn render(state: &FindDialogState) -> (Buffer, Rect) {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        FindDialogWidget::new(state, &theme).render(area, &mut buf);
        (buf, area)
    }

    #[test]
    fn renders_fields_options_and_buttons() {
        let state = FindDialogState {
            find: TextInput::with_text("cat"),
            replace: TextInput::with_text("dog"),
            match_case: true,
            matches: vec![0..3, 8..11],
            ..Default::default()
        };
        let (buf, area) = render(&state);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains(" Find and Replace "));
        assert!(text.contains("Find what:"));
        assert!(text.contains("Replace with:"));
        assert!(text.contains("cat"));
        assert!(text.contains("dog"));
        assert!(text.contains("[x] Match case"));
        assert!(text.contains("[ ] Whole word"));
        assert!(text.contains("[ Find Next ]"));
        assert!(text.contains("[ Replace All ]"));
        assert!(text.contains("2 matches"));
    }

    #[test]
    fn empty_query_hides_counter() {
        let state = FindDialogState::default();
        let (buf, area) = render(&state);
        assert!(!buffer_to_string(&buf, area).contains("matches"));
    }

    #[test]
    fn focused_button_is_highlighted() {
        let theme = dark_theme();
        let state = FindDialogState {
            focus: FindFocus::ReplaceAllButton,
            ..Default::default()
        };
        let (buf, area) = render(&state);
        let rect = find_dialog_rect(area);
        let row = rect.y + 1 + 5;
        let hit = (rect.x..rect.x + rect.width)
            .find(|x| buf.cell((*x, row)).unwrap().symbol() == "A")
            .expect("Replace All rendered");
        assert_eq!(buf.cell((hit, row)).unwrap().bg, theme.menu_selected_bg);
    }

    #[test]
    fn dialog_sits_near_top() {
        let rect = find_dialog_rect(Rect::new(0, 0, 80, 40));
        assert_eq!(rect.y, 3);
        assert_eq!(rect.height, 9);
        let small = find_dialog_rect(Rect::new(0, 0, 80, 10));
        assert_eq!(small.y, 1);
    }
}
