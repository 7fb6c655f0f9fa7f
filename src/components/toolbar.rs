use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::command::{Command, ToolbarEntry, TOOLBAR};
use crate::theme::ThemeColors;

/// Clickable rectangles of the toolbar buttons.
pub fn button_rects(area: Rect) -> Vec<(Rect, Command)> {
    let mut x = area.x + 1;
    let right = area.x + area.width;
    let mut rects = Vec::new();
    for entry in TOOLBAR {
        match entry {
            ToolbarEntry::Button(label, cmd) => {
                let width = label.chars().count() as u16 + 2;
                if x + width > right {
                    break;
                }
                rects.push((Rect::new(x, area.y, width, 1), *cmd));
                x += width + 1;
            }
            ToolbarEntry::Separator => x += 2,
        }
    }
    rects
}

/// Row of command buttons below the menu bar.
pub struct Toolbar<'a> {
    theme: &'a ThemeColors,
    disabled: &'a [Command],
}

impl<'a> Toolbar<'a> {
    pub fn new(theme: &'a ThemeColors) -> Self {
        Self {
            theme,
            disabled: &[],
        }
    }

    pub fn disabled(mut self, commands: &'a [Command]) -> Self {
        self.disabled = commands;
        self
    }
}

impl<'a> Widget for Toolbar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let base = Style::default()
            .bg(self.theme.toolbar_bg)
            .fg(self.theme.toolbar_fg);
        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, base);

        let buttons = button_rects(row);
        let button_style = base.bg(self.theme.menu_selected_bg);
        for (rect, cmd) in &buttons {
            let label = TOOLBAR
                .iter()
                .find_map(|e| match e {
                    ToolbarEntry::Button(label, c) if c == cmd => Some(*label),
                    _ => None,
                })
                .unwrap_or("");
            let style = if self.disabled.contains(cmd) {
                button_style.fg(self.theme.dim_fg)
            } else {
                button_style
            };
            buf.set_string(rect.x, rect.y, format!(" {label} "), style);
        }

        // Separators sit one column after the preceding button's gap.
        let mut x = row.x + 1;
        for entry in TOOLBAR {
            match entry {
                ToolbarEntry::Button(label, _) => x += label.chars().count() as u16 + 3,
                ToolbarEntry::Separator => {
                    if x < row.x + row.width {
                        buf.set_string(x, row.y, "│", base.fg(self.theme.border_fg));
                    }
                    x += 2;
                }
            }
        }
    }
}
