use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::command::{Command, Menu, MenuEntry, MENUS};
use crate::theme::ThemeColors;

/// Screen rectangles of the menu titles, left to right.
pub fn title_rects(area: Rect) -> Vec<Rect> {
    let mut x = area.x;
    let mut rects = Vec::with_capacity(MENUS.len());
    for menu in MENUS {
        let width = menu.title.chars().count() as u16 + 2;
        if x + width > area.x + area.width {
            break;
        }
        rects.push(Rect::new(x, area.y, width, 1));
        x += width;
    }
    rects
}

/// Top row: menu titles with underlined mnemonics, document title on the right.
pub struct MenuBar<'a> {
    theme: &'a ThemeColors,
    open: Option<usize>,
    title: &'a str,
}

impl<'a> MenuBar<'a> {
    pub fn new(theme: &'a ThemeColors) -> Self {
        Self {
            theme,
            open: None,
            title: "",
        }
    }

    /// Highlight the title of the open menu.
    pub fn open(mut self, index: Option<usize>) -> Self {
        self.open = index;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn title_spans(&self, menu: &Menu, selected: bool) -> Vec<Span<'static>> {
        let base = if selected {
            Style::default()
                .bg(self.theme.menu_selected_bg)
                .fg(self.theme.menu_selected_fg)
        } else {
            Style::default().bg(self.theme.menu_bg).fg(self.theme.menu_fg)
        };
        let mnemonic_style = base
            .fg(if selected {
                self.theme.menu_selected_fg
            } else {
                self.theme.menu_mnemonic_fg
            })
            .add_modifier(Modifier::UNDERLINED);

        let mut spans = vec![Span::styled(" ", base)];
        let mut marked = false;
        for c in menu.title.chars() {
            if !marked && c.to_ascii_lowercase() == menu.mnemonic {
                marked = true;
                spans.push(Span::styled(c.to_string(), mnemonic_style));
            } else {
                spans.push(Span::styled(c.to_string(), base));
            }
        }
        spans.push(Span::styled(" ", base));
        spans
    }
}

impl<'a> Widget for MenuBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let bar = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(bar, Style::default().bg(self.theme.menu_bg).fg(self.theme.menu_fg));

        let rects = title_rects(bar);
        for (i, rect) in rects.iter().enumerate() {
            let line = Line::from(self.title_spans(&MENUS[i], self.open == Some(i)));
            buf.set_line(rect.x, rect.y, &line, rect.width);
        }

        let used = rects.last().map(|r| r.x + r.width).unwrap_or(bar.x);
        let title_len = self.title.chars().count() as u16 + 1;
        let free = (bar.x + bar.width).saturating_sub(used + 2);
        if !self.title.is_empty() && title_len <= free {
            let x = bar.x + bar.width - title_len;
            let style = Style::default().bg(self.theme.menu_bg).fg(self.theme.dim_fg);
            buf.set_string(x, bar.y, self.title, style);
        }
    }
}

/// Width of a dropdown including its border.
fn dropdown_width(menu: &Menu) -> u16 {
    let mut label = 0;
    let mut shortcut = 0;
    for entry in menu.entries {
        if let MenuEntry::Item(cmd) = entry {
            label = label.max(cmd.label().chars().count());
            shortcut = shortcut.max(cmd.shortcut().map(|s| s.chars().count()).unwrap_or(0));
        }
    }
    // border, check column, label, gap, shortcut, padding, border
    (1 + 3 + label + 3 + shortcut + 1 + 1) as u16
}

/// Where the dropdown of `index` lands below its title, clamped to `screen`.
pub fn dropdown_rect(index: usize, bar: Rect, screen: Rect) -> Option<Rect> {
    let menu = MENUS.get(index)?;
    let titles = title_rects(bar);
    let anchor = titles.get(index)?;
    let width = dropdown_width(menu).min(screen.width);
    let height = (menu.entries.len() as u16 + 2).min(screen.height.saturating_sub(1));
    let max_x = (screen.x + screen.width).saturating_sub(width);
    Some(Rect::new(anchor.x.min(max_x), bar.y + 1, width, height))
}

/// An open dropdown menu.
pub struct MenuDropdown<'a> {
    menu: &'a Menu,
    selected: usize,
    theme: &'a ThemeColors,
    checked: &'a [Command],
    disabled: &'a [Command],
}

impl<'a> MenuDropdown<'a> {
    pub fn new(menu: &'a Menu, selected: usize, theme: &'a ThemeColors) -> Self {
        Self {
            menu,
            selected,
            theme,
            checked: &[],
            disabled: &[],
        }
    }

    /// Toggle items currently switched on.
    pub fn checked(mut self, commands: &'a [Command]) -> Self {
        self.checked = commands;
        self
    }

    /// Items drawn dimmed.
    pub fn disabled(mut self, commands: &'a [Command]) -> Self {
        self.disabled = commands;
        self
    }
}

impl<'a> Widget for MenuDropdown<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let base = Style::default().bg(self.theme.menu_bg).fg(self.theme.menu_fg);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(base.fg(self.theme.border_fg))
            .style(base);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        for (row, entry) in self.menu.entries.iter().enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let cmd = match entry {
                MenuEntry::Separator => {
                    let sep = Style::default().bg(self.theme.menu_bg).fg(self.theme.dim_fg);
                    buf.set_string(inner.x, y, "─".repeat(width), sep);
                    continue;
                }
                MenuEntry::Item(cmd) => *cmd,
            };

            let mut style = if row == self.selected {
                Style::default()
                    .bg(self.theme.menu_selected_bg)
                    .fg(self.theme.menu_selected_fg)
            } else {
                base
            };
            if self.disabled.contains(&cmd) {
                style = style.fg(self.theme.dim_fg);
            }

            let check = if cmd.is_toggle() && self.checked.contains(&cmd) {
                " ✓ "
            } else {
                "   "
            };
            let shortcut = cmd.shortcut().unwrap_or("");
            let used = 3 + cmd.label().chars().count() + shortcut.chars().count() + 1;
            let gap = width.saturating_sub(used);
            let text = format!("{check}{}{}{shortcut} ", cmd.label(), " ".repeat(gap));
            buf.set_line(inner.x, y, &Line::from(Span::styled(text, style)), inner.width);
        }
    }
}
