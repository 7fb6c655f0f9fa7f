use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::command::{MenuEntry, MENUS};
use crate::components::dialog::{centered_rect, dialog_frame, render_hint};
use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

const EDITING_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Shift+Arrows",
        description: "Extend selection",
    },
    KeyEntry {
        key: "Shift+Home / End",
        description: "Select to line start / end",
    },
    KeyEntry {
        key: "Ctrl+Shift+Home / End",
        description: "Select to document start / end",
    },
    KeyEntry {
        key: "Backspace / Del",
        description: "Delete before / at cursor",
    },
    KeyEntry {
        key: "Tab",
        description: "Indent to next tab stop",
    },
    KeyEntry {
        key: "Mouse drag",
        description: "Select text",
    },
];

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Arrows",
        description: "Move cursor",
    },
    KeyEntry {
        key: "Home / End",
        description: "Line start / end",
    },
    KeyEntry {
        key: "Ctrl+Home / End",
        description: "Document start / end",
    },
    KeyEntry {
        key: "PgUp / PgDn",
        description: "Page up / down",
    },
    KeyEntry {
        key: "Ctrl+Up / Down",
        description: "Scroll without moving",
    },
    KeyEntry {
        key: "F10 / Alt+letter",
        description: "Open menu",
    },
    KeyEntry {
        key: "Esc",
        description: "Close menu or dialog",
    },
];

/// One row of the shortcut reference, before styling.
enum HelpRow {
    Header(&'static str),
    Entry(&'static str, &'static str),
    Blank,
}

fn menu_section_name(title: &str) -> &'static str {
    match title {
        "File" => "File Operations",
        "Edit" => "Edit Operations",
        "View" => "View Options",
        "Format" => "Text Formatting",
        _ => "Help",
    }
}

/// Menu shortcuts by menu, then editing and navigation keys.
fn shortcut_rows() -> Vec<HelpRow> {
    let mut rows = Vec::new();
    for menu in MENUS {
        let entries: Vec<HelpRow> = menu
            .entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Item(cmd) => cmd
                    .shortcut()
                    .map(|key| HelpRow::Entry(key, cmd.label().trim_end_matches("..."))),
                MenuEntry::Separator => None,
            })
            .collect();
        if entries.is_empty() {
            continue;
        }
        rows.push(HelpRow::Header(menu_section_name(menu.title)));
        rows.extend(entries);
        rows.push(HelpRow::Blank);
    }
    for (name, keys) in [("Editing", EDITING_KEYS), ("Navigation", NAVIGATION_KEYS)] {
        rows.push(HelpRow::Header(name));
        rows.extend(keys.iter().map(|k| HelpRow::Entry(k.key, k.description)));
        rows.push(HelpRow::Blank);
    }
    rows
}

/// Number of scrollable lines in the shortcuts overlay.
pub fn shortcut_line_count() -> usize {
    shortcut_rows().len()
}

/// Keyboard shortcuts overlay.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let header = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        shortcut_rows()
            .into_iter()
            .map(|row| match row {
                HelpRow::Header(name) => Line::from(vec![
                    Span::styled(format!("── {name} "), header),
                    Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
                ]),
                HelpRow::Entry(key, description) => Line::from(vec![
                    Span::styled(
                        format!("  {key:<24}"),
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description, Style::default().fg(self.theme.editor_fg)),
                ]),
                HelpRow::Blank => Line::from(""),
            })
            .collect()
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // 70% width, 80% height, centered
        let overlay_width = ((area.width as f32 * 0.70) as u16).clamp(40.min(area.width), 80);
        let overlay_height = (area.height as f32 * 0.80).min(40.0) as u16;
        let overlay_area = centered_rect(overlay_width, overlay_height, area);

        Clear.render(overlay_area, buf);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);
        if inner.height < 2 {
            return;
        }

        let content_lines = self.build_content_lines();
        // Last row is the footer.
        let visible_height = (inner.height - 1) as usize;
        let max_scroll = content_lines.len().saturating_sub(visible_height);
        let scroll = self.scroll_offset.min(max_scroll);

        for (i, line) in content_lines
            .iter()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }

        let footer = Line::from(Span::styled(
            " [↑↓/PgUp/PgDn] Scroll  [Esc] Close ",
            Style::default().fg(self.theme.dim_fg),
        ));
        buf.set_line(inner.x, inner.y + inner.height - 1, &footer, inner.width);

        if content_lines.len() > visible_height {
            let total = content_lines.len();
            let indicator = format!(" {}/{} ", (scroll + 1).min(total), total);
            let ind_span = Span::styled(indicator, Style::default().fg(self.theme.dim_fg));
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(ind_span.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &ind_span, ind_span.width() as u16);
        }
    }
}

const FEATURES: &[&str] = &[
    "Text editing with undo/redo",
    "Find and replace functionality",
    "File operations (new, open, save)",
    "Text formatting options",
    "Word wrap and line numbers",
    "Character and word count",
];

/// About box: name, version, description and feature list.
pub struct AboutDialog<'a> {
    theme: &'a ThemeColors,
}

impl<'a> AboutDialog<'a> {
    pub fn new(theme: &'a ThemeColors) -> Self {
        Self { theme }
    }
}

impl<'a> Widget for AboutDialog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = FEATURES.len() as u16 + 9;
        let rect = centered_rect(52, height, area);
        let inner = dialog_frame("About", rect, self.theme.dialog_border_fg, self.theme, buf);

        let text = Style::default().fg(self.theme.editor_fg);
        let mut lines = vec![
            Line::from(Span::styled(
                "Notepad",
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Version {}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(self.theme.dim_fg),
            )),
            Line::from(""),
            Line::from(Span::styled("A simple text editor for the terminal.", text)),
            Line::from(""),
            Line::from(Span::styled("Features:", text.add_modifier(Modifier::BOLD))),
        ];
        lines.extend(
            FEATURES
                .iter()
                .map(|f| Line::from(Span::styled(format!("  • {f}"), text))),
        );

        for (i, line) in lines.iter().enumerate() {
            let y = inner.y + i as u16;
            if y + 1 >= inner.y + inner.height {
                break;
            }
            buf.set_line(inner.x, y, line, inner.width);
        }
        render_hint("[Enter/Esc] Close", inner, self.theme, buf);
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
            s.push('\n');
        }
        s
    }

    #[test]
    fn total_lines_is_nonzero() {
        assert!(shortcut_line_count() > 0);
    }

    #[test]
    fn all_categories_have_entries() {
        let rows = shortcut_rows();
        for (i, row) in rows.iter().enumerate() {
            if let HelpRow::Header(name) = row {
                assert!(
                    matches!(rows.get(i + 1), Some(HelpRow::Entry(..))),
                    "Category '{}' has no entries",
                    name
                );
            }
        }
    }

    #[test]
    fn content_lines_match_total() {
        let theme = dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        assert_eq!(overlay.build_content_lines().len(), shortcut_line_count());
    }

    #[test]
    fn sections_follow_the_menus() {
        let headers: Vec<&str> = shortcut_rows()
            .iter()
            .filter_map(|r| match r {
                HelpRow::Header(name) => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(
            headers,
            vec![
                "File Operations",
                "Edit Operations",
                "View Options",
                "Text Formatting",
                "Help",
                "Editing",
                "Navigation",
            ]
        );
    }

    #[test]
    fn overlay_renders_first_section() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains(" Keyboard Shortcuts "));
        assert!(text.contains("File Operations"));
        assert!(text.contains("Ctrl+Shift+S"));
        assert!(text.contains("Save As"));
    }

    #[test]
    fn overlay_scroll_is_clamped() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 10_000).render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains("Navigation") || text.contains("Close menu or dialog"));
        assert!(!text.contains("File Operations"));
    }

    #[test]
    fn about_lists_name_version_and_features() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        AboutDialog::new(&theme).render(area, &mut buf);
        let text = buffer_to_string(&buf, area);
        assert!(text.contains("Notepad"));
        assert!(text.contains(&format!("Version {}", env!("CARGO_PKG_VERSION"))));
        for feature in FEATURES {
            assert!(text.contains(feature), "{feature} missing");
        }
        assert!(text.contains("[Enter/Esc] Close"));
    }
}
