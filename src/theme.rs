//! Theme data model: built-in palettes and resolution from config.
//!
//! The theme system provides two built-in palettes (dark and light) and
//! supports custom color overrides from the config file. The View > Dark Mode
//! toggle switches between the two bases at runtime.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    // Editor area
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub editor_line_nr: Color,
    pub editor_line_nr_current: Color,
    pub editor_gutter_sep: Color,
    pub editor_cursor_fg: Color,
    pub editor_cursor_bg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub find_match_bg: Color,

    // Menu bar and dropdowns
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_selected_bg: Color,
    pub menu_selected_fg: Color,
    pub menu_mnemonic_fg: Color,

    // Toolbar
    pub toolbar_bg: Color,
    pub toolbar_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        editor_bg: Color::Reset,
        editor_fg: Color::Rgb(205, 214, 244), // #cdd6f4 (text)
        editor_line_nr: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)
        editor_line_nr_current: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        editor_gutter_sep: Color::Rgb(69, 71, 90), // #45475a (surface1)
        editor_cursor_fg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        editor_cursor_bg: Color::Rgb(205, 214, 244), // #cdd6f4 (text)
        selection_bg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        selection_fg: Color::Rgb(205, 214, 244),
        find_match_bg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)

        menu_bg: Color::Rgb(24, 24, 37), // #181825 (mantle)
        menu_fg: Color::Rgb(205, 214, 244),
        menu_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        menu_selected_fg: Color::Rgb(205, 214, 244),
        menu_mnemonic_fg: Color::Rgb(250, 179, 135), // #fab387 (peach)

        toolbar_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        toolbar_fg: Color::Rgb(186, 194, 222), // #bac2de (subtext1)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        editor_bg: Color::Reset,
        editor_fg: Color::Rgb(76, 79, 105), // #4c4f69 (text)
        editor_line_nr: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
        editor_line_nr_current: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        editor_gutter_sep: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        editor_cursor_fg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        editor_cursor_bg: Color::Rgb(76, 79, 105), // #4c4f69 (text)
        selection_bg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        selection_fg: Color::Rgb(76, 79, 105),
        find_match_bg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)

        menu_bg: Color::Rgb(230, 233, 239), // #e6e9ef (mantle)
        menu_fg: Color::Rgb(76, 79, 105),
        menu_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        menu_selected_fg: Color::Rgb(76, 79, 105),
        menu_mnemonic_fg: Color::Rgb(254, 100, 11), // #fe640b (peach)

        toolbar_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        toolbar_fg: Color::Rgb(92, 95, 119),   // #5c5f77 (subtext1)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)

        dialog_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Overwrite `slot` with the parsed value of `hex`, if present and valid.
fn override_color(slot: &mut Color, hex: &Option<String>) {
    if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
        *slot = color;
    }
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Whether the configured scheme starts in dark mode.
pub fn starts_dark(config: &ThemeConfig) -> bool {
    config.scheme.as_deref() != Some("light")
}

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    resolve_palette(config, starts_dark(config))
}

/// Resolve the palette for an explicit dark/light choice, keeping any custom
/// overrides when the scheme is `"custom"`.
pub fn resolve_palette(config: &ThemeConfig, dark: bool) -> ThemeColors {
    let mut theme = if dark { dark_theme() } else { light_theme() };
    if config.scheme.as_deref() == Some("custom") {
        if let Some(custom) = &config.custom {
            apply_custom_colors(&mut theme, custom);
        }
    }
    theme
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.editor_bg, &custom.editor_bg);
    override_color(&mut theme.editor_fg, &custom.editor_fg);
    override_color(&mut theme.selection_bg, &custom.selection_bg);
    override_color(&mut theme.menu_bg, &custom.menu_bg);
    override_color(&mut theme.menu_fg, &custom.menu_fg);
    override_color(&mut theme.menu_selected_bg, &custom.menu_selected_bg);
    override_color(&mut theme.menu_selected_fg, &custom.menu_selected_fg);
    override_color(&mut theme.toolbar_bg, &custom.toolbar_bg);
    override_color(&mut theme.toolbar_fg, &custom.toolbar_fg);
    override_color(&mut theme.status_bg, &custom.status_bg);
    override_color(&mut theme.status_fg, &custom.status_fg);
    override_color(&mut theme.border_fg, &custom.border_fg);
    override_color(&mut theme.dialog_bg, &custom.dialog_bg);
    override_color(&mut theme.dialog_border_fg, &custom.dialog_border_fg);
}

// ── Tests ────────────────────────────────────────────────────────────────────
