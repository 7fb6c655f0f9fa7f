//! Editor text formatting: font style and foreground/background colours.

use ratatui::style::{Color, Modifier, Style};

use crate::config::FormatConfig;
use crate::theme::parse_hex_color;

/// Font style choices offered by Format > Font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FontStyle::Regular => "Regular",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
            FontStyle::BoldItalic => "Bold Italic",
        }
    }

    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// Which colour a picker is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Text,
    Background,
}

impl ColorTarget {
    pub fn title(&self) -> &'static str {
        match self {
            ColorTarget::Text => "Text Color",
            ColorTarget::Background => "Background Color",
        }
    }
}

/// Preset entries of the colour picker. `None` restores the theme colour.
pub const PRESET_COLORS: [(&str, Option<Color>); 6] = [
    ("Black", Some(Color::Black)),
    ("White", Some(Color::White)),
    ("Red", Some(Color::Red)),
    ("Blue", Some(Color::Blue)),
    ("Green", Some(Color::Green)),
    ("Default", None),
];

/// Colour names accepted by the custom colour input.
const NAMED_COLORS: [(&str, Color); 16] = [
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
];

/// Parse a colour name (case-insensitive, spaces ignored) or a `#rrggbb`
/// value. Returns `None` for anything else.
pub fn parse_color_input(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        return parse_hex_color(trimmed);
    }
    let key: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    let key = if key == "grey" { "gray".to_string() } else { key };
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
}

/// Style applied to the editor text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextFormat {
    pub bold: bool,
    pub italic: bool,
    /// Text colour, `None` for the theme default.
    pub fg: Option<Color>,
    /// Background colour, `None` for the theme default.
    pub bg: Option<Color>,
}

impl TextFormat {
    /// Build the initial format from config. Unparsable colours are
    /// ignored with a warning.
    pub fn from_config(config: &FormatConfig) -> Self {
        Self {
            bold: config.bold.unwrap_or(false),
            italic: config.italic.unwrap_or(false),
            fg: config_color(config.text_color.as_deref(), "text_color"),
            bg: config_color(config.background_color.as_deref(), "background_color"),
        }
    }

    pub fn font_style(&self) -> FontStyle {
        FontStyle::from_flags(self.bold, self.italic)
    }

    pub fn set_font_style(&mut self, style: FontStyle) {
        self.bold = style.is_bold();
        self.italic = style.is_italic();
    }

    pub fn set_color(&mut self, target: ColorTarget, color: Option<Color>) {
        match target {
            ColorTarget::Text => self.fg = color,
            ColorTarget::Background => self.bg = color,
        }
    }

    pub fn color(&self, target: ColorTarget) -> Option<Color> {
        match target {
            ColorTarget::Text => self.fg,
            ColorTarget::Background => self.bg,
        }
    }

    /// Editor text style on top of the theme's default colours.
    pub fn style(&self, default_fg: Color, default_bg: Color) -> Style {
        let mut style = Style::default()
            .fg(self.fg.unwrap_or(default_fg))
            .bg(self.bg.unwrap_or(default_bg));
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

fn config_color(value: Option<&str>, key: &str) -> Option<Color> {
    let value = value?;
    let parsed = parse_color_input(value);
    if parsed.is_none() {
        tracing::warn!(key, value, "ignoring unrecognised colour in config");
    }
    parsed
}
