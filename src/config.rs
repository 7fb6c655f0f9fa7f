//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--no-wrap`, `--theme`, etc.)
//! 2. `$NOTEPAD_TUI_CONFIG` environment variable (path to config file)
//! 3. Project-local `.notepad-tui.toml` in the current working directory
//! 4. Global `~/.config/notepad-tui/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Number of spaces inserted by Tab.
    pub tab_width: Option<usize>,
    /// Ask before discarding unsaved changes.
    pub confirm_discard: Option<bool>,
}

/// Initial state of the View menu toggles.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewConfig {
    pub word_wrap: Option<bool>,
    pub line_numbers: Option<bool>,
    pub status_bar: Option<bool>,
}

/// Initial text format of the editor.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FormatConfig {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Colour name or `#rrggbb`.
    pub text_color: Option<String>,
    /// Colour name or `#rrggbb`.
    pub background_color: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub editor_bg: Option<String>,
    pub editor_fg: Option<String>,
    pub selection_bg: Option<String>,
    pub menu_bg: Option<String>,
    pub menu_fg: Option<String>,
    pub menu_selected_bg: Option<String>,
    pub menu_selected_fg: Option<String>,
    pub toolbar_bg: Option<String>,
    pub toolbar_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log file settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. "debug".
    pub level: Option<String>,
    /// Directory that receives `notepad.log`.
    pub dir: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub view: ViewConfig,
    pub format: FormatConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default number of spaces per Tab press.
pub const DEFAULT_TAB_WIDTH: usize = 4;
/// Default log filter when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Name of the per-user directory under the platform config/cache dirs.
pub const APP_DIR_NAME: &str = "notepad-tui";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("NOTEPAD_TUI_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".notepad-tui.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR_NAME).join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            tracing::warn!(file = %path.display(), error = %e, "config_parse_failed");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: other.general.mouse.or(self.general.mouse),
                tab_width: other.general.tab_width.or(self.general.tab_width),
                confirm_discard: other
                    .general
                    .confirm_discard
                    .or(self.general.confirm_discard),
            },
            view: ViewConfig {
                word_wrap: other.view.word_wrap.or(self.view.word_wrap),
                line_numbers: other.view.line_numbers.or(self.view.line_numbers),
                status_bar: other.view.status_bar.or(self.view.status_bar),
            },
            format: FormatConfig {
                bold: other.format.bold.or(self.format.bold),
                italic: other.format.italic.or(self.format.italic),
                text_color: other.format.text_color.clone().or(self.format.text_color),
                background_color: other
                    .format
                    .background_color
                    .clone()
                    .or(self.format.background_color),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                dir: other.log.dir.clone().or(self.log.dir),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Spaces per Tab press, never zero.
    pub fn tab_width(&self) -> usize {
        self.general.tab_width.unwrap_or(DEFAULT_TAB_WIDTH).max(1)
    }

    /// Whether New/Open/Close ask before discarding changes.
    pub fn confirm_discard(&self) -> bool {
        self.general.confirm_discard.unwrap_or(true)
    }

    pub fn word_wrap(&self) -> bool {
        self.view.word_wrap.unwrap_or(true)
    }

    pub fn line_numbers(&self) -> bool {
        self.view.line_numbers.unwrap_or(false)
    }

    pub fn status_bar(&self) -> bool {
        self.view.status_bar.unwrap_or(true)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    /// Log filter directive.
    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Directory for the log file: configured, else the platform cache dir,
    /// else the working directory.
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.log.dir {
            return PathBuf::from(dir);
        }
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.tab_width(), 4);
        assert!(cfg.confirm_discard());
        assert!(cfg.word_wrap());
        assert!(!cfg.line_numbers());
        assert!(cfg.status_bar());
        assert_eq!(cfg.theme_scheme(), "dark");
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r##"
[general]
mouse = false
tab_width = 8
confirm_discard = false

[view]
word_wrap = false
line_numbers = true
status_bar = false

[format]
bold = true
italic = true
text_color = "red"
background_color = "#000000"

[theme]
scheme = "light"

[log]
level = "debug"
dir = "/tmp/notepad-logs"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.tab_width(), 8);
        assert!(!cfg.confirm_discard());
        assert!(!cfg.word_wrap());
        assert!(cfg.line_numbers());
        assert!(!cfg.status_bar());
        assert_eq!(cfg.format.bold, Some(true));
        assert_eq!(cfg.format.text_color.as_deref(), Some("red"));
        assert_eq!(cfg.format.background_color.as_deref(), Some("#000000"));
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/notepad-logs"));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[view]
line_numbers = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.line_numbers());
        // Everything else should be defaults
        assert!(cfg.word_wrap());
        assert_eq!(cfg.tab_width(), 4);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(cfg.confirm_discard());
        assert!(cfg.format.text_color.is_none());
    }

    #[test]
    fn test_zero_tab_width_is_clamped() {
        let cfg: AppConfig = toml::from_str("[general]\ntab_width = 0").expect("parse failed");
        assert_eq!(cfg.tab_width(), 1);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                tab_width: Some(2),
                confirm_discard: Some(false),
                ..Default::default()
            },
            view: ViewConfig {
                word_wrap: Some(false),
                line_numbers: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                tab_width: Some(8),
                ..Default::default()
            },
            view: ViewConfig {
                word_wrap: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.tab_width(), 8); // overridden
        assert!(!merged.confirm_discard()); // from base
        assert!(merged.word_wrap()); // overridden
        assert!(merged.line_numbers()); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            log: LogConfig {
                level: Some("trace".into()),
                dir: Some("/var/log/np".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.log_level(), "trace");
        assert_eq!(merged.log_dir(), PathBuf::from("/var/log/np"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
tab_width = 2

[format]
italic = true
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.tab_width(), 2);
        assert_eq!(cfg.format.italic, Some(true));
        // Unset fields fall through to defaults
        assert!(cfg.status_bar());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[view]
word_wrap = true
line_numbers = true
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            view: ViewConfig {
                word_wrap: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        // CLI override wins
        assert!(!cfg.word_wrap());
        // File value preserved (not overridden by CLI)
        assert!(cfg.line_numbers());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
editor_bg = "#1a1b26"
editor_fg = "#c0caf5"
border_fg = "#565f89"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.editor_bg.as_deref(), Some("#1a1b26"));
        assert_eq!(custom.editor_fg.as_deref(), Some("#c0caf5"));
        assert_eq!(custom.border_fg.as_deref(), Some("#565f89"));
        // Unset custom colors are None
        assert!(custom.dialog_bg.is_none());
    }
}
