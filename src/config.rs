use crate::error::ConfigError;
use crate::render::FormatHint;
use crate::style::Color;
use crate::theme::{Theme, ThemeName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub render: RenderConfig,

    /// Per-token colour overrides applied on top of the selected theme
    #[serde(default)]
    pub theme: CustomThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    ThemeName::default().to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Format to assume for untagged input; detected from the content when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<FormatHint>,
}

/// Custom theme color overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_text: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_background: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_bar: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_header_background: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_border: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_marker: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_marker: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<f32>,
}

impl CustomThemeConfig {
    /// Overlay every override that resolves to a colour onto `theme`.
    pub fn apply(&self, theme: &mut Theme) {
        let overrides = [
            (&self.text, &mut theme.text),
            (&self.secondary_text, &mut theme.secondary_text),
            (&self.accent, &mut theme.accent),
            (&self.code_text, &mut theme.code_text),
            (&self.code_background, &mut theme.code_background),
            (&self.quote_bar, &mut theme.quote_bar),
            (&self.table_header_background, &mut theme.table_header_background),
            (&self.table_border, &mut theme.table_border),
            (&self.rule, &mut theme.rule),
            (&self.list_marker, &mut theme.list_marker),
            (&self.checked_marker, &mut theme.checked_marker),
        ];
        for (value, slot) in overrides {
            if let Some(color) = value.as_ref().and_then(ColorValue::to_color) {
                *slot = color;
            }
        }

        if let Some(size) = self.body_size.filter(|s| *s > 0.0) {
            theme.body_size = size;
        }
        if let Some(size) = self.code_size.filter(|s| *s > 0.0) {
            theme.code_size = size;
        }
    }
}

/// Color value that can be specified in multiple formats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Named color (e.g., "Red", "Blue") or hex ("#0a84ff")
    Named(String),
    /// RGB color { rgb = [r, g, b] }
    Rgb { rgb: [u8; 3] },
}

impl ColorValue {
    pub fn to_color(&self) -> Option<Color> {
        match self {
            ColorValue::Named(name) if name.starts_with('#') => Color::from_hex(name),
            ColorValue::Named(name) => match name.to_lowercase().as_str() {
                "black" => Some(Color::rgb(0, 0, 0)),
                "white" => Some(Color::rgb(255, 255, 255)),
                "red" => Some(Color::rgb(255, 59, 48)),
                "orange" => Some(Color::rgb(255, 149, 0)),
                "yellow" => Some(Color::rgb(255, 204, 0)),
                "green" => Some(Color::rgb(52, 199, 89)),
                "blue" => Some(Color::rgb(0, 122, 255)),
                "purple" => Some(Color::rgb(175, 82, 222)),
                "gray" | "grey" => Some(Color::rgb(142, 142, 147)),
                _ => None,
            },
            ColorValue::Rgb { rgb } => Some(Color::rgb(rgb[0], rgb[1], rgb[2])),
        }
    }
}

impl Config {
    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/kbrender/config.toml
    /// - Linux: ~/.config/kbrender/config.toml
    /// - Windows: %APPDATA%/kbrender/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kbrender").join("config.toml"))
    }

    /// Load config from the default location, or return defaults if it is
    /// missing or unreadable
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| match Self::load_from(&path) {
                Ok(config) => Some(config),
                Err(err) => {
                    if path.exists() {
                        tracing::warn!(error = %err, "ignoring config file");
                    }
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)
    }

    /// Parse theme name from string, falling back to the default preset
    pub fn theme_name(&self) -> ThemeName {
        self.ui.theme.parse().unwrap_or_default()
    }

    /// The effective theme: the named preset with overrides applied
    pub fn theme(&self) -> Theme {
        let mut theme = Theme::from_name(self.theme_name());
        self.theme.apply(&mut theme);
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme_name(), ThemeName::Light);
        assert_eq!(config.render.default_format, None);
        assert_eq!(config.theme(), Theme::light());
    }

    #[test]
    fn test_overrides_apply_to_named_theme() {
        let config: Config = toml::from_str(
            r##"
            [ui]
            theme = "Dark"

            [render]
            default_format = "markdown"

            [theme]
            accent = "#ff2d55"
            code_background = { rgb = [1, 2, 3] }
            rule = "green"
            quote_bar = "not-a-color"
            body_size = 18.0
            "##,
        )
        .unwrap();

        let theme = config.theme();
        let dark = Theme::dark();
        assert_eq!(theme.accent, Color::rgb(0xff, 0x2d, 0x55));
        assert_eq!(theme.code_background, Color::rgb(1, 2, 3));
        assert_eq!(theme.rule, Color::rgb(52, 199, 89));
        assert_eq!(theme.quote_bar, dark.quote_bar);
        assert_eq!(theme.text, dark.text);
        assert_eq!(theme.body_size, 18.0);
        assert_eq!(config.render.default_format, Some(FormatHint::Markdown));
    }

    #[test]
    fn test_unknown_theme_name_falls_back() {
        let mut config = Config::default();
        config.ui.theme = "Solarized".to_string();
        assert_eq!(config.theme_name(), ThemeName::Light);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.theme = ThemeName::Dark.to_string();
        config.theme.accent = Some(ColorValue::Named("#123456".to_string()));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme_name(), ThemeName::Dark);
        assert_eq!(loaded.theme().accent, Color::rgb(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load_from(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[ui\ntheme = ").unwrap();
        assert!(matches!(Config::load_from(&broken), Err(ConfigError::Parse { .. })));
    }
}
