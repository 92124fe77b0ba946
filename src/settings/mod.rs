//! User settings
//!
//! One [`Settings`] record exists per installation. It is stored under
//! [`SETTINGS_KEY`] with camelCase field names, and a missing record (or missing
//! fields) always reads as the defaults.

pub mod store;

pub use store::{JsonFileBackend, MemoryBackend, SETTINGS_KEY, SettingsStore, StorageBackend};

use serde::{Deserialize, Serialize};

pub const FONT_SCALE_MIN: f32 = 0.8;
pub const FONT_SCALE_MAX: f32 = 2.0;
pub const FONT_SCALE_STEP: f32 = 0.1;

/// Color theme applied to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTheme {
    HighContrast,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    #[default]
    #[serde(other)]
    Default,
}

impl ColorTheme {
    /// Value of the page's `data-theme` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighContrast => "high-contrast",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
        }
    }
}

/// Keyboard shortcuts, as human-readable strings like "Alt+T"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    #[serde(rename = "toggleTTS")]
    pub toggle_tts: String,
    #[serde(rename = "increaseFont")]
    pub increase_font: String,
    #[serde(rename = "decreaseFont")]
    pub decrease_font: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            toggle_tts: "Alt+T".to_string(),
            increase_font: "Alt+Plus".to_string(),
            decrease_font: "Alt+Minus".to_string(),
        }
    }
}

/// The persisted settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Root font size multiplier, within [0.8, 2.0]
    pub font_scale: f32,
    pub color_theme: ColorTheme,
    pub highlight_links: bool,
    pub tts_enabled: bool,
    pub keyboard_nav: bool,
    pub shortcuts: Shortcuts,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_scale: 1.0,
            color_theme: ColorTheme::Default,
            highlight_links: true,
            tts_enabled: true,
            keyboard_nav: true,
            shortcuts: Shortcuts::default(),
        }
    }
}

fn clamp_font_scale(scale: f32) -> f32 {
    let scale = if scale.is_finite() { scale } else { 1.0 };
    // keep one decimal so repeated steps don't drift
    ((scale * 10.0).round() / 10.0).clamp(FONT_SCALE_MIN, FONT_SCALE_MAX)
}

impl Settings {
    /// Set the font scale, clamped to the allowed range
    pub fn set_font_scale(&mut self, scale: f32) -> f32 {
        self.font_scale = clamp_font_scale(scale);
        self.font_scale
    }

    /// One step larger, up to the maximum
    pub fn increase_font(&mut self) -> f32 {
        self.set_font_scale(self.font_scale + FONT_SCALE_STEP)
    }

    /// One step smaller, down to the minimum
    pub fn decrease_font(&mut self) -> f32 {
        self.set_font_scale(self.font_scale - FONT_SCALE_STEP)
    }

    /// Merge a partial update over this record
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(scale) = patch.font_scale {
            self.set_font_scale(scale);
        }
        if let Some(theme) = patch.color_theme {
            self.color_theme = theme;
        }
        if let Some(on) = patch.highlight_links {
            self.highlight_links = on;
        }
        if let Some(on) = patch.tts_enabled {
            self.tts_enabled = on;
        }
        if let Some(on) = patch.keyboard_nav {
            self.keyboard_nav = on;
        }
        if let Some(shortcuts) = &patch.shortcuts {
            self.shortcuts = shortcuts.clone();
        }
    }
}

/// Partial settings update, as carried by `settings:update`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_theme: Option<ColorTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_nav: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Shortcuts>,
}

impl SettingsPatch {
    pub fn font_scale(scale: f32) -> Self {
        Self {
            font_scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn color_theme(theme: ColorTheme) -> Self {
        Self {
            color_theme: Some(theme),
            ..Default::default()
        }
    }

    pub fn tts_enabled(on: bool) -> Self {
        Self {
            tts_enabled: Some(on),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        Self {
            font_scale: Some(settings.font_scale),
            color_theme: Some(settings.color_theme),
            highlight_links: Some(settings.highlight_links),
            tts_enabled: Some(settings.tts_enabled),
            keyboard_nav: Some(settings.keyboard_nav),
            shortcuts: Some(settings.shortcuts.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.font_scale, 1.0);
        assert_eq!(settings.color_theme, ColorTheme::Default);
        assert!(settings.tts_enabled);
        assert!(settings.keyboard_nav);
        assert_eq!(settings.shortcuts.toggle_tts, "Alt+T");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["fontScale"], 1.0);
        assert_eq!(json["colorTheme"], "default");
        assert_eq!(json["highlightLinks"], true);
        assert_eq!(json["shortcuts"]["toggleTTS"], "Alt+T");
        assert_eq!(json["shortcuts"]["increaseFont"], "Alt+Plus");
    }

    #[test]
    fn test_partial_record_reads_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"colorTheme": "high-contrast", "ttsEnabled": false}"#).unwrap();
        assert_eq!(settings.color_theme, ColorTheme::HighContrast);
        assert!(!settings.tts_enabled);
        assert_eq!(settings.font_scale, 1.0);
        assert_eq!(settings.shortcuts, Shortcuts::default());
    }

    #[test]
    fn test_unknown_theme_reads_as_default() {
        let settings: Settings = serde_json::from_str(r#"{"colorTheme": "sepia"}"#).unwrap();
        assert_eq!(settings.color_theme, ColorTheme::Default);
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(serde_json::to_string(&ColorTheme::Default).unwrap(), "\"default\"");
        let theme: ColorTheme = serde_json::from_str("\"high-contrast\"").unwrap();
        assert_eq!(theme, ColorTheme::HighContrast);
        let theme: ColorTheme = serde_json::from_str("\"tritanopia\"").unwrap();
        assert_eq!(theme, ColorTheme::Tritanopia);
    }

    #[test]
    fn test_font_steps_clamp() {
        let mut settings = Settings::default();
        assert_eq!(settings.increase_font(), 1.1);
        for _ in 0..20 {
            settings.increase_font();
        }
        assert_eq!(settings.font_scale, FONT_SCALE_MAX);

        for _ in 0..20 {
            settings.decrease_font();
        }
        assert_eq!(settings.font_scale, FONT_SCALE_MIN);

        assert_eq!(settings.set_font_scale(f32::NAN), 1.0);
    }

    #[test]
    fn test_apply_patch() {
        let mut settings = Settings::default();
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"fontScale": 5.0, "highlightLinks": false}"#).unwrap();

        settings.apply(&patch);

        assert_eq!(settings.font_scale, FONT_SCALE_MAX);
        assert!(!settings.highlight_links);
        assert!(settings.tts_enabled);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let json = serde_json::to_string(&SettingsPatch::tts_enabled(false)).unwrap();
        assert_eq!(json, r#"{"ttsEnabled":false}"#);
        assert!(SettingsPatch::default().is_empty());
        assert!(!SettingsPatch::from(&Settings::default()).is_empty());
    }
}
