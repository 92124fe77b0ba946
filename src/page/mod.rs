//! Page-side collaborators
//!
//! The content logic never touches the DOM directly; styling, injection and
//! transient notices go through [`PageAdapter`] and [`Overlay`].

pub mod agent;

pub use agent::ContentAgent;

use crate::settings::ColorTheme;
use std::time::Duration;

/// Stylesheets injected into every page
pub const STYLESHEETS: [&str; 3] = [
    "content/styles/themes.css",
    "content/styles/links-highlight.css",
    "content/styles/floating-widget.css",
];

/// Id of the "skip to content" link
pub const SKIP_LINK_ID: &str = "wau-skip";

/// DOM mutations the content logic performs on the host page
pub trait PageAdapter: Send + Sync {
    /// Set the root font size, in rem
    fn apply_font_scale(&self, scale: f32);

    fn apply_theme(&self, theme: ColorTheme);

    fn apply_highlight_links(&self, enabled: bool);

    /// Add a stylesheet link for an extension file
    fn inject_stylesheet(&self, path: &str);

    /// Insert the "skip to content" link unless an element with
    /// [`SKIP_LINK_ID`] already exists
    fn inject_skip_link(&self);

    /// Smoothly scroll the focused element to the middle of the viewport
    fn scroll_focused_into_view(&self);
}

/// Transient on-page message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Ask for a click so audio can play
    AudioUnlock,
    /// Confirms a speech on/off toggle
    SpeechToggled { enabled: bool },
}

impl Notice {
    /// Element id the overlay should use, so a notice can be found and removed
    pub fn id(&self) -> &'static str {
        match self {
            Self::AudioUnlock => "wau-tts-notification",
            Self::SpeechToggled { .. } => "wau-tts-toggle-feedback",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::AudioUnlock => "🔊 Haz clic en cualquier parte de la página para activar la lectura por voz",
            Self::SpeechToggled { enabled: true } => "🔊 TTS Activado",
            Self::SpeechToggled { enabled: false } => "🔇 TTS Desactivado",
        }
    }

    /// How long the notice stays on screen
    pub fn auto_dismiss(&self) -> Duration {
        match self {
            Self::AudioUnlock => Duration::from_secs(5),
            Self::SpeechToggled { .. } => Duration::from_secs(2),
        }
    }
}

/// Shows and removes [`Notice`]s; auto-dismissal is the overlay's job
pub trait Overlay: Send + Sync {
    fn show(&self, notice: &Notice);

    fn dismiss(&self, notice: &Notice);
}

/// Overlay that writes notices to the log, for headless runs
#[derive(Debug, Default)]
pub struct LogOverlay;

impl Overlay for LogOverlay {
    fn show(&self, notice: &Notice) {
        log::info!("[{}] {}", notice.id(), notice.message());
    }

    fn dismiss(&self, notice: &Notice) {
        log::debug!("[{}] dismissed", notice.id());
    }
}
