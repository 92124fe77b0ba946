//! Speech output
//!
//! The [`SpeechDispatcher`] drives a primary [`SpeechEngine`] and falls back to a
//! [`FallbackChannel`] (a host-mediated speak request) when the engine cannot
//! deliver. Both are injected, so pages, the CLI and tests plug in their own.

pub mod console;
pub mod dispatcher;
pub mod voice;

pub use console::ConsoleEngine;
pub use dispatcher::{DispatcherConfig, SpeechDispatcher};
pub use voice::select_voice;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A voice offered by a speech engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,

    /// BCP 47 language tag, e.g. "es-ES"
    pub lang: String,

    /// Synthesised on the device rather than by a remote service
    #[serde(default)]
    pub local_service: bool,

    /// Marked by the engine as its default voice
    #[serde(default)]
    pub default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            local_service: false,
            default: false,
        }
    }

    /// Builder method: mark as a local voice
    pub fn local(mut self) -> Self {
        self.local_service = true;
        self
    }

    /// Builder method: mark as the engine default
    pub fn engine_default(mut self) -> Self {
        self.default = true;
        self
    }
}

/// One request to speak
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// Utterance with normal rate, pitch and volume
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.voice = voice;
        self
    }
}

/// Failure reported by a speech engine for an utterance
///
/// Codes follow the Web Speech API `SpeechSynthesisErrorEvent.error` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisErrorKind {
    NotAllowed,
    AudioBusy,
    Interrupted,
    Canceled,
    SynthesisFailed,
    SynthesisUnavailable,
    LanguageUnavailable,
    VoiceUnavailable,
    TextTooLong,
    Network,
    #[serde(other)]
    Unknown,
}

/// How the dispatcher recovers from a [`SynthesisErrorKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Needs a user gesture before audio may play
    Permission,
    /// Cancelled by navigation or a newer utterance; ignored
    Transient,
    /// The engine cannot speak this; use the fallback channel
    Unavailable,
    /// Retry once with a shorter text
    ContentTooLong,
    /// Retry once after a short delay
    Network,
    /// Unrecognised; use the fallback channel
    Unknown,
}

impl SynthesisErrorKind {
    /// Parse an engine error code; unknown codes map to [`SynthesisErrorKind::Unknown`]
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" => Self::NotAllowed,
            "audio-busy" => Self::AudioBusy,
            "interrupted" => Self::Interrupted,
            "canceled" => Self::Canceled,
            "synthesis-failed" => Self::SynthesisFailed,
            "synthesis-unavailable" => Self::SynthesisUnavailable,
            "language-unavailable" => Self::LanguageUnavailable,
            "voice-unavailable" => Self::VoiceUnavailable,
            "text-too-long" => Self::TextTooLong,
            "network" => Self::Network,
            _ => Self::Unknown,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::NotAllowed => "not-allowed",
            Self::AudioBusy => "audio-busy",
            Self::Interrupted => "interrupted",
            Self::Canceled => "canceled",
            Self::SynthesisFailed => "synthesis-failed",
            Self::SynthesisUnavailable => "synthesis-unavailable",
            Self::LanguageUnavailable => "language-unavailable",
            Self::VoiceUnavailable => "voice-unavailable",
            Self::TextTooLong => "text-too-long",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::NotAllowed | Self::AudioBusy => FailureClass::Permission,
            Self::Interrupted | Self::Canceled => FailureClass::Transient,
            Self::SynthesisFailed
            | Self::SynthesisUnavailable
            | Self::LanguageUnavailable
            | Self::VoiceUnavailable => FailureClass::Unavailable,
            Self::TextTooLong => FailureClass::ContentTooLong,
            Self::Network => FailureClass::Network,
            Self::Unknown => FailureClass::Unknown,
        }
    }
}

impl fmt::Display for SynthesisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Primary speech engine (the page's speech synthesis)
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine name, for logs
    fn name(&self) -> &str;

    /// Whether speech synthesis exists at all in this context
    fn is_available(&self) -> bool;

    /// Current voice catalog; may be empty while it loads
    fn voices(&self) -> Vec<Voice>;

    /// Resolves when the voice catalog changes
    async fn voices_changed(&self);

    /// Whether audio may play without a user gesture
    async fn probe_audio(&self) -> Result<bool>;

    /// Unlock audio in response to a user gesture
    async fn unlock_audio(&self) -> Result<()>;

    fn is_speaking(&self) -> bool;

    /// Submit an utterance. Resolves once it has started, or with the failure
    /// the engine reported for it.
    async fn speak(&self, utterance: Utterance) -> std::result::Result<(), SynthesisErrorKind>;

    fn cancel(&self);

    fn pause(&self);

    fn resume(&self);
}

/// Secondary delivery channel, fire-and-forget
#[async_trait]
pub trait FallbackChannel: Send + Sync {
    async fn speak(&self, text: &str, lang: &str);

    async fn stop(&self);
}

/// Language for speech: the page's declared tag, else the browser's, else Spanish
pub fn resolve_language(page: Option<&str>, browser: Option<&str>) -> String {
    [page, browser]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|tag| !tag.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

/// Language used when neither the page nor the browser declares one
pub const DEFAULT_LANGUAGE: &str = "es-ES";
