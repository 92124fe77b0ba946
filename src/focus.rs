//! Focus-driven speech
//!
//! Every focus change goes through [`FocusPipeline::on_focus`]:
//!
//! ```text
//! Idle -> Extracting -> DebounceCheck -> Speaking | Suppressed -> Idle
//! ```
//!
//! With speech switched off the event returns to idle without extraction. A
//! description is spoken when it differs from the last one spoken, or when the
//! repeat window has passed since then.

use crate::dom::{DomTree, ElementNode};
use crate::extract::TextExtractor;
use crate::speech::SpeechDispatcher;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How long an identical description stays suppressed
pub const REPEAT_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub repeat_window: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repeat_window: REPEAT_WINDOW,
        }
    }
}

/// Per-page speech state; reset on reload
#[derive(Debug, Clone, Default)]
pub struct FocusSpeechState {
    pub last_spoken_text: String,
    pub last_spoken_time: Option<Instant>,
    /// Live copy of the `ttsEnabled` setting, toggled at runtime
    pub tts_enabled: bool,
}

/// What happened to a focus event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Speech is off; nothing was extracted
    Disabled,
    /// Same text as last time, inside the repeat window
    Suppressed(String),
    Spoken(String),
}

pub struct FocusPipeline {
    extractor: TextExtractor,
    dispatcher: Arc<SpeechDispatcher>,
    config: PipelineConfig,
    state: FocusSpeechState,
}

impl FocusPipeline {
    pub fn new(extractor: TextExtractor, dispatcher: Arc<SpeechDispatcher>, tts_enabled: bool) -> Self {
        Self {
            extractor,
            dispatcher,
            config: PipelineConfig::default(),
            state: FocusSpeechState {
                tts_enabled,
                ..Default::default()
            },
        }
    }

    /// Builder method: set the pipeline configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> &FocusSpeechState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Arc<SpeechDispatcher> {
        &self.dispatcher
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn tts_enabled(&self) -> bool {
        self.state.tts_enabled
    }

    pub fn set_tts_enabled(&mut self, enabled: bool) {
        self.state.tts_enabled = enabled;
    }

    /// Flip the live speech switch, silencing anything in progress. Returns the new value.
    pub fn toggle_tts(&mut self) -> bool {
        self.state.tts_enabled = !self.state.tts_enabled;
        self.dispatcher.stop();
        self.state.tts_enabled
    }

    /// Handle focus moving to `element`
    pub async fn on_focus(&mut self, element: &ElementNode, document: &DomTree) -> FocusOutcome {
        debug!("Focus: {}", element.to_simple_string());

        if !self.state.tts_enabled {
            return FocusOutcome::Disabled;
        }

        let text = self.extractor.extract(element, document);
        let now = Instant::now();

        if !self.should_speak(&text, now) {
            debug!("Suppressed repeat: {}", text);
            return FocusOutcome::Suppressed(text);
        }

        // record before dispatching so a focus event raised while speaking sees it
        self.state.last_spoken_text = text.clone();
        self.state.last_spoken_time = Some(now);

        self.dispatcher.speak(&text).await;
        FocusOutcome::Spoken(text)
    }

    fn should_speak(&self, text: &str, now: Instant) -> bool {
        if text != self.state.last_spoken_text {
            return true;
        }

        match self.state.last_spoken_time {
            Some(at) => now.duration_since(at) > self.config.repeat_window,
            None => true,
        }
    }
}
