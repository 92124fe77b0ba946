use crate::error::Result;
use crate::extract::truncate_chars;
use crate::relay::{Ack, Message};
use crate::settings::SettingsStore;
use crate::speech::DEFAULT_LANGUAGE;
use async_trait::async_trait;
use log::{debug, error, info};
use std::sync::Arc;

/// Speech available to the host process (the extension's own TTS)
#[async_trait]
pub trait HostSpeech: Send + Sync {
    /// Speak, replacing anything queued
    async fn speak(&self, text: &str, lang: &str) -> Result<()>;

    async fn stop(&self) -> Result<()>;
}

/// The background host: owns settings storage and host-mediated speech
pub struct HostRelay {
    store: SettingsStore,
    speech: Arc<dyn HostSpeech>,
}

impl HostRelay {
    pub fn new(store: SettingsStore, speech: Arc<dyn HostSpeech>) -> Self {
        Self { store, speech }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// First-install hook: seed the default settings if none exist
    pub async fn on_installed(&self) -> Result<bool> {
        self.store.ensure_defaults().await
    }

    /// Answer one message. Failures are reported in the [`Ack`], never raised.
    pub async fn handle(&self, message: Message) -> Ack {
        debug!("Host received {}", message.kind());

        match message {
            Message::StorageGet => match self.store.get().await {
                Ok(settings) => match serde_json::to_value(settings) {
                    Ok(value) => Ack::ok_with(value),
                    Err(e) => Ack::error(e.to_string()),
                },
                Err(e) => Ack::error(e.to_string()),
            },
            Message::StorageSet { value } => match self.store.set(&value).await {
                Ok(()) => Ack::ok(),
                Err(e) => Ack::error(e.to_string()),
            },
            Message::TtsSpeak { text, lang } => {
                let lang = lang
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
                info!("Host speech request: {}", truncate_chars(&text, 50));

                match self.speech.speak(&text, &lang).await {
                    Ok(()) => Ack::ok(),
                    Err(e) => {
                        error!("Host speech failed: {}", e);
                        Ack::error(e.to_string())
                    }
                }
            }
            Message::TtsStop => match self.speech.stop().await {
                Ok(()) => Ack::ok(),
                Err(e) => {
                    error!("Host speech stop failed: {}", e);
                    Ack::error(e.to_string())
                }
            },
            Message::ToggleFeature => Ack::ok(),
            Message::SettingsUpdate { .. } => Ack::error("settings:update is handled by pages, not the host"),
        }
    }
}
