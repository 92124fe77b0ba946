use crate::error::Result;
use crate::relay::{Message, MessageBus};
use crate::settings::{Settings, SettingsPatch, SettingsStore};
use log::{info, warn};
use std::sync::Arc;

/// Settings editing as done by the popup, options page and floating widget
///
/// Every change is a read-modify-write of the stored record followed by a
/// `settings:update` pushed to the page, so open pages restyle without reload.
pub struct SettingsEditor {
    store: SettingsStore,
    page: Option<Arc<dyn MessageBus>>,
}

impl SettingsEditor {
    pub fn new(store: SettingsStore) -> Self {
        Self { store, page: None }
    }

    /// Builder method: push each change to this page
    pub fn with_page(mut self, page: Arc<dyn MessageBus>) -> Self {
        self.page = Some(page);
        self
    }

    pub async fn load(&self) -> Result<Settings> {
        self.store.get().await
    }

    /// Merge `patch` into the stored record and notify the page
    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut settings = self.store.get().await?;
        settings.apply(&patch);
        self.store.set(&settings).await?;

        // the page sees the clamped value, not the requested one
        let mut pushed = patch;
        if pushed.font_scale.is_some() {
            pushed.font_scale = Some(settings.font_scale);
        }
        self.notify(pushed).await;
        Ok(settings)
    }

    pub async fn increase_font(&self) -> Result<f32> {
        let mut settings = self.store.get().await?;
        let scale = settings.increase_font();
        self.update(SettingsPatch::font_scale(scale)).await?;
        Ok(scale)
    }

    pub async fn decrease_font(&self) -> Result<f32> {
        let mut settings = self.store.get().await?;
        let scale = settings.decrease_font();
        self.update(SettingsPatch::font_scale(scale)).await?;
        Ok(scale)
    }

    /// Restore the defaults and push the whole record
    pub async fn reset(&self) -> Result<Settings> {
        let defaults = self.store.reset().await?;
        info!("Settings reset to defaults");
        self.notify(SettingsPatch::from(&defaults)).await;
        Ok(defaults)
    }

    async fn notify(&self, patch: SettingsPatch) {
        let Some(page) = &self.page else {
            return;
        };

        match page.send(Message::SettingsUpdate { value: patch }).await {
            Ok(ack) if !ack.ok => warn!("Page refused settings update: {:?}", ack.error),
            Ok(_) => {}
            // no page listening is normal (e.g. a browser-internal tab)
            Err(e) => warn!("Settings update not delivered: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::ChannelBus;
    use crate::settings::{ColorTheme, FONT_SCALE_MAX};

    #[tokio::test]
    async fn test_update_persists_and_pushes_patch() {
        let store = SettingsStore::in_memory();
        let (bus, mut rx) = ChannelBus::new();
        let editor = SettingsEditor::new(store.clone()).with_page(Arc::new(bus));

        let settings = editor
            .update(SettingsPatch::color_theme(ColorTheme::Protanopia))
            .await
            .unwrap();

        assert_eq!(settings.color_theme, ColorTheme::Protanopia);
        assert_eq!(store.get().await.unwrap().color_theme, ColorTheme::Protanopia);
        assert_eq!(
            rx.recv().await,
            Some(Message::SettingsUpdate {
                value: SettingsPatch::color_theme(ColorTheme::Protanopia)
            })
        );
    }

    #[tokio::test]
    async fn test_font_steps_clamp_and_push_stored_value() {
        let store = SettingsStore::in_memory();
        let (bus, mut rx) = ChannelBus::new();
        let editor = SettingsEditor::new(store.clone()).with_page(Arc::new(bus));

        assert_eq!(editor.increase_font().await.unwrap(), 1.1);
        assert_eq!(
            rx.recv().await,
            Some(Message::SettingsUpdate {
                value: SettingsPatch::font_scale(1.1)
            })
        );

        editor.update(SettingsPatch::font_scale(9.0)).await.unwrap();
        assert_eq!(
            rx.recv().await,
            Some(Message::SettingsUpdate {
                value: SettingsPatch::font_scale(FONT_SCALE_MAX)
            })
        );
        assert_eq!(editor.increase_font().await.unwrap(), FONT_SCALE_MAX);
        assert_eq!(editor.decrease_font().await.unwrap(), 1.9);
    }

    #[tokio::test]
    async fn test_reset_pushes_everything() {
        let store = SettingsStore::in_memory();
        let (bus, mut rx) = ChannelBus::new();
        let editor = SettingsEditor::new(store).with_page(Arc::new(bus));

        editor.update(SettingsPatch::tts_enabled(false)).await.unwrap();
        rx.recv().await;

        assert_eq!(editor.reset().await.unwrap(), Settings::default());
        assert_eq!(
            rx.recv().await,
            Some(Message::SettingsUpdate {
                value: SettingsPatch::from(&Settings::default())
            })
        );
    }

    #[tokio::test]
    async fn test_missing_page_is_not_an_error() {
        let (bus, rx) = ChannelBus::new();
        drop(rx);
        let editor = SettingsEditor::new(SettingsStore::in_memory()).with_page(Arc::new(bus));

        let settings = editor.update(SettingsPatch::tts_enabled(false)).await.unwrap();
        assert!(!settings.tts_enabled);
        assert!(!editor.load().await.unwrap().tts_enabled);
    }
}
