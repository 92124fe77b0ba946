use crate::dom::{DomTree, ElementNode};
use crate::focus::{FocusOutcome, FocusPipeline};
use crate::keyboard::{KeyCommand, KeyEvent, KeyOutcome, KeyboardNavigator, ShortcutAction, ShortcutMap};
use crate::page::{Notice, Overlay, PageAdapter, STYLESHEETS};
use crate::relay::{Ack, Message};
use crate::settings::{Settings, SettingsStore};
use crate::speech::resolve_language;
use log::{debug, info, warn};
use std::sync::Arc;

/// Mutation records in one batch above which the theme is re-applied
pub const MUTATION_BURST: usize = 50;

/// Content logic running inside one page
///
/// Owns the page's copy of the settings, the focus pipeline and the keyboard
/// router. All DOM effects go through the [`PageAdapter`].
pub struct ContentAgent {
    settings: Settings,
    store: SettingsStore,
    pipeline: FocusPipeline,
    keyboard: KeyboardNavigator,
    page: Arc<dyn PageAdapter>,
    overlay: Arc<dyn Overlay>,
}

impl ContentAgent {
    pub fn new(
        store: SettingsStore,
        pipeline: FocusPipeline,
        page: Arc<dyn PageAdapter>,
        overlay: Arc<dyn Overlay>,
    ) -> Self {
        Self {
            settings: Settings::default(),
            store,
            pipeline,
            keyboard: KeyboardNavigator::default(),
            page,
            overlay,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pipeline(&self) -> &FocusPipeline {
        &self.pipeline
    }

    /// Page load: inject assets, load the settings and apply them
    pub async fn start(&mut self, document: &DomTree) {
        for stylesheet in STYLESHEETS {
            self.page.inject_stylesheet(stylesheet);
        }
        self.page.inject_skip_link();

        self.settings = match self.store.get().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not load settings, using defaults: {}", e);
                Settings::default()
            }
        };

        let lang = resolve_language(document.lang.as_deref(), document.browser_lang.as_deref());
        self.pipeline.dispatcher().set_language(lang.as_str());
        self.pipeline.set_tts_enabled(self.settings.tts_enabled);
        self.keyboard
            .set_shortcuts(ShortcutMap::from_settings(&self.settings.shortcuts));
        self.apply_settings();

        info!("Content logic started (lang {}, speech {})", lang, self.settings.tts_enabled);
    }

    fn apply_settings(&self) {
        self.page.apply_font_scale(self.settings.font_scale);
        self.page.apply_theme(self.settings.color_theme);
        self.page.apply_highlight_links(self.settings.highlight_links);
    }

    pub async fn on_focus(&mut self, element: &ElementNode, document: &DomTree) -> FocusOutcome {
        self.pipeline.on_focus(element, document).await
    }

    /// Route a key press. Ignored entirely while keyboard navigation is off.
    pub async fn on_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if !self.settings.keyboard_nav {
            return KeyOutcome::default();
        }

        let outcome = self.keyboard.handle(event);
        for command in &outcome.commands {
            match command {
                KeyCommand::ScrollFocusedIntoView => self.page.scroll_focused_into_view(),
                KeyCommand::Action(action) => self.run(*action).await,
            }
        }
        outcome
    }

    async fn run(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::ToggleSpeech => {
                let enabled = self.pipeline.toggle_tts();
                self.settings.tts_enabled = enabled;
                self.overlay.show(&Notice::SpeechToggled { enabled });
                info!("Speech {}", if enabled { "enabled" } else { "disabled" });
            }
            ShortcutAction::IncreaseFont => {
                let scale = self.settings.increase_font();
                self.page.apply_font_scale(scale);
            }
            ShortcutAction::DecreaseFont => {
                let scale = self.settings.decrease_font();
                self.page.apply_font_scale(scale);
            }
        }
        self.persist().await;
    }

    async fn persist(&self) {
        if let Err(e) = self.store.set(&self.settings).await {
            warn!("Could not save settings: {}", e);
        }
    }

    /// Handle a message pushed to this page
    pub fn on_message(&mut self, message: Message) -> Ack {
        match message {
            Message::SettingsUpdate { value } => {
                debug!("Settings update: {:?}", value);
                self.settings.apply(&value);
                self.apply_settings();

                if value.tts_enabled.is_some() {
                    self.pipeline.set_tts_enabled(self.settings.tts_enabled);
                }
                if value.shortcuts.is_some() {
                    self.keyboard
                        .set_shortcuts(ShortcutMap::from_settings(&self.settings.shortcuts));
                }
                Ack::ok()
            }
            Message::ToggleFeature => Ack::ok(),
            other => Ack::error(format!("{} is not handled by pages", other.kind())),
        }
    }

    /// A batch of DOM mutations was observed. Large batches (a single-page
    /// app swapping content) get the theme re-applied. Returns whether it was.
    pub fn on_mutations(&self, records: usize) -> bool {
        if records <= MUTATION_BURST {
            return false;
        }
        debug!("{} mutations, re-applying theme", records);
        self.page.apply_theme(self.settings.color_theme);
        true
    }

    /// A click anywhere on the page
    pub async fn on_user_gesture(&self) -> bool {
        self.pipeline.dispatcher().on_user_gesture().await
    }
}
