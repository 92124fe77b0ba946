use crate::extract::{truncate_chars, truncate_with_ellipsis};
use crate::page::{Notice, Overlay};
use crate::speech::{
    DEFAULT_LANGUAGE, FailureClass, FallbackChannel, SpeechEngine, SynthesisErrorKind, Utterance, select_voice,
};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Timing and length limits for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Language tag for utterances
    pub language: String,

    /// Longest wait for the engine's voice catalog to load
    pub voice_wait: Duration,

    /// Pause after cancelling an utterance that was still speaking
    pub preempt_settle: Duration,

    /// Pause after cancelling before a retry
    pub retry_settle: Duration,

    /// Delay before retrying after a network failure
    pub network_retry_delay: Duration,

    /// Texts longer than this are cut (with an ellipsis) before submission
    pub max_utterance_chars: usize,

    /// Length of the single retry after a "text too long" failure
    pub retry_truncate_chars: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            voice_wait: Duration::from_millis(1000),
            preempt_settle: Duration::from_millis(100),
            retry_settle: Duration::from_millis(50),
            network_retry_delay: Duration::from_millis(500),
            max_utterance_chars: 300,
            retry_truncate_chars: 100,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the utterance language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method: set the voice catalog wait
    pub fn voice_wait(mut self, wait: Duration) -> Self {
        self.voice_wait = wait;
        self
    }

    /// Builder method: set the utterance length ceiling
    pub fn max_utterance_chars(mut self, max_chars: usize) -> Self {
        self.max_utterance_chars = max_chars;
        self
    }
}

#[derive(Debug, Default)]
struct DispatcherState {
    /// Engine checked and voice catalog awaited
    ready: bool,
    audio_permitted: bool,
    /// The unlock prompt is only shown once per page
    unlock_prompt_shown: bool,
    /// A user gesture will unlock audio
    gesture_armed: bool,
    language: String,
}

/// Speaks one utterance at a time through the primary engine, recovering from
/// engine failures by retrying or handing the text to the fallback channel.
///
/// A new [`speak`](Self::speak) preempts whatever is being spoken: the engine is
/// cancelled, given a moment to settle, and only then handed the new utterance.
pub struct SpeechDispatcher {
    engine: Arc<dyn SpeechEngine>,
    fallback: Arc<dyn FallbackChannel>,
    overlay: Arc<dyn Overlay>,
    config: DispatcherConfig,
    state: Mutex<DispatcherState>,
}

impl SpeechDispatcher {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        fallback: Arc<dyn FallbackChannel>,
        overlay: Arc<dyn Overlay>,
        config: DispatcherConfig,
    ) -> Self {
        let state = DispatcherState {
            language: config.language.clone(),
            ..Default::default()
        };

        Self {
            engine,
            fallback,
            overlay,
            config,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, DispatcherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn language(&self) -> String {
        self.state().language.clone()
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.state().language = language.into();
    }

    /// Prepare the engine. Idempotent; returns whether the engine can be used.
    ///
    /// Waits (bounded) for the voice catalog, which many engines load lazily,
    /// and probes whether audio may play. A failed probe counts as permitted.
    pub async fn init(&self) -> bool {
        if self.state().ready {
            return true;
        }

        if !self.engine.is_available() {
            warn!("Speech engine '{}' not available", self.engine.name());
            return false;
        }

        if self.engine.voices().is_empty()
            && timeout(self.config.voice_wait, self.engine.voices_changed()).await.is_err()
        {
            debug!("Voice catalog still empty after {:?}", self.config.voice_wait);
        }

        let permitted = match self.engine.probe_audio().await {
            Ok(permitted) => permitted,
            Err(e) => {
                warn!("Could not probe audio permission, assuming granted: {}", e);
                true
            }
        };

        let mut state = self.state();
        state.audio_permitted = permitted;
        state.ready = true;
        info!("Speech engine '{}' ready (audio permitted: {})", self.engine.name(), permitted);
        true
    }

    /// Engine initialised and audio permitted
    pub fn is_ready(&self) -> bool {
        let state = self.state();
        state.ready && state.audio_permitted
    }

    /// Speak `text`, preempting any utterance in flight
    pub async fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let text = if text.chars().count() > self.config.max_utterance_chars {
            warn!("Text longer than {} characters, truncating", self.config.max_utterance_chars);
            truncate_with_ellipsis(text, self.config.max_utterance_chars)
        } else {
            text.to_string()
        };

        let lang = self.language();

        if !self.init().await {
            self.fallback.speak(&text, &lang).await;
            return;
        }

        if !self.state().audio_permitted {
            self.request_audio_interaction();
            return;
        }

        if self.engine.is_speaking() {
            self.engine.cancel();
            sleep(self.config.preempt_settle).await;
        }

        let voice = select_voice(&lang, &self.engine.voices()).cloned();
        let utterance = Utterance::new(text.as_str(), lang.as_str()).with_voice(voice);

        if let Err(kind) = self.engine.speak(utterance).await {
            self.recover(kind, &text, &lang).await;
        }
    }

    async fn recover(&self, kind: SynthesisErrorKind, text: &str, lang: &str) {
        let class = kind.class();
        if class != FailureClass::Transient {
            warn!("Speech synthesis failed: {}", kind);
        }

        match class {
            FailureClass::Permission => {
                self.state().audio_permitted = false;
                self.request_audio_interaction();
            }
            FailureClass::Transient => {}
            FailureClass::Unavailable | FailureClass::Unknown => {
                self.fallback.speak(text, lang).await;
            }
            FailureClass::ContentTooLong => {
                if text.chars().count() > self.config.retry_truncate_chars {
                    debug!("Retrying with text cut to {} characters", self.config.retry_truncate_chars);
                    self.retry(truncate_chars(text, self.config.retry_truncate_chars), lang).await;
                }
            }
            FailureClass::Network => {
                sleep(self.config.network_retry_delay).await;
                self.retry(text, lang).await;
            }
        }
    }

    /// One plain resubmission without voice selection; failures are only logged
    async fn retry(&self, text: &str, lang: &str) {
        self.engine.cancel();
        sleep(self.config.retry_settle).await;

        if let Err(kind) = self.engine.speak(Utterance::new(text, lang)).await {
            warn!("Speech retry failed: {}", kind);
        }
    }

    /// Arm the gesture unlock and, the first time on this page, show the prompt
    fn request_audio_interaction(&self) {
        let show_prompt = {
            let mut state = self.state();
            state.gesture_armed = true;
            !std::mem::replace(&mut state.unlock_prompt_shown, true)
        };

        if show_prompt {
            self.overlay.show(&Notice::AudioUnlock);
        }
    }

    /// Handle a user gesture (a click anywhere on the page).
    ///
    /// Unlocks audio if an unlock was requested. Returns whether audio became
    /// available. Nothing is re-spoken; the next focus change speaks normally.
    pub async fn on_user_gesture(&self) -> bool {
        if !self.state().gesture_armed {
            return false;
        }

        match self.engine.unlock_audio().await {
            Ok(()) => {
                {
                    let mut state = self.state();
                    state.audio_permitted = true;
                    state.gesture_armed = false;
                }
                self.overlay.dismiss(&Notice::AudioUnlock);
                info!("Audio unlocked by user interaction");
                true
            }
            Err(e) => {
                warn!("Failed to unlock audio: {}", e);
                false
            }
        }
    }

    pub fn stop(&self) {
        if self.engine.is_available() {
            self.engine.cancel();
        }
    }

    pub fn pause(&self) {
        if self.engine.is_available() {
            self.engine.pause();
        }
    }

    pub fn resume(&self) {
        if self.engine.is_available() {
            self.engine.resume();
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use crate::error::{ReaderError, Result};
    use crate::page::{Notice, Overlay};
    use crate::speech::{FallbackChannel, SpeechEngine, SynthesisErrorKind, Utterance, Voice};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum EngineCall {
        Speak(Utterance),
        Cancel,
        Pause,
        Resume,
        Unlock,
    }

    pub struct FakeEngine {
        pub available: bool,
        pub voices: Vec<Voice>,
        pub audio: Mutex<Result<bool>>,
        pub unlock_fails: bool,
        pub speaking: Mutex<bool>,
        pub failures: Mutex<VecDeque<SynthesisErrorKind>>,
        pub calls: Mutex<Vec<EngineCall>>,
    }

    impl FakeEngine {
        pub fn new() -> Self {
            Self {
                available: true,
                voices: vec![Voice::new("Mónica", "es-ES").local()],
                audio: Mutex::new(Ok(true)),
                unlock_fails: false,
                speaking: Mutex::new(false),
                failures: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_with(self, kinds: &[SynthesisErrorKind]) -> Self {
            self.failures.lock().unwrap().extend(kinds.iter().cloned());
            self
        }

        pub fn calls(&self) -> Vec<EngineCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn spoken(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    EngineCall::Speak(u) => Some(u.text),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl SpeechEngine for FakeEngine {
        fn name(&self) -> &str {
            "fake"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        async fn voices_changed(&self) {
            std::future::pending::<()>().await
        }

        async fn probe_audio(&self) -> Result<bool> {
            match &*self.audio.lock().unwrap() {
                Ok(permitted) => Ok(*permitted),
                Err(e) => Err(ReaderError::Audio(e.to_string())),
            }
        }

        async fn unlock_audio(&self) -> Result<()> {
            self.calls.lock().unwrap().push(EngineCall::Unlock);
            if self.unlock_fails {
                Err(ReaderError::Audio("still suspended".to_string()))
            } else {
                Ok(())
            }
        }

        fn is_speaking(&self) -> bool {
            *self.speaking.lock().unwrap()
        }

        async fn speak(&self, utterance: Utterance) -> std::result::Result<(), SynthesisErrorKind> {
            self.calls.lock().unwrap().push(EngineCall::Speak(utterance));
            match self.failures.lock().unwrap().pop_front() {
                Some(kind) => Err(kind),
                None => {
                    *self.speaking.lock().unwrap() = true;
                    Ok(())
                }
            }
        }

        fn cancel(&self) {
            *self.speaking.lock().unwrap() = false;
            self.calls.lock().unwrap().push(EngineCall::Cancel);
        }

        fn pause(&self) {
            self.calls.lock().unwrap().push(EngineCall::Pause);
        }

        fn resume(&self) {
            self.calls.lock().unwrap().push(EngineCall::Resume);
        }
    }

    #[derive(Default)]
    pub struct FakeFallback {
        pub spoken: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl FallbackChannel for FakeFallback {
        async fn speak(&self, text: &str, lang: &str) {
            self.spoken.lock().unwrap().push((text.to_string(), lang.to_string()));
        }

        async fn stop(&self) {}
    }

    #[derive(Default)]
    pub struct FakeOverlay {
        pub shown: Mutex<Vec<Notice>>,
        pub dismissed: Mutex<Vec<Notice>>,
    }

    impl Overlay for FakeOverlay {
        fn show(&self, notice: &Notice) {
            self.shown.lock().unwrap().push(*notice);
        }

        fn dismiss(&self, notice: &Notice) {
            self.dismissed.lock().unwrap().push(*notice);
        }
    }
}
