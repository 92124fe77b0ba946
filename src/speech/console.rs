use crate::error::Result;
use crate::relay::HostSpeech;
use crate::speech::{SpeechEngine, SynthesisErrorKind, Utterance, Voice};
use async_trait::async_trait;
use std::sync::Mutex;

/// Speech engine that prints utterances to stdout instead of playing audio
pub struct ConsoleEngine {
    voice: Voice,
    history: Mutex<Vec<String>>,
    quiet: bool,
}

impl ConsoleEngine {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            voice: Voice::new("console", lang).local().engine_default(),
            history: Mutex::new(Vec::new()),
            quiet: false,
        }
    }

    /// Builder method: record utterances without printing them
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Everything spoken so far, in order
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    fn emit(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(text.to_string());
        }
    }
}

#[async_trait]
impl SpeechEngine for ConsoleEngine {
    fn name(&self) -> &str {
        "console"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        vec![self.voice.clone()]
    }

    async fn voices_changed(&self) {}

    async fn probe_audio(&self) -> Result<bool> {
        Ok(true)
    }

    async fn unlock_audio(&self) -> Result<()> {
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    async fn speak(&self, utterance: Utterance) -> std::result::Result<(), SynthesisErrorKind> {
        self.emit(&utterance.text);
        Ok(())
    }

    fn cancel(&self) {
        log::debug!("console speech cancelled");
    }

    fn pause(&self) {}

    fn resume(&self) {}
}

#[async_trait]
impl HostSpeech for ConsoleEngine {
    async fn speak(&self, text: &str, lang: &str) -> Result<()> {
        log::debug!("host speech ({})", lang);
        self.emit(text);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_history() {
        let engine = ConsoleEngine::new("es-ES").quiet();
        SpeechEngine::speak(&engine, Utterance::new("Hola", "es-ES")).await.unwrap();
        HostSpeech::speak(&engine, "Adiós", "es-ES").await.unwrap();
        assert_eq!(engine.history(), vec!["Hola", "Adiós"]);
    }

    #[test]
    fn test_single_default_voice() {
        let engine = ConsoleEngine::new("es-MX");
        let voices = engine.voices();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].lang, "es-MX");
        assert!(voices[0].default);
    }
}
