//! Cross-context messaging
//!
//! Extension surfaces (the background host, page content logic, popup, options
//! page and floating widget) exchange a small fixed set of [`Message`]s. Every
//! request is answered with an [`Ack`].

pub mod channel;
pub mod editor;
pub mod host;

pub use channel::{ChannelBus, HostChannel, LocalBus, MessageBackend};
pub use editor::SettingsEditor;
pub use host::{HostRelay, HostSpeech};

use crate::error::{ReaderError, Result};
use crate::settings::{Settings, SettingsPatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages exchanged between extension surfaces, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "storage:get")]
    StorageGet,

    #[serde(rename = "storage:set")]
    StorageSet { value: Settings },

    /// Host-mediated speech
    #[serde(rename = "tts:speak")]
    TtsSpeak {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },

    #[serde(rename = "tts:stop")]
    TtsStop,

    /// Partial settings pushed to a page; the floating widget posts it as
    /// `wau:settings:update`
    #[serde(rename = "settings:update", alias = "wau:settings:update")]
    SettingsUpdate {
        #[serde(default)]
        value: SettingsPatch,
    },

    #[serde(rename = "toggleFeature")]
    ToggleFeature,
}

impl Message {
    /// Wire name of the message type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StorageGet => "storage:get",
            Self::StorageSet { .. } => "storage:set",
            Self::TtsSpeak { .. } => "tts:speak",
            Self::TtsStop => "tts:stop",
            Self::SettingsUpdate { .. } => "settings:update",
            Self::ToggleFeature => "toggleFeature",
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Acknowledgment returned for every message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            value: None,
            error: None,
        }
    }

    pub fn ok_with(value: Value) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(error.into()),
        }
    }

    /// The carried value, or the receiver's error as [`ReaderError::Messaging`]
    pub fn into_result(self) -> Result<Option<Value>> {
        if self.ok {
            Ok(self.value)
        } else {
            Err(ReaderError::Messaging(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}

/// Delivers messages to another context
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Send and wait for the acknowledgment. `Err` means the message could not
    /// be delivered; a delivered-but-refused message is an `Ack` with `ok: false`.
    async fn send(&self, message: Message) -> Result<Ack>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_names() {
        let speak = Message::TtsSpeak {
            text: "Hola".to_string(),
            lang: Some("es-ES".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&speak).unwrap(),
            json!({"type": "tts:speak", "text": "Hola", "lang": "es-ES"})
        );
        assert_eq!(serde_json::to_value(Message::TtsStop).unwrap(), json!({"type": "tts:stop"}));
        assert_eq!(speak.kind(), "tts:speak");
    }

    #[test]
    fn test_parse_settings_update_and_widget_alias() {
        let msg = Message::from_json(r#"{"type": "settings:update", "value": {"fontScale": 1.3}}"#).unwrap();
        assert_eq!(
            msg,
            Message::SettingsUpdate {
                value: SettingsPatch::font_scale(1.3)
            }
        );

        let widget = Message::from_json(r#"{"type": "wau:settings:update", "value": {"ttsEnabled": false}}"#).unwrap();
        assert_eq!(
            widget,
            Message::SettingsUpdate {
                value: SettingsPatch::tts_enabled(false)
            }
        );
    }

    #[test]
    fn test_parse_storage_set() {
        let msg = Message::from_json(r#"{"type": "storage:set", "value": {"colorTheme": "protanopia"}}"#).unwrap();
        match msg {
            Message::StorageSet { value } => {
                assert_eq!(value.color_theme, crate::settings::ColorTheme::Protanopia);
                assert_eq!(value.font_scale, 1.0);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Message::from_json(r#"{"type": "tabs:close"}"#).is_err());
    }

    #[test]
    fn test_ack_serialization() {
        assert_eq!(serde_json::to_value(Ack::ok()).unwrap(), json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(Ack::error("boom")).unwrap(),
            json!({"ok": false, "error": "boom"})
        );
    }

    #[test]
    fn test_ack_into_result() {
        assert_eq!(Ack::ok_with(json!(3)).into_result().unwrap(), Some(json!(3)));
        let err = Ack::error("denied").into_result().unwrap_err();
        assert!(matches!(err, ReaderError::Messaging(msg) if msg == "denied"));
    }
}
