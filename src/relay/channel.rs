use crate::error::{ReaderError, Result};
use crate::relay::{Ack, HostRelay, Message, MessageBus};
use crate::settings::{SETTINGS_KEY, Settings, StorageBackend};
use crate::speech::FallbackChannel;
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// In-process bus straight into a [`HostRelay`]
#[derive(Clone)]
pub struct LocalBus {
    host: Arc<HostRelay>,
}

impl LocalBus {
    pub fn new(host: Arc<HostRelay>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl MessageBus for LocalBus {
    async fn send(&self, message: Message) -> Result<Ack> {
        Ok(self.host.handle(message).await)
    }
}

/// One-way bus into a queue drained by the receiving context
///
/// Delivery is acknowledged as soon as the message is queued.
#[derive(Clone)]
pub struct ChannelBus {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    async fn send(&self, message: Message) -> Result<Ack> {
        self.tx
            .send(message)
            .map_err(|e| ReaderError::Messaging(format!("Receiver is gone, dropped {}", e.0.kind())))?;
        Ok(Ack::ok())
    }
}

/// Speech fallback that asks the host to speak
pub struct HostChannel {
    bus: Arc<dyn MessageBus>,
}

impl HostChannel {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl FallbackChannel for HostChannel {
    async fn speak(&self, text: &str, lang: &str) {
        let message = Message::TtsSpeak {
            text: text.to_string(),
            lang: Some(lang.to_string()),
        };

        match self.bus.send(message).await {
            Ok(ack) if ack.ok => debug!("Host accepted speech request"),
            Ok(ack) => debug!("Host refused speech request: {:?}", ack.error),
            Err(e) => debug!("Host speech request not delivered: {}", e),
        }
    }

    async fn stop(&self) {
        if let Err(e) = self.bus.send(Message::TtsStop).await {
            debug!("Host stop request not delivered: {}", e);
        }
    }
}

/// Storage that goes through the host's `storage:get` / `storage:set`
///
/// Only the settings record is reachable this way.
pub struct MessageBackend {
    bus: Arc<dyn MessageBus>,
}

impl MessageBackend {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }

    fn check_key(key: &str) -> Result<()> {
        if key == SETTINGS_KEY {
            Ok(())
        } else {
            Err(ReaderError::Storage(format!("Key {} is not reachable through the host", key)))
        }
    }
}

#[async_trait]
impl StorageBackend for MessageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Self::check_key(key)?;
        self.bus
            .send(Message::StorageGet)
            .await?
            .into_result()
            .map_err(|e| ReaderError::Storage(e.to_string()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        Self::check_key(key)?;
        let settings: Settings = serde_json::from_value(value)?;
        let ack = self.bus.send(Message::StorageSet { value: settings }).await?;
        if !ack.ok {
            warn!("Host rejected settings write: {:?}", ack.error);
        }
        ack.into_result()
            .map(|_| ())
            .map_err(|e| ReaderError::Storage(e.to_string()))
    }
}
