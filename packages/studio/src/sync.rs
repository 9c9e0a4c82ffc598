// ABOUTME: Process-local broadcast hub connecting controller instances
// ABOUTME: Named topics carry whole-document and whole-comment-list replacements

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use blueprint_core::{Comment, Document};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 64;

/// A state replacement broadcast to every other connected instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMessage {
    SyncDocument(Option<Document>),
    SyncComments(Vec<Comment>),
}

impl SyncMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncMessage::SyncDocument(_) => "SYNC_DOCUMENT",
            SyncMessage::SyncComments(_) => "SYNC_COMMENTS",
        }
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    origin: u64,
    message: SyncMessage,
}

/// Registry of named broadcast topics
#[derive(Clone, Default)]
pub struct SyncHub {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Envelope>>>>,
    next_origin: Arc<AtomicU64>,
}

impl SyncHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a topic, creating it on first use
    pub fn connect(&self, name: &str) -> SyncPort {
        let sender = {
            let mut topics = self
                .topics
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            topics
                .entry(name.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone()
        };

        let origin = self.next_origin.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Port {} connected to sync topic '{}'", origin, name);

        SyncPort {
            topic: name.to_string(),
            receiver: sender.subscribe(),
            publisher: SyncPublisher { origin, sender },
        }
    }
}

/// Sending half of a port; cheap to clone
#[derive(Clone)]
pub struct SyncPublisher {
    origin: u64,
    sender: broadcast::Sender<Envelope>,
}

impl SyncPublisher {
    /// Broadcast a message, returning how many other ports can see it
    pub fn publish(&self, message: SyncMessage) -> usize {
        let kind = message.kind();
        let envelope = Envelope {
            origin: self.origin,
            message,
        };
        match self.sender.send(envelope) {
            // The sending port's own receiver is counted by the channel
            Ok(receivers) => {
                let others = receivers.saturating_sub(1);
                debug!("Published {} from port {} to {} peers", kind, self.origin, others);
                others
            }
            Err(_) => 0,
        }
    }
}

/// One instance's connection to a topic. Never yields its own messages.
pub struct SyncPort {
    topic: String,
    receiver: broadcast::Receiver<Envelope>,
    publisher: SyncPublisher,
}

impl SyncPort {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn origin(&self) -> u64 {
        self.publisher.origin
    }

    pub fn publisher(&self) -> SyncPublisher {
        self.publisher.clone()
    }

    pub fn publish(&self, message: SyncMessage) -> usize {
        self.publisher.publish(message)
    }

    /// Next foreign message already queued, without waiting
    pub fn try_recv(&mut self) -> Option<SyncMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.origin == self.publisher.origin => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Sync port {} lagged, skipped {} messages", self.origin(), skipped);
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next foreign message; `None` once the topic is closed
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.origin == self.publisher.origin => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Sync port {} lagged, skipped {} messages", self.origin(), skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
