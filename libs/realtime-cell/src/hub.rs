use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use shared_models::clinic::ClinicGroup;

pub type LiveSender = broadcast::Sender<String>;
pub type LiveReceiver = broadcast::Receiver<String>;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveEventKind {
    AssessmentCreated,
    ConsultationCreated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    #[serde(rename = "type")]
    pub kind: LiveEventKind,
    pub clinic_group: ClinicGroup,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

impl LiveEvent {
    pub fn new(kind: LiveEventKind, clinic_group: ClinicGroup, data: Value) -> Self {
        Self {
            kind,
            clinic_group,
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Fan-out of dashboard events to every connected WebSocket.
///
/// Publishing never blocks and never fails the caller: with no subscribers
/// the event is dropped, and slow subscribers lose the oldest messages.
#[derive(Clone)]
pub struct LiveUpdateHub {
    sender: LiveSender,
}

impl LiveUpdateHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> LiveReceiver {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Returns how many subscribers the event reached.
    pub fn publish(&self, event: &LiveEvent) -> usize {
        let message = match serde_json::to_string(event) {
            Ok(message) => message,
            Err(e) => {
                warn!("Failed to serialize live event {:?}: {}", event.kind, e);
                return 0;
            }
        };

        match self.sender.send(message) {
            Ok(delivered) => {
                debug!("Broadcast {:?} to {} dashboard client(s)", event.kind, delivered);
                delivered
            }
            Err(_) => {
                debug!("No dashboard clients connected, dropping {:?}", event.kind);
                0
            }
        }
    }
}

impl Default for LiveUpdateHub {
    fn default() -> Self {
        Self::new()
    }
}
