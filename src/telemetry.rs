//! Fire-and-forget event reporting.
//!
//! The game never waits on a sink. Failures are logged and dropped.

use derive_new::new;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Something worth reporting about a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedEvent {
    /// The game was opened.
    VisitorLanded,
    /// A round started in the named mode.
    RoundStarted {
        /// Label of the mode played.
        label: String,
    },
    /// The guess was shown. `number` is the raw total, 0 included.
    GuessRevealed {
        /// The accumulated total.
        number: u32,
    },
}

impl TrackedEvent {
    /// Human-readable action name sent to the beacon.
    pub fn action(&self) -> String {
        match self {
            TrackedEvent::VisitorLanded => "Visitor Landed".to_string(),
            TrackedEvent::RoundStarted { label } => format!("Started Game ({})", label),
            TrackedEvent::GuessRevealed { .. } => "Game Completed - Guessed Number:".to_string(),
        }
    }

    /// Wire payload for this event.
    pub fn payload(&self) -> BeaconPayload {
        let number = match self {
            TrackedEvent::GuessRevealed { number } => Some(*number),
            TrackedEvent::VisitorLanded | TrackedEvent::RoundStarted { .. } => None,
        };
        BeaconPayload::new(self.action(), number)
    }
}

/// JSON body posted to the beacon endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct BeaconPayload {
    /// Action name.
    pub action: String,
    /// Guessed number, for completion events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// Receives game events. Implementations must not block.
pub trait EventSink: Send + Sync {
    /// Reports an event without waiting for delivery.
    fn emit(&self, event: TrackedEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: TrackedEvent) {}
}

/// Writes events to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: TrackedEvent) {
        info!(action = %event.action(), ?event, "Tracked event");
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TrackedEvent>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far.
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: TrackedEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Posts events to an HTTP endpoint on the tokio runtime.
///
/// Each event becomes a spawned task. Nothing is retried or awaited.
#[derive(Debug, Clone)]
pub struct HttpBeacon {
    client: reqwest::Client,
    endpoint: String,
    runtime: tokio::runtime::Handle,
}

impl HttpBeacon {
    /// Creates a beacon bound to the current tokio runtime.
    ///
    /// Returns `None` outside a runtime.
    #[instrument(skip(endpoint), fields(endpoint = %endpoint.as_ref()))]
    pub fn new(endpoint: impl AsRef<str>) -> Option<Self> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "No tokio runtime, analytics disabled");
                return None;
            }
        };
        info!("Analytics beacon enabled");
        Some(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.as_ref().to_string(),
            runtime,
        })
    }

    /// The endpoint events are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EventSink for HttpBeacon {
    fn emit(&self, event: TrackedEvent) {
        let body = match serde_json::to_string(&event.payload()) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode beacon payload");
                return;
            }
        };
        let request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body);

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) => debug!(status = %resp.status(), "Beacon delivered"),
                Err(e) => warn!(error = %e, "Beacon failed"),
            }
        });
    }
}

/// The HTTP beacon for a configured, non-blank endpoint.
#[instrument]
pub fn beacon_for(endpoint: Option<&str>) -> Option<HttpBeacon> {
    endpoint
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .and_then(|url| HttpBeacon::new(url))
}

/// Picks a sink for the configured endpoint: the beacon, or the log.
#[instrument]
pub fn sink_for(endpoint: Option<&str>) -> Arc<dyn EventSink> {
    match beacon_for(endpoint) {
        Some(beacon) => Arc::new(beacon),
        None => Arc::new(LogSink),
    }
}
