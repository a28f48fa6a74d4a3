//! Report events and observer callbacks.

use crate::synth::ContentBlock;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One message in a report stream.
///
/// A stream carries `Progress`/`Result` pairs in stage order and ends with
/// exactly one `Complete` or `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportEvent {
    /// A stage is starting
    Progress { message: String },
    /// A stage produced its content block
    Result { result: ContentBlock },
    /// All stages finished
    Complete,
    /// The stream stopped early
    Failure { reason: String },
}

impl ReportEvent {
    /// Progress message for stage `index` (0-based) of `total`.
    pub fn progress(label: &str, index: usize, total: usize) -> Self {
        ReportEvent::Progress {
            message: format!("Searching: {} ({}/{})...", label, index + 1, total),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportEvent::Complete | ReportEvent::Failure { .. })
    }
}

/// Type alias for event callbacks
pub type EventCallback = Arc<dyn Fn(&ReportEvent) + Send + Sync>;

/// Observer hooks invoked by the producer as each event is emitted.
#[derive(Default, Clone)]
pub struct ReportCallbacks {
    pub on_progress: Option<EventCallback>,
    pub on_result: Option<EventCallback>,
    pub on_complete: Option<EventCallback>,
    pub on_failure: Option<EventCallback>,
    /// Catch-all callback for any event
    pub on_event: Option<EventCallback>,
}

impl ReportCallbacks {
    /// Emit an event to the appropriate callback(s)
    pub fn emit(&self, event: &ReportEvent) {
        let specific = match event {
            ReportEvent::Progress { .. } => &self.on_progress,
            ReportEvent::Result { .. } => &self.on_result,
            ReportEvent::Complete => &self.on_complete,
            ReportEvent::Failure { .. } => &self.on_failure,
        };

        if let Some(cb) = specific {
            cb(event);
        }

        if let Some(cb) = &self.on_event {
            cb(event);
        }
    }
}

/// Callbacks that log every event.
pub fn verbose_callbacks() -> ReportCallbacks {
    ReportCallbacks {
        on_progress: Some(Arc::new(|e| {
            if let ReportEvent::Progress { message } = e {
                info!("{}", message);
            }
        })),
        on_result: Some(Arc::new(|e| {
            if let ReportEvent::Result { result } = e {
                let preview: String = result.content.chars().take(80).collect();
                let suffix = if result.content.chars().count() > 80 { "..." } else { "" };
                info!("{}: {}{}", result.title, preview.replace('\n', " "), suffix);
            }
        })),
        on_complete: Some(Arc::new(|_| {
            info!("Report complete");
        })),
        on_failure: Some(Arc::new(|e| {
            if let ReportEvent::Failure { reason } = e {
                error!("Report failed: {}", reason);
            }
        })),
        ..Default::default()
    }
}
