//! Caller-side accumulation of streamed results.
//!
//! A [`ReportCollector`] gathers the content blocks of a report in the order
//! they arrive. Cloning is cheap (Arc-based), so the same collector can be
//! handed to pipeline callbacks and to the code that later builds the document.
//!
//! # Example
//!
//! ```ignore
//! use deep_report::{ReportCollector, ReportPipeline};
//!
//! let collector = ReportCollector::new();
//! let stream = ReportPipeline::default().run("Renewable Energy")?;
//! let blocks = collector.drain(stream).await?;
//! ```

use crate::error::{Error, Result};
use crate::pipeline::{ReportEvent, ReportStream};
use crate::synth::ContentBlock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where a collected report stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollectStatus {
    #[default]
    Running,
    Complete,
    Failed(String),
}

#[derive(Debug, Default)]
struct Collected {
    blocks: Vec<ContentBlock>,
    last_progress: Option<String>,
    status: CollectStatus,
}

/// Shared, ordered store of streamed content blocks.
#[derive(Clone, Default)]
pub struct ReportCollector {
    data: Arc<Mutex<Collected>>,
}

impl ReportCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collected> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one event.
    ///
    /// Events after the terminal one are ignored; results already recorded are
    /// never retracted by a later failure.
    pub fn record(&self, event: &ReportEvent) {
        let mut data = self.lock();
        if data.status != CollectStatus::Running {
            return;
        }
        match event {
            ReportEvent::Progress { message } => data.last_progress = Some(message.clone()),
            ReportEvent::Result { result } => data.blocks.push(result.clone()),
            ReportEvent::Complete => data.status = CollectStatus::Complete,
            ReportEvent::Failure { reason } => data.status = CollectStatus::Failed(reason.clone()),
        }
    }

    /// Read a stream to its end, recording every event.
    ///
    /// Returns the collected blocks on completion, or `Error::Stream` if the
    /// stream failed. The blocks gathered before a failure stay available via
    /// [`ReportCollector::blocks`].
    pub async fn drain(&self, mut stream: ReportStream) -> Result<Vec<ContentBlock>> {
        while let Some(event) = stream.next_event().await {
            self.record(&event);
        }
        self.finish()
    }

    /// The collected blocks once the report completed, or the reason it did not.
    pub fn finish(&self) -> Result<Vec<ContentBlock>> {
        match self.status() {
            CollectStatus::Complete => Ok(self.blocks()),
            CollectStatus::Failed(reason) => Err(Error::Stream(reason)),
            CollectStatus::Running => Err(Error::Stream("stream ended without a terminal event".to_string())),
        }
    }

    /// Blocks collected so far, in arrival order.
    pub fn blocks(&self) -> Vec<ContentBlock> {
        self.lock().blocks.clone()
    }

    /// Number of blocks collected so far.
    pub fn len(&self) -> usize {
        self.lock().blocks.len()
    }

    /// Whether no block has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.lock().blocks.is_empty()
    }

    /// The most recent progress message.
    pub fn last_progress(&self) -> Option<String> {
        self.lock().last_progress.clone()
    }

    /// Current status.
    pub fn status(&self) -> CollectStatus {
        self.lock().status.clone()
    }

    /// Forget everything and start over.
    pub fn clear(&self) {
        *self.lock() = Collected::default();
    }
}
