//! Incremental report pipeline.
//!
//! The pipeline walks the stage catalog in order and streams a `Progress` and a
//! `Result` event per stage, then a single `Complete`. Events travel over a
//! bounded channel from one producer task to one consumer, the
//! [`ReportStream`]. The producer only suspends at the retrieval call, the
//! pacing delay and when the channel is full. It stops as soon as it notices
//! the consumer has gone away.

mod config;
mod convert;
mod events;
mod retrieval;

pub use config::PipelineConfig;
pub use convert::{EVENT_STREAM_CONTENT_TYPE, FRAME_PREFIX, parse_frame, parse_frames, to_frame};
pub use events::{EventCallback, ReportCallbacks, ReportEvent, verbose_callbacks};
pub use retrieval::{DUCKDUCKGO_ENDPOINT, DuckDuckGoRetriever, NoRetrieval, Retriever, SearchHit};

use crate::catalog::{Stage, default_stages};
use crate::error::{Error, Result};
use crate::synth::{ContentBlock, ContentSource, TemplateSynthesizer};
use futures::Stream;
use log::{debug, warn};
use rand::Rng;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Longest accepted topic, in characters, after trimming.
pub const MAX_TOPIC_CHARS: usize = 500;

/// Reason reported when the producer stops without a terminal event.
const UNEXPECTED_END: &str = "Report stream ended unexpectedly";

/// Trim and check a caller-supplied topic.
pub fn validate_topic(raw: &str) -> Result<String> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(Error::EmptyTopic);
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(Error::TopicTooLong {
            max: MAX_TOPIC_CHARS,
        });
    }
    Ok(topic.to_string())
}

/// Drives the stage catalog and streams report events.
pub struct ReportPipeline {
    stages: Arc<Vec<Stage>>,
    config: PipelineConfig,
    retriever: Arc<dyn Retriever>,
    source: Arc<dyn ContentSource>,
    callbacks: ReportCallbacks,
}

impl Default for ReportPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl ReportPipeline {
    /// Create a pipeline over the default catalog with DuckDuckGo retrieval.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            stages: Arc::new(default_stages()),
            config,
            retriever: Arc::new(DuckDuckGoRetriever::default()),
            source: Arc::new(TemplateSynthesizer),
            callbacks: ReportCallbacks::default(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Replace the stage catalog.
    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = Arc::new(stages);
        self
    }

    /// Replace the retrieval collaborator.
    pub fn with_retriever<R: Retriever + 'static>(mut self, retriever: R) -> Self {
        self.retriever = Arc::new(retriever);
        self
    }

    /// Replace the content source.
    pub fn with_source<S: ContentSource + 'static>(mut self, source: S) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Log every event as it is emitted.
    pub fn verbose(mut self, enabled: bool) -> Self {
        if enabled {
            self.callbacks = verbose_callbacks();
        }
        self
    }

    /// Set a callback for progress events.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&ReportEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_progress = Some(Arc::new(f));
        self
    }

    /// Set a callback for result events.
    pub fn on_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&ReportEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_result = Some(Arc::new(f));
        self
    }

    /// Set a catch-all callback for any event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&ReportEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_event = Some(Arc::new(f));
        self
    }

    /// The stages this pipeline runs, in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Start a report for `topic`.
    ///
    /// Input errors are returned here, before any stage runs. Everything after
    /// that is reported through the stream. Must be called from within a tokio
    /// runtime.
    pub fn run(&self, topic: &str) -> Result<ReportStream> {
        let topic = validate_topic(topic)?;
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        let producer = Producer {
            topic,
            stages: self.stages.clone(),
            config: self.config.clone(),
            retriever: self.retriever.clone(),
            source: self.source.clone(),
            callbacks: self.callbacks.clone(),
            tx,
        };
        let handle = tokio::spawn(producer.run());

        Ok(ReportStream {
            rx,
            handle,
            finished: false,
        })
    }
}

/// The producing half of one pipeline run.
struct Producer {
    topic: String,
    stages: Arc<Vec<Stage>>,
    config: PipelineConfig,
    retriever: Arc<dyn Retriever>,
    source: Arc<dyn ContentSource>,
    callbacks: ReportCallbacks,
    tx: mpsc::Sender<ReportEvent>,
}

impl Producer {
    async fn run(self) {
        let total = self.stages.len();

        for (index, stage) in self.stages.iter().enumerate() {
            debug!("stage {}/{}: {}", index + 1, total, stage.perspective_label);

            if !self
                .send(ReportEvent::progress(&stage.perspective_label, index, total))
                .await
            {
                return;
            }

            if self.config.retrieval && !self.retrieve(stage).await {
                return;
            }

            let content = match self.source.content(&self.topic, stage) {
                Ok(content) => content,
                Err(e) => {
                    let reason = Error::Stage {
                        stage: stage.perspective_label.clone(),
                        message: e.to_string(),
                    };
                    self.send(ReportEvent::Failure {
                        reason: reason.to_string(),
                    })
                    .await;
                    return;
                }
            };

            if !self.pace().await {
                return;
            }

            let block = ContentBlock::for_stage(stage, content);
            if !self.send(ReportEvent::Result { result: block }).await {
                return;
            }
        }

        self.send(ReportEvent::Complete).await;
    }

    /// Deliver an event. Returns false once the consumer is gone.
    async fn send(&self, event: ReportEvent) -> bool {
        if self.tx.send(event.clone()).await.is_err() {
            debug!("consumer disconnected, stopping report for '{}'", self.topic);
            return false;
        }
        self.callbacks.emit(&event);
        true
    }

    /// Best-effort retrieval. The hits are not used. Returns false if the
    /// consumer disconnected while waiting.
    async fn retrieve(&self, stage: &Stage) -> bool {
        let query = stage.query(&self.topic);
        tokio::select! {
            outcome = self.retriever.search(&query) => {
                match outcome {
                    Ok(hits) => debug!("{} hit(s) for '{}'", hits.len(), query),
                    Err(e) => warn!("retrieval for '{}' failed: {}", query, e),
                }
                true
            }
            _ = self.tx.closed() => {
                debug!("consumer disconnected during retrieval");
                false
            }
        }
    }

    /// Wait a random duration from the pacing range. Returns false if the
    /// consumer disconnected while waiting.
    async fn pace(&self) -> bool {
        let Some((min, max)) = self.config.pacing else {
            return true;
        };
        let delay = {
            // the field is public, so the bounds may arrive reversed
            let (lo, hi) = (min.min(max).as_millis() as u64, min.max(max).as_millis() as u64);
            Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = self.tx.closed() => {
                debug!("consumer disconnected during pacing");
                false
            }
        }
    }
}

/// The consuming half of one pipeline run.
///
/// Yields events in production order and always ends with exactly one terminal
/// event: if the producer stops without sending one, a `Failure` is
/// synthesized. Dropping the stream cancels the run.
pub struct ReportStream {
    rx: mpsc::Receiver<ReportEvent>,
    handle: JoinHandle<()>,
    finished: bool,
}

impl ReportStream {
    /// Receive the next event, or `None` after the terminal event.
    pub async fn next_event(&mut self) -> Option<ReportEvent> {
        if self.finished {
            return None;
        }
        let event = match self.rx.recv().await {
            Some(event) => event,
            None => ReportEvent::Failure {
                reason: UNEXPECTED_END.to_string(),
            },
        };
        self.finished = event.is_terminal();
        Some(event)
    }

    /// Stop the run and wait for the producer to exit.
    pub async fn cancel(mut self) {
        self.rx.close();
        if let Err(e) = (&mut self.handle).await {
            warn!("report producer ended abnormally: {}", e);
        }
    }
}

impl Stream for ReportStream {
    type Item = ReportEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ReportEvent>> {
        if self.finished {
            return Poll::Ready(None);
        }
        let event = match self.rx.poll_recv(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Some(event)) => event,
            Poll::Ready(None) => ReportEvent::Failure {
                reason: UNEXPECTED_END.to_string(),
            },
        };
        self.finished = event.is_terminal();
        Poll::Ready(Some(event))
    }
}
