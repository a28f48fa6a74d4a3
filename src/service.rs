//! Request handling for the two external operations.
//!
//! - *Submit report*: a JSON body `{"topic": ...}` starts a pipeline run and
//!   returns its live event stream. [`event_frames`] turns that stream into
//!   `text/event-stream` frames.
//! - *Generate document*: a JSON body `{"topic": ..., "results": [...]}` is
//!   laid out and serialized into a PDF artifact.
//!
//! Failures map onto an [`ErrorPayload`]: input errors keep their message and
//! a 400 status, everything else becomes a generic 500.

use crate::emit::{PDF_CONTENT_TYPE, serialize, suggested_filename};
use crate::error::{Error, Result};
use crate::layout::LayoutEngine;
use crate::pipeline::{ReportPipeline, ReportStream, to_frame, validate_topic};
use crate::synth::ContentBlock;
use futures::{Stream, StreamExt};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Message returned for any failure that is not the caller's fault.
pub const DOCUMENT_FAILURE_MESSAGE: &str = "Failed to generate PDF";

/// Body of a submit-report request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

/// Body of a generate-document request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub results: Vec<ContentBlock>,
}

/// A serialized document ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Structured error returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl From<&Error> for ErrorPayload {
    fn from(err: &Error) -> Self {
        if err.is_input_error() {
            ErrorPayload {
                status: 400,
                error: err.to_string(),
            }
        } else {
            ErrorPayload {
                status: 500,
                error: DOCUMENT_FAILURE_MESSAGE.to_string(),
            }
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn required_topic(topic: Option<&str>) -> Result<String> {
    validate_topic(topic.unwrap_or_default())
}

/// Serves report and document requests.
#[derive(Default)]
pub struct ReportService {
    pipeline: ReportPipeline,
    layout: LayoutEngine,
}

impl ReportService {
    pub fn new(pipeline: ReportPipeline, layout: LayoutEngine) -> Self {
        Self { pipeline, layout }
    }

    pub fn pipeline(&self) -> &ReportPipeline {
        &self.pipeline
    }

    /// Start a report from a JSON request body.
    ///
    /// Malformed bodies and missing or empty topics are rejected here, before
    /// any stage runs. Must be called from within a tokio runtime.
    pub fn submit_report(&self, body: &str) -> Result<ReportStream> {
        let request: ReportRequest = parse_body(body)?;
        let topic = required_topic(request.topic.as_deref())?;
        info!("starting report on '{}'", topic);
        self.pipeline.run(&topic)
    }

    /// Build a document from a JSON request body.
    pub fn generate_document(&self, body: &str) -> Result<DocumentArtifact> {
        let request: DocumentRequest = parse_body(body)?;
        let topic = required_topic(request.topic.as_deref())?;
        self.build_document(&topic, &request.results)
    }

    /// Lay out and serialize `blocks` for `topic`.
    ///
    /// Either the whole artifact is returned or an error; never a partial
    /// document.
    pub fn build_document(&self, topic: &str, blocks: &[ContentBlock]) -> Result<DocumentArtifact> {
        let result = self
            .layout
            .layout(topic, blocks)
            .and_then(|document| serialize(&document).map(|bytes| (document.page_count(), bytes)));

        match result {
            Ok((pages, bytes)) => {
                info!(
                    "generated document for '{}': {} page(s), {} bytes",
                    topic,
                    pages,
                    bytes.len()
                );
                Ok(DocumentArtifact {
                    bytes,
                    content_type: PDF_CONTENT_TYPE,
                    filename: suggested_filename(topic),
                })
            }
            Err(e) => {
                error!("document generation for '{}' failed: {}", topic, e);
                Err(e)
            }
        }
    }
}

/// Encode each event of a report stream as a wire frame.
pub fn event_frames(stream: ReportStream) -> impl Stream<Item = Result<String>> {
    stream.map(|event| to_frame(&event))
}
