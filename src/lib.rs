//! deep-report - staged research reports with live progress and PDF output
//!
//! A report is built by walking a fixed catalog of research perspectives. Each
//! stage streams a progress event and a content block to the caller as soon as
//! it is ready. The collected blocks are then laid out into a paginated
//! document (cover, linked table of contents, one section per block) and
//! serialized as a PDF.
//!
//! # Quick Start
//!
//! ```ignore
//! use deep_report::{LayoutEngine, ReportCollector, ReportPipeline, serialize};
//!
//! #[tokio::main]
//! async fn main() -> deep_report::Result<()> {
//!     let stream = ReportPipeline::default().run("Renewable Energy")?;
//!     let blocks = ReportCollector::new().drain(stream).await?;
//!
//!     let document = LayoutEngine::default().layout("Renewable Energy", &blocks)?;
//!     std::fs::write("report.pdf", serialize(&document)?)?;
//!     Ok(())
//! }
//! ```

mod canvas;
mod catalog;
mod collect;
mod cursor;
mod emit;
mod error;
mod layout;
mod metrics;
mod pipeline;
mod service;
mod synth;

pub use canvas::{Canvas, Color, Command, Document, Page, SectionAnchor, TextStyle};
pub use catalog::{Stage, StageCategory, TOPIC_PLACEHOLDER, default_stages};
pub use collect::{CollectStatus, ReportCollector};
pub use cursor::{PageCursor, wrap};
pub use emit::{FILENAME_SUFFIX, PDF_CONTENT_TYPE, serialize, suggested_filename};
pub use error::{Error, Result};
pub use layout::{A4_HEIGHT, A4_WIDTH, LayoutConfig, LayoutEngine};
pub use metrics::{FontFace, StandardFonts, TextMeasurer};
pub use pipeline::{
    DUCKDUCKGO_ENDPOINT, DuckDuckGoRetriever, EVENT_STREAM_CONTENT_TYPE, EventCallback,
    FRAME_PREFIX, MAX_TOPIC_CHARS, NoRetrieval, PipelineConfig, ReportCallbacks, ReportEvent,
    ReportPipeline, ReportStream, Retriever, SearchHit, parse_frame, parse_frames, to_frame,
    validate_topic, verbose_callbacks,
};
pub use service::{
    DOCUMENT_FAILURE_MESSAGE, DocumentArtifact, DocumentRequest, ErrorPayload, ReportRequest,
    ReportService, event_frames,
};
pub use synth::{ContentBlock, ContentSource, TemplateSynthesizer, synthesize, template_for};
