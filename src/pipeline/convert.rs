//! Conversion between report events and wire frames.
//!
//! A frame is one `data: <json>` line followed by a blank line, the shape
//! event-stream consumers expect.

use super::events::ReportEvent;
use crate::error::{Error, Result};

/// Prefix carried by every frame.
pub const FRAME_PREFIX: &str = "data: ";

/// Content type of a frame stream.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Encode an event as a wire frame.
pub fn to_frame(event: &ReportEvent) -> Result<String> {
    let json = serde_json::to_string(event)?;
    Ok(format!("{}{}\n\n", FRAME_PREFIX, json))
}

/// Decode a single frame back into an event.
///
/// Surrounding whitespace is ignored. Anything other than one `data:` line is
/// rejected.
pub fn parse_frame(frame: &str) -> Result<ReportEvent> {
    let line = frame.trim();
    let payload = line
        .strip_prefix(FRAME_PREFIX.trim_end())
        .ok_or_else(|| Error::InvalidRequest(format!("frame without data prefix: {}", line)))?;
    if payload.contains('\n') {
        return Err(Error::InvalidRequest("frame spans several lines".to_string()));
    }
    Ok(serde_json::from_str(payload.trim_start())?)
}

/// Split a buffered stream body into its events.
pub fn parse_frames(body: &str) -> Result<Vec<ReportEvent>> {
    body.split("\n\n")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(parse_frame)
        .collect()
}
