//! Parsing and validation of engine responses.

use crate::error::{Error, Result};
use crate::segments::{Segment, SegmentId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wire shape of one transcript segment as the engine emits it.
#[derive(Debug, Deserialize)]
struct WireSegment {
    id: SegmentId,
    text: String,
    start: f64,
    end: f64,
}

/// Descriptor of a finished export, as reported by the generation engine.
/// The file behind `output_path` is the engine's business; this core only
/// reports where it landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub output_path: String,
}

/// Parse a transcription response into a fresh segment collection.
///
/// Anything that deviates from "JSON array of {id, text, start, end}" with
/// unique ids and finite, ordered timestamps is a malformed response; order
/// of the array is the canonical segment order.
pub fn parse_transcript(raw: &str) -> Result<Vec<Segment>> {
    let wire: Vec<WireSegment> = serde_json::from_str(raw)
        .map_err(|e| Error::MalformedResponse(format!("transcript: {}", e)))?;
    let mut seen = HashSet::with_capacity(wire.len());
    let mut segments = Vec::with_capacity(wire.len());
    for w in wire {
        if !seen.insert(w.id.clone()) {
            return Err(Error::MalformedResponse(format!(
                "duplicate segment id {}",
                w.id
            )));
        }
        if matches!(&w.id, SegmentId::Text(s) if s.is_empty()) {
            return Err(Error::MalformedResponse("segment with empty id".into()));
        }
        if !w.start.is_finite() || !w.end.is_finite() {
            return Err(Error::MalformedResponse(format!(
                "segment {}: non-numeric timestamps",
                w.id
            )));
        }
        if w.start >= w.end {
            return Err(Error::MalformedResponse(format!(
                "segment {}: start {} >= end {}",
                w.id, w.start, w.end
            )));
        }
        segments.push(Segment {
            id: w.id,
            text: w.text,
            start: w.start,
            end: w.end,
            checked: false,
        });
    }
    Ok(segments)
}

/// Parse a generation response into an export descriptor.
pub fn parse_export_result(raw: &str) -> Result<ExportResult> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedResponse(format!("export: {}", e)))
}
