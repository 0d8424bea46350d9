//! Authoritative ordered collection of transcript segments.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Engine-assigned segment identifier. Engines hand out numeric or string
/// ids; either way the id is stable for the lifetime of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentId::Number(n) => write!(f, "{}", n),
            SegmentId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One timed unit of transcript text. `checked` is the only field the UI may
/// change after load; everything else is owned by the transcription engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub text: String,
    /// Seconds from the start of the media.
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub checked: bool,
}

/// Owns the current segment collection for the loaded media. Iteration order
/// is the engine-assigned order; the id index makes flag toggling O(1)
/// instead of a scan over the full sequence.
#[derive(Debug, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    by_id: HashMap<SegmentId, usize>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection wholesale. Selection never carries over from
    /// the previous collection. On validation failure the previous
    /// collection is left untouched.
    pub fn load(&mut self, segments: Vec<Segment>) -> Result<()> {
        let by_id = Self::index(&segments)?;
        self.segments = segments;
        for seg in &mut self.segments {
            seg.checked = false;
        }
        self.by_id = by_id;
        Ok(())
    }

    fn index(segments: &[Segment]) -> Result<HashMap<SegmentId, usize>> {
        let mut by_id = HashMap::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            if matches!(&seg.id, SegmentId::Text(s) if s.is_empty()) {
                return Err(Error::InvalidTranscript("segment with empty id".into()));
            }
            if !seg.start.is_finite() || !seg.end.is_finite() {
                return Err(Error::InvalidTranscript(format!(
                    "segment {}: non-numeric timestamps",
                    seg.id
                )));
            }
            if seg.start >= seg.end {
                return Err(Error::InvalidTranscript(format!(
                    "segment {}: start {} >= end {}",
                    seg.id, seg.start, seg.end
                )));
            }
            if by_id.insert(seg.id.clone(), i).is_some() {
                return Err(Error::InvalidTranscript(format!(
                    "duplicate segment id {}",
                    seg.id
                )));
            }
        }
        Ok(by_id)
    }

    /// Set exactly one segment's selection flag. Writing the value a segment
    /// already has is a successful no-op.
    pub fn set_checked(&mut self, id: &SegmentId, value: bool) -> Result<()> {
        let idx = self
            .by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownSegment(id.to_string()))?;
        self.segments[idx].checked = value;
        Ok(())
    }

    /// Ordered read view of the full collection.
    pub fn all(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, id: &SegmentId) -> Option<&Segment> {
        self.by_id.get(id).map(|&i| &self.segments[i])
    }

    /// Segments currently flagged for export, in collection order. This is a
    /// snapshot taken at call time; later edits do not bleed into it.
    pub fn export_selection(&self) -> Vec<Segment> {
        self.segments.iter().filter(|s| s.checked).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
