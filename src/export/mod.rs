//! Export transcript to SRT and VTT subtitle formats.

mod srt;
mod vtt;

use crate::segments::Segment;
use std::path::Path;

/// Export transcript segments to SRT format.
pub fn export_srt(path: &Path, segments: &[Segment]) -> Result<(), String> {
    srt::write_srt(path, segments)
}

/// Export transcript segments to VTT format.
pub fn export_vtt(path: &Path, segments: &[Segment]) -> Result<(), String> {
    vtt::write_vtt(path, segments)
}

/// Seconds to whole milliseconds for subtitle timestamps.
pub(crate) fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}
