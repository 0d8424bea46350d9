//! SRT (SubRip) subtitle format writer.

use super::secs_to_ms;
use crate::segments::Segment;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn ms_to_srt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

pub fn write_srt(path: &Path, segments: &[Segment]) -> Result<(), String> {
    let mut file = File::create(path).map_err(|e| e.to_string())?;

    for (i, seg) in segments.iter().enumerate() {
        writeln!(file, "{}", i + 1).map_err(|e| e.to_string())?;
        writeln!(
            file,
            "{} --> {}",
            ms_to_srt_time(secs_to_ms(seg.start)),
            ms_to_srt_time(secs_to_ms(seg.end))
        )
        .map_err(|e| e.to_string())?;
        writeln!(file, "{}", seg.text).map_err(|e| e.to_string())?;
        writeln!(file).map_err(|e| e.to_string())?;
    }

    Ok(())
}
