//! VTT (WebVTT) subtitle format writer.

use super::secs_to_ms;
use crate::segments::Segment;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn ms_to_vtt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

pub fn write_vtt(path: &Path, segments: &[Segment]) -> Result<(), String> {
    let mut file = File::create(path).map_err(|e| e.to_string())?;

    writeln!(file, "WEBVTT").map_err(|e| e.to_string())?;
    writeln!(file).map_err(|e| e.to_string())?;

    for seg in segments {
        writeln!(
            file,
            "{} --> {}",
            ms_to_vtt_time(secs_to_ms(seg.start)),
            ms_to_vtt_time(secs_to_ms(seg.end))
        )
        .map_err(|e| e.to_string())?;
        writeln!(file, "{}", seg.text).map_err(|e| e.to_string())?;
        writeln!(file).map_err(|e| e.to_string())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::seg;

    #[test]
    fn writes_header_and_dot_millis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.vtt");
        write_vtt(&path, &[seg(1, "hello world", 0.0, 2.5)]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "WEBVTT\n\n00:00:00.000 --> 00:00:02.500\nhello world\n\n"
        );
    }
}
