//! Case-insensitive substring view over a segment collection.

use super::Segment;

/// Stable filter: keeps the collection's relative order and never touches
/// selection flags. An empty query matches everything.
pub fn filter_segments<'a>(segments: &'a [Segment], query: &str) -> Vec<&'a Segment> {
    if query.is_empty() {
        return segments.iter().collect();
    }
    let needle = query.to_lowercase();
    segments
        .iter()
        .filter(|s| s.text.to_lowercase().contains(&needle))
        .collect()
}
