//! Transcript segment state: store, search filter, selection toggling.

mod filter;
mod selection;
mod store;

pub use filter::filter_segments;
pub use selection::{deselect, select};
pub use store::{Segment, SegmentId, SegmentStore};

#[cfg(test)]
pub(crate) use store::tests::seg;
