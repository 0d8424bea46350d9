//! Selection toggling on top of the store's mutation surface.
//!
//! Selection is sparse: a segment absent from the export selection is simply
//! unselected, there is no partial inclusion of a time range.

use super::{SegmentId, SegmentStore};
use crate::error::Result;

/// Mark one segment for export.
pub fn select(store: &mut SegmentStore, id: &SegmentId) -> Result<()> {
    store.set_checked(id, true)
}

/// Drop one segment from the export set.
pub fn deselect(store: &mut SegmentStore, id: &SegmentId) -> Result<()> {
    store.set_checked(id, false)
}
