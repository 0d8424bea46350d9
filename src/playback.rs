//! One-directional bridge from segment activation to the playback surface.

use crate::segments::Segment;
use log::debug;
use std::sync::Mutex;

/// Anything that can seek to an absolute position, in seconds.
pub trait PlaybackSurface: Send + Sync {
    fn seek_to(&self, seconds: f64);
}

/// Forwards "segment activated" to whatever surface is mounted.
///
/// The bridge is fire-and-forget: it does not wait for the seek and never
/// touches segment state. Activation before the surface mounts is a
/// successful no-op, since playback readiness is outside this core's control.
#[derive(Default)]
pub struct PlaybackBridge {
    surface: Mutex<Option<Box<dyn PlaybackSurface>>>,
}

impl PlaybackBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self, surface: Box<dyn PlaybackSurface>) {
        *self.surface.lock().unwrap() = Some(surface);
    }

    pub fn unmount(&self) {
        *self.surface.lock().unwrap() = None;
    }

    /// Seek the mounted surface to the segment's start, absolute positioning.
    pub fn activate(&self, segment: &Segment) {
        match self.surface.lock().unwrap().as_ref() {
            Some(surface) => {
                debug!(
                    "[playback] seek to {:.3}s (segment {})",
                    segment.start, segment.id
                );
                surface.seek_to(segment.start);
            }
            None => {
                debug!("[playback] surface not mounted, ignoring activation");
            }
        }
    }
}
