use std::sync::Arc;

use crate::{
    assets::preload::FrameStore,
    foundation::core::{FrameIndex, ScrollSample},
    render::surface::FrameSurface,
};

/// Map a scroll offset to a frame index.
///
/// `progress = offset / scrollable_height` (0 when the document cannot scroll), then
/// `floor(progress * frame_count)` clamped into `[0, frame_count - 1]`. Never panics.
pub fn compute_frame_index(
    scroll_offset: f64,
    scrollable_height: f64,
    frame_count: usize,
) -> FrameIndex {
    if frame_count == 0 {
        return FrameIndex(0);
    }
    let progress = if scrollable_height > 0.0 {
        scroll_offset / scrollable_height
    } else {
        0.0
    };
    if !progress.is_finite() || progress <= 0.0 {
        return FrameIndex(0);
    }
    let raw = (progress * frame_count as f64).floor();
    // `as` saturates for out-of-range floats.
    FrameIndex(raw as usize).clamp_to(frame_count)
}

/// Frame index for a full scroll sample.
pub fn frame_index_for_sample(sample: &ScrollSample, frame_count: usize) -> FrameIndex {
    compute_frame_index(sample.offset, sample.scrollable_height(), frame_count)
}

/// Draws frames from a preloaded [`FrameStore`] onto a surface.
///
/// Unavailable frames (still pending or failed) are skipped silently and the surface keeps
/// whatever it showed before.
#[derive(Debug)]
pub struct FrameSequencer {
    frames: Arc<FrameStore>,
    last_drawn: Option<FrameIndex>,
}

impl FrameSequencer {
    pub fn new(frames: Arc<FrameStore>) -> Self {
        Self {
            frames,
            last_drawn: None,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    /// Most recent frame actually drawn.
    pub fn last_drawn(&self) -> Option<FrameIndex> {
        self.last_drawn
    }

    /// Draw frame `index` (clamped). Returns whether anything was drawn.
    pub fn draw<S: FrameSurface + ?Sized>(&mut self, index: FrameIndex, surface: &mut S) -> bool {
        let index = index.clamp_to(self.frames.len());
        let Some(frame) = self.frames.get(index) else {
            tracing::trace!(index = index.0, "frame not available, keeping previous");
            return false;
        };
        match surface.draw_frame(index, &frame) {
            Ok(()) => {
                self.last_drawn = Some(index);
                true
            }
            Err(e) => {
                tracing::warn!(index = index.0, error = %e, "surface rejected frame");
                false
            }
        }
    }

    /// Draw the first available frame if the surface has never been drawn.
    ///
    /// Call whenever new frames settle so the surface is not blank before the first scroll.
    pub fn present_placeholder<S: FrameSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.last_drawn.is_some() {
            return false;
        }
        match self.frames.first_loaded() {
            Some(index) => self.draw(index, surface),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frames.rs"]
mod tests;
