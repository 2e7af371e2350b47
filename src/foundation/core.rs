use crate::foundation::error::{ReelError, ReelResult};

/// 0-based index into a frame sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    /// 1-based asset number for this index (`frame_0001` is index 0).
    pub fn number(self) -> usize {
        self.0 + 1
    }

    /// Inverse of [`FrameIndex::number`]. Returns `None` for `0`.
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).map(Self)
    }

    /// Clamp into `[0, frame_count - 1]`. An empty sequence clamps to 0.
    pub fn clamp_to(self, frame_count: usize) -> Self {
        Self(self.0.min(frame_count.saturating_sub(1)))
    }
}

/// One scroll measurement taken from the hosting surface.
///
/// Captured fresh on every scroll event and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    /// Current scroll offset from the document top, in pixels.
    pub offset: f64,
    /// Visible viewport height, in pixels.
    pub viewport_height: f64,
    /// Full document height, in pixels.
    pub document_height: f64,
}

impl ScrollSample {
    pub fn new(offset: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            offset,
            viewport_height,
            document_height,
        }
    }

    /// Maximum scroll offset. Zero for documents no taller than the viewport.
    pub fn scrollable_height(&self) -> f64 {
        let h = self.document_height - self.viewport_height;
        if h.is_finite() { h.max(0.0) } else { 0.0 }
    }

    /// Scroll progress in `[0, 1]`; 0 for degenerate documents.
    pub fn progress(&self) -> f64 {
        let h = self.scrollable_height();
        if h > 0.0 && self.offset.is_finite() {
            (self.offset / h).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fixed pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::config(
                "surface width and height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
