use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::ScrollSample,
    foundation::error::{ReelError, ReelResult},
};

/// Marker names used by the reference page.
pub mod markers {
    /// 1px anchor inside the opening logo block.
    pub const LOGO_TRIGGER: &str = "logo_trigger";
    /// Half-viewport-tall anchor that reveals the badge.
    pub const BADGE_TRIGGER: &str = "badge_trigger";
    /// Full-viewport-tall anchor for the info square.
    pub const BLUE_SQUARE_TRIGGER: &str = "blue_square_trigger";
    /// Full-viewport-tall anchor for the final logo.
    pub const END_TRIGGER: &str = "end_trigger";
}

/// Live source of marker positions.
///
/// Implementations must answer from current layout on every call; the engine never caches the
/// result, so reflows (window resizes) are picked up on the next tick.
pub trait MarkerGeometry {
    /// Viewport-relative top of `marker` for `sample`, or `None` if the marker is not mounted.
    fn viewport_top(&self, marker: &str, sample: &ScrollSample) -> Option<f64>;
}

/// Marker positions in document-flow coordinates.
///
/// The viewport top of a marker is its document offset minus the current scroll offset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentLayout {
    /// Document height in pixels.
    pub document_height: f64,
    /// Marker name to document offset in pixels.
    pub markers: BTreeMap<String, f64>,
}

impl DocumentLayout {
    pub fn new(document_height: f64) -> Self {
        Self {
            document_height,
            markers: BTreeMap::new(),
        }
    }

    /// Builder-style marker insertion.
    pub fn with_marker(mut self, name: impl Into<String>, document_offset: f64) -> Self {
        self.markers.insert(name.into(), document_offset);
        self
    }

    /// Layout of the reference page for a given viewport height.
    ///
    /// A 100vh logo block (anchor at 40vh), a 50vh badge trigger, 100vh square and end triggers,
    /// inside a section at least 400vh tall.
    pub fn reference(viewport_height: f64) -> Self {
        let vh = viewport_height;
        Self::new(4.0 * vh)
            .with_marker(markers::LOGO_TRIGGER, 0.4 * vh)
            .with_marker(markers::BADGE_TRIGGER, 1.0 * vh)
            .with_marker(markers::BLUE_SQUARE_TRIGGER, 1.5 * vh)
            .with_marker(markers::END_TRIGGER, 2.5 * vh)
    }

    /// Scroll sample at `offset` for this layout.
    pub fn sample(&self, offset: f64, viewport_height: f64) -> ScrollSample {
        ScrollSample::new(offset, viewport_height, self.document_height)
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let layout: Self = serde_json::from_reader(r)
            .map_err(|e| ReelError::parse("layout", e))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open layout '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ReelResult<()> {
        if !self.document_height.is_finite() || self.document_height < 0.0 {
            return Err(ReelError::config(
                "layout document_height must be finite and >= 0",
            ));
        }
        for (name, offset) in &self.markers {
            if !offset.is_finite() {
                return Err(ReelError::config(format!(
                    "marker '{name}' offset must be finite"
                )));
            }
        }
        Ok(())
    }
}

impl MarkerGeometry for DocumentLayout {
    fn viewport_top(&self, marker: &str, sample: &ScrollSample) -> Option<f64> {
        self.markers
            .get(marker)
            .map(|document_offset| document_offset - sample.offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/geometry.rs"]
mod tests;
