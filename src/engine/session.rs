use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    assets::preload::FrameStore,
    config::model::EngineConfig,
    eval::geometry::MarkerGeometry,
    eval::overlays::{OverlayState, resolve_overlays, resolve_rotations},
    eval::signals::VisibilitySignals,
    eval::thresholds::evaluate_rules,
    foundation::core::{FrameIndex, ScrollSample},
    foundation::error::{ReelError, ReelResult},
    render::surface::FrameSurface,
    sequence::frames::{FrameSequencer, frame_index_for_sample},
};

/// Everything derived from one scroll sample.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TickOutput {
    /// Frame that should be on the surface.
    pub frame_index: FrameIndex,
    /// Overall scroll progress in `[0, 1]`.
    pub scroll_progress: f64,
    /// Raw threshold signals.
    pub signals: VisibilitySignals,
    /// Overlay visibility after the precedence policy.
    pub overlays: BTreeMap<String, OverlayState>,
    /// Rotation angles in degrees keyed by element.
    pub rotations: BTreeMap<String, f64>,
}

/// Pure evaluation of one tick. No drawing, no state.
#[tracing::instrument(level = "trace", skip(config, geometry))]
pub fn evaluate_tick<G: MarkerGeometry + ?Sized>(
    config: &EngineConfig,
    sample: &ScrollSample,
    geometry: &G,
) -> TickOutput {
    let frame_index = frame_index_for_sample(sample, config.frame_count);
    let signals = evaluate_rules(&config.thresholds, sample, geometry);
    let overlays = resolve_overlays(&config.overlays, &signals);
    let rotations = resolve_rotations(&config.rotations, &signals);
    TickOutput {
        frame_index,
        scroll_progress: sample.progress(),
        signals,
        overlays,
        rotations,
    }
}

/// Scroll engine: configuration plus the frame sequencer.
///
/// Holds no scroll state. Each call to [`ScrollEngine::on_scroll_sample`] recomputes everything
/// from the sample it is given.
#[derive(Debug)]
pub struct ScrollEngine {
    config: EngineConfig,
    sequencer: FrameSequencer,
}

impl ScrollEngine {
    /// Build an engine over a frame store that is (or will be) filled by a preload.
    pub fn new(config: EngineConfig, frames: Arc<FrameStore>) -> ReelResult<Self> {
        config.validate()?;
        if frames.len() != config.frame_count {
            return Err(ReelError::config(format!(
                "frame store has {} slots but config declares {} frames",
                frames.len(),
                config.frame_count
            )));
        }
        Ok(Self {
            config,
            sequencer: FrameSequencer::new(frames),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &FrameSequencer {
        &self.sequencer
    }

    /// Pure evaluation against this engine's configuration.
    pub fn evaluate<G: MarkerGeometry + ?Sized>(
        &self,
        sample: &ScrollSample,
        geometry: &G,
    ) -> TickOutput {
        evaluate_tick(&self.config, sample, geometry)
    }

    /// Evaluate `sample` and draw the selected frame onto `surface`.
    ///
    /// An unavailable frame leaves the surface as it was.
    pub fn on_scroll_sample<G, S>(
        &mut self,
        sample: &ScrollSample,
        geometry: &G,
        surface: &mut S,
    ) -> TickOutput
    where
        G: MarkerGeometry + ?Sized,
        S: FrameSurface + ?Sized,
    {
        let out = self.evaluate(sample, geometry);
        self.sequencer.draw(out.frame_index, surface);
        out
    }

    /// Draw the first available frame if nothing has been drawn yet.
    pub fn present_placeholder<S: FrameSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.sequencer.present_placeholder(surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
