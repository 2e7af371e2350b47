use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::source::FramePattern,
    foundation::core::SurfaceSize,
    foundation::error::{ReelError, ReelResult},
};

/// Frame path pattern of the reference page.
pub const REFERENCE_FRAME_PATTERN: &str = "video-frames/frame_%04d.jpg";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Complete engine configuration.
///
/// A configuration is a pure data model that can be built in code (see
/// [`EngineConfig::reference`]) or loaded from JSON with [`EngineConfig::from_path`].
pub struct EngineConfig {
    /// Number of frames in the image sequence (`> 0`).
    pub frame_count: usize,
    /// Fixed drawing surface width in pixels.
    pub surface_width: u32,
    /// Fixed drawing surface height in pixels.
    pub surface_height: u32,
    /// Root-relative frame path pattern with one `%d` / `%0Nd` placeholder.
    #[serde(default = "default_frame_pattern")]
    pub frame_pattern: String,
    /// Threshold rules; each writes one distinct signal.
    #[serde(default)]
    pub thresholds: Vec<ThresholdRule>,
    /// Overlay visibility rules with their suppression policy.
    #[serde(default)]
    pub overlays: Vec<OverlayRule>,
    /// Paired rotations driven by progress signals.
    #[serde(default)]
    pub rotations: Vec<RotationRule>,
}

fn default_frame_pattern() -> String {
    REFERENCE_FRAME_PATTERN.to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One threshold rule: a marker, how to compare its viewport position, and the output signal.
pub struct ThresholdRule {
    /// Output signal name (unique across the configuration).
    pub signal: String,
    /// Marker whose live viewport top drives this rule.
    pub marker: String,
    /// Comparison applied to the marker position.
    pub comparator: Comparator,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// How a marker's viewport top is turned into a signal value.
pub enum Comparator {
    /// `0 <= top <= fraction * viewport_height`.
    ///
    /// `0.5` is the center-crossing rule, `0.75` the reveal-near-bottom rule.
    Step {
        /// Threshold as a fraction of viewport height.
        fraction: f64,
    },
    /// `top <= fraction * viewport_height`, without a lower bound.
    Reached {
        /// Threshold as a fraction of viewport height.
        fraction: f64,
    },
    /// Continuous progress from `marker` entering at the viewport bottom until it has risen by the
    /// document distance between `end_marker` (above it) and itself.
    Progress {
        /// Marker above `marker` whose distance sets the span.
        end_marker: String,
        /// Optional boolean signal set to `progress > 0`.
        #[serde(default)]
        engaged_signal: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Presentation rule for one overlay element.
pub struct OverlayRule {
    /// Overlay name reported to the consumer.
    pub name: String,
    /// Signal that must be active for the overlay to show. `None` means always eligible.
    #[serde(default)]
    pub when: Option<String>,
    /// Later-stage signals that hide this overlay while active, regardless of `when`.
    #[serde(default)]
    pub suppressed_by: Vec<String>,
    /// Canned enter/exit transition played by the consumer.
    #[serde(default)]
    pub transition: OverlayTransition,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canned transition descriptor handed to the external animator.
pub struct OverlayTransition {
    pub kind: TransitionKind,
    pub duration_s: f64,
}

impl Default for OverlayTransition {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Fade,
            duration_s: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Opacity fade.
    Fade,
    /// Opacity plus scale-up.
    Scale,
    /// Circular clip reveal plus opacity.
    Clip,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Two elements rotating by equal and opposite angles proportional to a progress signal.
pub struct RotationRule {
    /// Progress signal (from a [`Comparator::Progress`] rule).
    pub signal: String,
    /// Angle at progress 1, in degrees.
    pub max_degrees: f64,
    /// Element rotated by `+angle` and element rotated by `-angle`.
    pub elements: [String; 2],
}

impl EngineConfig {
    /// Configuration of the reference intro page: 150 frames on a 1080x1920 surface, a pinned logo,
    /// a badge, an info square, a spinning ring pair and a final logo that takes over the screen.
    pub fn reference() -> Self {
        use crate::eval::geometry::markers;

        let fade = OverlayTransition {
            kind: TransitionKind::Fade,
            duration_s: 0.5,
        };
        Self {
            frame_count: 150,
            surface_width: 1080,
            surface_height: 1920,
            frame_pattern: default_frame_pattern(),
            thresholds: vec![
                ThresholdRule {
                    signal: "logo_pinned".to_string(),
                    marker: markers::LOGO_TRIGGER.to_string(),
                    comparator: Comparator::Reached { fraction: 0.0 },
                },
                ThresholdRule {
                    signal: "badge".to_string(),
                    marker: markers::BADGE_TRIGGER.to_string(),
                    comparator: Comparator::Step { fraction: 0.5 },
                },
                ThresholdRule {
                    signal: "blue_square".to_string(),
                    marker: markers::BLUE_SQUARE_TRIGGER.to_string(),
                    comparator: Comparator::Step { fraction: 0.5 },
                },
                ThresholdRule {
                    signal: "ring_spin".to_string(),
                    marker: markers::BLUE_SQUARE_TRIGGER.to_string(),
                    comparator: Comparator::Progress {
                        end_marker: markers::BADGE_TRIGGER.to_string(),
                        engaged_signal: Some("ring_engaged".to_string()),
                    },
                },
                ThresholdRule {
                    signal: "final_logo".to_string(),
                    marker: markers::END_TRIGGER.to_string(),
                    comparator: Comparator::Reached { fraction: 0.75 },
                },
            ],
            overlays: vec![
                OverlayRule {
                    name: "logo_block".to_string(),
                    when: None,
                    suppressed_by: vec!["final_logo".to_string()],
                    transition: fade,
                },
                OverlayRule {
                    name: "scroll_indicator".to_string(),
                    when: None,
                    suppressed_by: vec!["final_logo".to_string()],
                    transition: fade,
                },
                OverlayRule {
                    name: "badge".to_string(),
                    when: Some("badge".to_string()),
                    suppressed_by: vec!["final_logo".to_string()],
                    transition: OverlayTransition {
                        kind: TransitionKind::Clip,
                        duration_s: 1.0,
                    },
                },
                OverlayRule {
                    name: "blue_square".to_string(),
                    when: Some("blue_square".to_string()),
                    suppressed_by: vec!["final_logo".to_string()],
                    transition: OverlayTransition {
                        kind: TransitionKind::Scale,
                        duration_s: 0.5,
                    },
                },
                OverlayRule {
                    name: "final_logo".to_string(),
                    when: Some("final_logo".to_string()),
                    suppressed_by: vec![],
                    transition: OverlayTransition {
                        kind: TransitionKind::Scale,
                        duration_s: 1.0,
                    },
                },
            ],
            rotations: vec![RotationRule {
                signal: "ring_spin".to_string(),
                max_degrees: 180.0,
                elements: ["ring_left".to_string(), "ring_right".to_string()],
            }],
        }
    }

    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ReelError::parse("engine config", e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open engine config '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn surface_size(&self) -> ReelResult<SurfaceSize> {
        SurfaceSize::new(self.surface_width, self.surface_height)
    }

    /// Every signal name written by the threshold rules, in rule order.
    pub fn signal_names(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.thresholds.len());
        for rule in &self.thresholds {
            out.push(rule.signal.as_str());
            if let Comparator::Progress {
                engaged_signal: Some(engaged),
                ..
            } = &rule.comparator
            {
                out.push(engaged.as_str());
            }
        }
        out
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.frame_count == 0 {
            return Err(ReelError::config("frame_count must be > 0"));
        }
        self.surface_size()?;
        FramePattern::parse(&self.frame_pattern)?;

        let mut signals = BTreeSet::new();
        for name in self.signal_names() {
            if name.trim().is_empty() {
                return Err(ReelError::config("signal names must be non-empty"));
            }
            if !signals.insert(name) {
                return Err(ReelError::config(format!(
                    "signal '{name}' is written by more than one rule"
                )));
            }
        }

        let mut progress_signals = BTreeSet::new();
        for rule in &self.thresholds {
            if rule.marker.trim().is_empty() {
                return Err(ReelError::config(format!(
                    "rule '{}' has an empty marker name",
                    rule.signal
                )));
            }
            match &rule.comparator {
                Comparator::Step { fraction } | Comparator::Reached { fraction } => {
                    if !fraction.is_finite() || *fraction < 0.0 {
                        return Err(ReelError::config(format!(
                            "rule '{}' fraction must be finite and >= 0",
                            rule.signal
                        )));
                    }
                }
                Comparator::Progress { end_marker, .. } => {
                    if end_marker.trim().is_empty() {
                        return Err(ReelError::config(format!(
                            "rule '{}' has an empty end_marker",
                            rule.signal
                        )));
                    }
                    progress_signals.insert(rule.signal.as_str());
                }
            }
        }

        let mut overlay_names = BTreeSet::new();
        for overlay in &self.overlays {
            if !overlay_names.insert(overlay.name.as_str()) {
                return Err(ReelError::config(format!(
                    "overlay '{}' is declared twice",
                    overlay.name
                )));
            }
            for s in overlay.when.iter().chain(overlay.suppressed_by.iter()) {
                if !signals.contains(s.as_str()) {
                    return Err(ReelError::config(format!(
                        "overlay '{}' references unknown signal '{s}'",
                        overlay.name
                    )));
                }
            }
            if !overlay.transition.duration_s.is_finite() || overlay.transition.duration_s < 0.0 {
                return Err(ReelError::config(format!(
                    "overlay '{}' transition duration must be finite and >= 0",
                    overlay.name
                )));
            }
        }

        for rot in &self.rotations {
            if !progress_signals.contains(rot.signal.as_str()) {
                return Err(ReelError::config(format!(
                    "rotation signal '{}' must be a progress rule",
                    rot.signal
                )));
            }
            if !rot.max_degrees.is_finite() {
                return Err(ReelError::config("rotation max_degrees must be finite"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
