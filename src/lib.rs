//! scrollreel turns a scroll position into presentation state for image-sequence pages.
//!
//! Two independent components are driven by the same [`ScrollSample`]:
//!
//! 1. **Frame sequencing**: scroll progress selects one frame of a preloaded image sequence
//!    ([`compute_frame_index`]) which is drawn onto a fixed-size [`FrameSurface`].
//! 2. **Threshold signals**: marker positions read live from a [`MarkerGeometry`] are compared
//!    against viewport thresholds ([`evaluate_rules`]) and folded into overlay visibility with an
//!    explicit precedence policy ([`resolve_overlays`]).
//!
//! [`evaluate_tick`] is a pure function of the sample and current geometry; [`ScrollEngine`] adds
//! the one side effect (drawing the frame) behind an injected surface.
//!
//! Frames are loaded up front by [`start_preload`], one independent job per frame. A frame that
//! fails to load stays unavailable and drawing it is a silent no-op.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod engine;
mod eval;
mod foundation;
mod render;
mod sequence;

pub use assets::decode::{PreparedFrame, decode_frame};
pub use assets::preload::{
    FrameEvent, FrameSlot, FrameStore, Preload, PreloadOpts, PreloadStats, SlotState,
    preload_blocking, start_preload,
};
pub use assets::source::{
    DirFrameSource, FramePattern, FrameSource, MAX_PAD_WIDTH, normalize_rel_path,
};
pub use config::model::{
    Comparator, EngineConfig, OverlayRule, OverlayTransition, REFERENCE_FRAME_PATTERN,
    RotationRule, ThresholdRule, TransitionKind,
};
pub use engine::session::{ScrollEngine, TickOutput, evaluate_tick};
pub use engine::throttle::ScrollThrottle;
pub use eval::geometry::{DocumentLayout, MarkerGeometry, markers};
pub use eval::overlays::{OverlayState, resolve_overlays, resolve_rotations};
pub use eval::signals::{SignalValue, VisibilitySignals};
pub use eval::thresholds::{evaluate_rules, range_progress, reached_signal, step_signal};
pub use foundation::core::{FrameIndex, ScrollSample, SurfaceSize};
pub use foundation::error::{ReelError, ReelResult};
pub use render::surface::{CpuSurface, FrameRGBA, FrameSurface};
pub use sequence::frames::{FrameSequencer, compute_frame_index, frame_index_for_sample};
