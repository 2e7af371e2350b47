pub(crate) mod geometry;
pub(crate) mod overlays;
pub(crate) mod signals;
pub(crate) mod thresholds;
